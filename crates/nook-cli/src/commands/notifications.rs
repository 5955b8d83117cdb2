use super::{load_pages, output};
use anyhow::{Context, Result};
use nook_application::NookClient;

pub async fn list(client: &NookClient, pages: u32) -> Result<()> {
    let window = load_pages(&client.notification_list(), pages).await?;
    if window.is_empty() {
        println!("No notifications.");
    }
    for notification in window.items() {
        println!("{}", output::notification(notification));
    }
    Ok(())
}

pub async fn read(client: &NookClient, notification_id: &str) -> Result<()> {
    client
        .notifications()
        .mark_read(notification_id)
        .await
        .context("Failed to mark notification as read")?;
    println!("Marked {} as read.", notification_id);
    Ok(())
}
