use super::{load_pages, output};
use anyhow::{Context, Result};
use nook_application::NookClient;

pub async fn list(client: &NookClient, pages: u32) -> Result<()> {
    let window = load_pages(&client.conversations(), pages).await?;
    if window.is_empty() {
        println!("No conversations.");
    }
    for conversation in window.items() {
        println!("{}", output::conversation(conversation));
    }
    Ok(())
}

pub async fn show(client: &NookClient, conversation_id: &str, pages: u32) -> Result<()> {
    let window = load_pages(&client.thread(conversation_id), pages).await?;
    // Pages arrive newest first; print oldest at the top.
    for message in window.items().iter().rev() {
        println!("{}", output::message(message));
    }
    Ok(())
}

pub async fn start(client: &NookClient, user_id: &str) -> Result<()> {
    let conversation = client
        .messages()
        .start(user_id)
        .await
        .context("Failed to start conversation")?;
    println!("{}", output::conversation(&conversation));
    Ok(())
}

pub async fn send(client: &NookClient, conversation_id: &str, content: &str) -> Result<()> {
    let message = client
        .messages()
        .send(conversation_id, content)
        .await
        .context("Failed to send message")?;
    println!("{}", output::message(&message));
    Ok(())
}
