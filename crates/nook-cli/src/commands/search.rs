use super::{load_pages, output};
use anyhow::Result;
use nook_application::NookClient;

pub async fn run(client: &NookClient, query: &str, posts: bool, pages: u32) -> Result<()> {
    if posts {
        let window = load_pages(&client.post_search(query), pages).await?;
        if window.is_empty() {
            println!("No posts match '{}'.", query);
        }
        for post in window.items() {
            println!("{}\n", output::post(post));
        }
    } else {
        let window = load_pages(&client.user_search(query), pages).await?;
        if window.is_empty() {
            println!("No users match '{}'.", query);
        }
        for user in window.items() {
            println!("{}", output::user(user));
        }
    }
    Ok(())
}
