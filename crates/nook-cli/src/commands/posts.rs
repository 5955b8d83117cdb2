use super::{load_pages, output};
use anyhow::{Context, Result};
use nook_application::NookClient;
use nook_core::model::NewPost;

pub async fn feed(client: &NookClient, pages: u32, user: Option<&str>) -> Result<()> {
    let sync = match user {
        Some(user_id) => client.user_posts(user_id),
        None => client.home_feed(),
    };
    let window = load_pages(&sync, pages).await?;

    if window.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }
    for post in window.items() {
        println!("{}\n", output::post(post));
    }
    if window.has_more() {
        println!("(more available: --pages {})", window.page() + 1);
    }
    Ok(())
}

pub async fn show(client: &NookClient, post_id: &str) -> Result<()> {
    let post = client
        .posts()
        .get(post_id)
        .await
        .with_context(|| format!("Failed to load post {}", post_id))?;
    println!("{}", output::post(&post));
    for comment in &post.comments {
        println!("{}", output::comment(comment));
    }
    Ok(())
}

pub async fn create(client: &NookClient, content: String, image_url: Option<String>) -> Result<()> {
    let post = client
        .posts()
        .create(&NewPost { content, image_url })
        .await
        .context("Failed to publish post")?;
    println!("Published {}.", post.id);
    Ok(())
}

pub async fn edit(client: &NookClient, post_id: &str, content: &str) -> Result<()> {
    let post = client
        .posts()
        .edit(post_id, content)
        .await
        .context("Failed to edit post")?;
    println!("{}", output::post(&post));
    Ok(())
}

pub async fn like(client: &NookClient, post_id: &str) -> Result<()> {
    let state = client.posts().toggle_like(post_id).await?;
    let verb = if state.liked { "Liked" } else { "Unliked" };
    println!("{} ({} likes).", verb, state.likes_count);
    Ok(())
}

pub async fn comment(client: &NookClient, post_id: &str, content: &str) -> Result<()> {
    let comment = client
        .posts()
        .comment(post_id, content)
        .await
        .context("Failed to comment")?;
    println!("{}", output::comment(&comment));
    Ok(())
}
