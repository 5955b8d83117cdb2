//! Plain-text rendering of resources.

use chrono::{DateTime, Utc};
use nook_core::model::{
    Comment, Conversation, Message, Notification, NotificationKind, Post, Profile, UserSummary,
};

fn when(at: Option<&DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn post(post: &Post) -> String {
    let mut out = format!(
        "[{}] {} @{}  {}\n  {}",
        post.id,
        post.author.display_name(),
        post.author.username,
        when(post.created_at.as_ref()),
        post.content
    );
    if let Some(image) = &post.image_url {
        out.push_str(&format!("\n  image: {}", image));
    }
    out.push_str(&format!(
        "\n  {} likes{}  {} comments",
        post.likes_count,
        if post.liked { " (liked)" } else { "" },
        post.comments_count
    ));
    out
}

pub fn comment(comment: &Comment) -> String {
    format!(
        "    - @{}: {}  {}",
        comment.author.username,
        comment.content,
        when(comment.created_at.as_ref())
    )
}

pub fn profile(profile: &Profile) -> String {
    let mut out = format!("@{} [{}]", profile.username, profile.id);
    if let Some(name) = &profile.name {
        out.push_str(&format!("\n  {}", name));
    }
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        out.push_str(&format!("\n  {}", bio));
    }
    out.push_str(&format!(
        "\n  {} followers, {} following{}",
        profile.followers_count,
        profile.following_count,
        if profile.is_following { " (you follow)" } else { "" }
    ));
    out
}

pub fn user(user: &UserSummary) -> String {
    format!("[{}] {} @{}", user.id, user.display_name(), user.username)
}

pub fn conversation(conversation: &Conversation) -> String {
    let names: Vec<String> = conversation
        .participants
        .iter()
        .map(|p| format!("@{}", p.username))
        .collect();
    let mut out = format!("[{}] {}", conversation.id, names.join(", "));
    if conversation.unread_count > 0 {
        out.push_str(&format!(" ({} unread)", conversation.unread_count));
    }
    if let Some(last) = &conversation.last_message {
        out.push_str(&format!("\n  {}: {}", last.sender.username, last.content));
    }
    out
}

pub fn message(message: &Message) -> String {
    format!(
        "{}  @{}: {}",
        when(message.created_at.as_ref()),
        message.sender.username,
        message.content
    )
}

pub fn notification(notification: &Notification) -> String {
    let actor = notification
        .actor
        .as_ref()
        .map(|a| format!("@{}", a.username))
        .unwrap_or_else(|| "Someone".to_string());
    let what = match notification.kind {
        NotificationKind::Like => "liked your post",
        NotificationKind::Comment => "commented on your post",
        NotificationKind::Follow => "followed you",
        NotificationKind::Message => "sent you a message",
        NotificationKind::Other => "did something",
    };
    format!(
        "{} [{}] {} {}  {}",
        if notification.read { " " } else { "*" },
        notification.id,
        actor,
        what,
        when(notification.created_at.as_ref())
    )
}
