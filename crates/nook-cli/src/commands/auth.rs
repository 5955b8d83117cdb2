use super::output;
use anyhow::{Context, Result, bail};
use nook_application::NookClient;
use nook_core::model::ProfileUpdate;
use nook_interaction::AuthOutcome;
use nook_interaction::api::RegisterRequest;
use std::io::{self, BufRead, Write};

fn read_password(given: Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

fn report(outcome: AuthOutcome) {
    match outcome {
        AuthOutcome::Authenticated { user: Some(user) } => {
            println!("Signed in as @{}.", user.username)
        }
        AuthOutcome::Authenticated { user: None } => println!("Signed in."),
        AuthOutcome::TwoFactorRequired { user_id } => {
            println!("Two-factor authentication is enabled for this account.");
            println!("Run: nook verify2fa {} <code>", user_id);
        }
    }
}

pub async fn login(client: &NookClient, email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let outcome = client
        .session()
        .login(email, &password)
        .await
        .context("Sign-in failed")?;
    report(outcome);
    Ok(())
}

pub async fn register(
    client: &NookClient,
    username: String,
    email: String,
    name: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let request = RegisterRequest {
        username,
        email,
        password: read_password(password)?,
        name,
    };
    let outcome = client
        .session()
        .register(&request)
        .await
        .context("Registration failed")?;
    report(outcome);
    Ok(())
}

pub async fn verify_2fa(client: &NookClient, user_id: &str, code: &str) -> Result<()> {
    let outcome = client
        .session()
        .verify_2fa(user_id, code)
        .await
        .context("Verification failed")?;
    report(outcome);
    Ok(())
}

pub fn google_callback(client: &NookClient, url: &str) -> Result<()> {
    let outcome = client
        .session()
        .google_login(url)
        .context("Google sign-in failed")?;
    report(outcome);
    Ok(())
}

pub fn status(client: &NookClient) -> Result<()> {
    println!("Backend: {}", client.config().base_url());
    println!("Session: {:?}", client.session().state());
    Ok(())
}

pub async fn whoami(client: &NookClient) -> Result<()> {
    let me = client.profile().me().await.context("Failed to load profile")?;
    println!("{}", output::profile(&me));
    Ok(())
}

pub async fn profile(client: &NookClient, username: &str) -> Result<()> {
    let profile = client
        .profile()
        .by_username(username)
        .await
        .with_context(|| format!("Failed to load profile {}", username))?;
    println!("{}", output::profile(&profile));
    Ok(())
}

pub async fn edit_profile(client: &NookClient, update: ProfileUpdate) -> Result<()> {
    let profile = client
        .profile()
        .update(&update)
        .await
        .context("Failed to update profile")?;
    println!("{}", output::profile(&profile));
    Ok(())
}

pub async fn follow(client: &NookClient, user_id: &str) -> Result<()> {
    let state = client.profile().toggle_follow(user_id).await?;
    if state.following {
        println!("Following ({} followers).", state.followers_count);
    } else {
        println!("Unfollowed ({} followers).", state.followers_count);
    }
    Ok(())
}
