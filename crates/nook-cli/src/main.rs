use anyhow::Result;
use clap::{Parser, Subcommand};
use nook_application::{BootstrapOptions, ChannelNavigator, NookClient};
use nook_core::auth::Route;
use nook_core::model::ProfileUpdate;
use nook_infrastructure::NookPaths;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "nook")]
#[command(about = "Nook CLI - read and post to a Nook social backend", long_about = None)]
struct Cli {
    /// Use this directory instead of ~/.config/nook
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Keep credentials in memory for this invocation only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Finish a sign-in that asked for a second factor
    Verify2fa { user_id: String, code: String },
    /// Google sign-in
    Google {
        #[command(subcommand)]
        action: GoogleAction,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Show the signed-in user's profile
    Whoami,
    /// Profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Follow or unfollow a user
    Follow { user_id: String },
    /// Read the home feed (or one user's posts)
    Feed {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,
    },
    /// Posts
    Post {
        #[command(subcommand)]
        action: PostAction,
    },
    /// Direct messages
    Messages {
        #[command(subcommand)]
        action: MessageAction,
    },
    /// Search users or posts
    Search {
        query: String,
        /// Search posts instead of users
        #[arg(long)]
        posts: bool,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Notifications
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationAction>,
    },
    /// Client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum GoogleAction {
    /// Print the URL that starts Google sign-in
    Url,
    /// Complete sign-in from the URL the browser was redirected to
    Callback { url: String },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show someone's profile
    Show { username: String },
    /// Change the signed-in user's profile
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum PostAction {
    /// Show a post with its comments
    Show { post_id: String },
    /// Publish a post
    Create {
        content: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Replace a post's text
    Edit { post_id: String, content: String },
    /// Like or unlike a post
    Like { post_id: String },
    /// Comment on a post
    Comment { post_id: String, content: String },
}

#[derive(Subcommand)]
enum MessageAction {
    /// List conversations
    List {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show a conversation
    Show {
        conversation_id: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Start a conversation with a user
    Start { user_id: String },
    /// Send a message
    Send {
        conversation_id: String,
        content: String,
    },
}

#[derive(Subcommand)]
enum NotificationAction {
    /// List notifications
    List {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Mark a notification as read
    Read { notification_id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write config.toml with the given backend URL
    Init {
        #[arg(long)]
        api_url: String,
        #[arg(long)]
        page_size: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = NookPaths::new(cli.config_dir.as_deref());
    logging::init(paths.log_dir().ok().as_deref(), cli.verbose);

    if let Commands::Config { action } = &cli.command {
        return commands::config::run(&paths, action);
    }

    let (navigator, routes) = ChannelNavigator::channel();
    let options = BootstrapOptions {
        config_dir: cli.config_dir.clone(),
        ephemeral: cli.ephemeral,
    };
    let client = NookClient::bootstrap(&options, Arc::new(navigator))?;

    let signing_out = matches!(cli.command, Commands::Logout);
    let result = dispatch(&client, cli.command).await;
    if !signing_out {
        report_navigation(routes);
    }
    result
}

async fn dispatch(client: &NookClient, command: Commands) -> Result<()> {
    use commands::{auth, messages, notifications, posts, search};

    match command {
        Commands::Login { email, password } => auth::login(client, &email, password).await,
        Commands::Register {
            username,
            email,
            name,
            password,
        } => auth::register(client, username, email, name, password).await,
        Commands::Verify2fa { user_id, code } => auth::verify_2fa(client, &user_id, &code).await,
        Commands::Google { action } => match action {
            GoogleAction::Url => {
                println!("{}", client.google_login_url());
                Ok(())
            }
            GoogleAction::Callback { url } => auth::google_callback(client, &url),
        },
        Commands::Logout => {
            client.session().logout();
            println!("Signed out.");
            Ok(())
        }
        Commands::Status => auth::status(client),
        Commands::Whoami => auth::whoami(client).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show { username } => auth::profile(client, &username).await,
            ProfileAction::Edit {
                name,
                bio,
                avatar_url,
            } => {
                let update = ProfileUpdate {
                    name,
                    bio,
                    avatar_url,
                };
                auth::edit_profile(client, update).await
            }
        },
        Commands::Follow { user_id } => auth::follow(client, &user_id).await,
        Commands::Feed { pages, user } => posts::feed(client, pages, user.as_deref()).await,
        Commands::Post { action } => match action {
            PostAction::Show { post_id } => posts::show(client, &post_id).await,
            PostAction::Create { content, image_url } => {
                posts::create(client, content, image_url).await
            }
            PostAction::Edit { post_id, content } => posts::edit(client, &post_id, &content).await,
            PostAction::Like { post_id } => posts::like(client, &post_id).await,
            PostAction::Comment { post_id, content } => {
                posts::comment(client, &post_id, &content).await
            }
        },
        Commands::Messages { action } => match action {
            MessageAction::List { pages } => messages::list(client, pages).await,
            MessageAction::Show {
                conversation_id,
                pages,
            } => messages::show(client, &conversation_id, pages).await,
            MessageAction::Start { user_id } => messages::start(client, &user_id).await,
            MessageAction::Send {
                conversation_id,
                content,
            } => messages::send(client, &conversation_id, &content).await,
        },
        Commands::Search {
            query,
            posts,
            pages,
        } => search::run(client, &query, posts, pages).await,
        Commands::Notifications { action } => match action {
            None => notifications::list(client, 1).await,
            Some(NotificationAction::List { pages }) => notifications::list(client, pages).await,
            Some(NotificationAction::Read { notification_id }) => {
                notifications::read(client, &notification_id).await
            }
        },
        Commands::Config { .. } => Ok(()),
    }
}

/// Tells the user when the session ended during this command.
fn report_navigation(mut routes: UnboundedReceiver<Route>) {
    while let Ok(route) = routes.try_recv() {
        if route == Route::Login {
            eprintln!("Your session has ended. Run `nook login <email>` to sign in again.");
            break;
        }
    }
}
