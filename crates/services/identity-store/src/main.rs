//! Identity Store - administration CLI for the identity tables.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use identity_store::{commands, Database, IdentityStoreConfig, RoleStore, UserStore};

#[derive(Parser)]
#[command(name = "identity-store")]
#[command(about = "Identity store administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing identity tables
    Init,
    /// Role commands
    Role {
        #[command(subcommand)]
        action: RoleCommands,
    },
    /// User commands
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum RoleCommands {
    /// Create a role
    Create { name: String },
    /// Delete a role by name
    Delete { name: String },
    /// List all roles
    List,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user
    Create {
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// Plain-text password, hashed before it is stored
        #[arg(long, env = "IDENTITY_USER_PASSWORD")]
        password: Option<String>,
    },
    /// Show a user
    Show { name: String },
    /// Add a user to a role
    Grant { name: String, role: String },
    /// Remove a user from a role
    Revoke { name: String, role: String },
    /// List a user's roles
    Roles { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        identity_store::init_schema().await?;
        return Ok(());
    }

    let config = IdentityStoreConfig::from_env();
    let db = Database::connect(&config.database).await?;
    let roles = RoleStore::new(db.get_connection());
    let users = UserStore::new(db.into_connection());

    match cli.command {
        Commands::Init => {}
        Commands::Role { action } => match action {
            RoleCommands::Create { name } => {
                let role = commands::create_role(&roles, &name).await?;
                println!("{} {}", role.id, role.name);
            }
            RoleCommands::Delete { name } => {
                commands::delete_role(&roles, &name).await?;
            }
            RoleCommands::List => {
                for role in commands::list_roles(&roles).await? {
                    println!("{} {}", role.id, role.name);
                }
            }
        },
        Commands::User { action } => match action {
            UserCommands::Create {
                name,
                email,
                password,
            } => {
                let user = commands::create_user(
                    &users,
                    &name,
                    email.as_deref(),
                    password.as_deref(),
                )
                .await?;
                println!("{} {}", user.id, user.user_name);
            }
            UserCommands::Show { name } => {
                let details = commands::show_user(&users, &name).await?;
                println!("{}", serde_json::to_string_pretty(&details)?);
            }
            UserCommands::Grant { name, role } => {
                commands::grant_role(&users, &roles, &users, &name, &role).await?;
            }
            UserCommands::Revoke { name, role } => {
                commands::revoke_role(&users, &users, &name, &role).await?;
            }
            UserCommands::Roles { name } => {
                for role in commands::user_roles(&users, &users, &name).await? {
                    println!("{}", role);
                }
            }
        },
    }

    // Both stores share one pool; the last handle closes it
    drop(roles);
    users.close().await?;
    Ok(())
}
