//! Boutique CLI - database migrations, seed data, and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run all migrations (catalog schema and session table)
//! boutique migrate
//!
//! # Run only the catalog schema migrations
//! boutique migrate admin
//!
//! # Insert the sample catalog (safe to re-run)
//! boutique seed
//!
//! # Create a user
//! boutique user create -e admin@example.com -n "Admin Name" --admin
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "boutique")]
#[command(author, version, about = "Boutique CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (all sets when no target is given)
    Migrate {
        #[command(subcommand)]
        target: Option<MigrateTarget>,
    },
    /// Insert the sample catalog
    Seed,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateTarget {
    /// Run storefront migrations (session table)
    Storefront,
    /// Run admin migrations (catalog schema)
    Admin,
    /// Run all migrations
    All,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Grant admin rights
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Migrate { target } => match target.unwrap_or(MigrateTarget::All) {
            MigrateTarget::Storefront => commands::migrate::storefront(&pool).await?,
            MigrateTarget::Admin => commands::migrate::admin(&pool).await?,
            MigrateTarget::All => {
                commands::migrate::admin(&pool).await?;
                commands::migrate::storefront(&pool).await?;
            }
        },
        Commands::Seed => {
            commands::seed::run(&pool).await?;
        }
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                admin,
            } => {
                commands::users::create(&pool, &email, &name, admin).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_migrate_target_is_optional() {
        let cli = Cli::try_parse_from(["boutique", "migrate"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Commands::Migrate { target: None }));

        let cli = Cli::try_parse_from(["boutique", "migrate", "admin"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Migrate {
                target: Some(MigrateTarget::Admin)
            }
        ));
    }

    #[test]
    fn test_user_create_flags() {
        let cli = Cli::try_parse_from([
            "boutique", "user", "create", "-e", "a@b.test", "-n", "Ada", "--admin",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserAction::Create { admin: true, .. }
            }
        ));
    }
}
