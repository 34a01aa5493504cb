mod commands;
mod context;
mod prompt;
mod render;

use aloha_logging::setup_logging;
use aloha_settings::AlohaConfig;
use aloha_utils::LogColors;
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::associations::AssociationCommand;
use commands::resources::{GroupCommand, PermissionCommand, TweetCommand, UserCommand};
use context::AppContext;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "aloha")]
#[command(version, about = "Admin client for the aloha api", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the api answers its health route
    Health,
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    /// Show the signed in user
    Whoami,
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },
    Groups {
        #[command(subcommand)]
        command: GroupCommand,
    },
    Permissions {
        #[command(subcommand)]
        command: PermissionCommand,
    },
    Tweets {
        #[command(subcommand)]
        command: TweetCommand,
    },
    GroupPermissions {
        #[command(subcommand)]
        command: AssociationCommand,
    },
    UserPermissions {
        #[command(subcommand)]
        command: AssociationCommand,
    },
}

impl Commands {
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            Commands::Health | Commands::Login { .. } | Commands::Logout
        )
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AlohaConfig::new();

    if let Err(e) = setup_logging(&config.log_settings()) {
        tracing::debug!("Logging already initialized: {}", e);
    }

    let ctx = AppContext::new(config)?;

    if cli.command.needs_session() {
        ctx.require_session()?;
    }

    match cli.command {
        Commands::Health => commands::auth::health(&ctx).await,
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, username, password).await
        }
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Users { command } => commands::resources::run_users(&ctx, command).await,
        Commands::Groups { command } => commands::resources::run_groups(&ctx, command).await,
        Commands::Permissions { command } => {
            commands::resources::run_permissions(&ctx, command).await
        }
        Commands::Tweets { command } => commands::resources::run_tweets(&ctx, command).await,
        Commands::GroupPermissions { command } => {
            let service = ctx.group_permissions();
            commands::associations::run(&ctx, service, "Group Permissions", command).await
        }
        Commands::UserPermissions { command } => {
            let service = ctx.user_permissions();
            commands::associations::run(&ctx, service, "User Permissions", command).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", LogColors::alert(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_session_gate() {
        let cli = Cli::parse_from(["aloha", "health"]);
        assert!(!cli.command.needs_session());

        let cli = Cli::parse_from(["aloha", "logout"]);
        assert!(!cli.command.needs_session());

        let cli = Cli::parse_from(["aloha", "users", "list", "--page", "2", "--order", "desc"]);
        assert!(cli.command.needs_session());

        let cli = Cli::parse_from(["aloha", "group-permissions", "sync", "g-1", "p-1", "p-2"]);
        assert!(cli.command.needs_session());

        let cli = Cli::parse_from(["aloha", "user-permissions", "browse", "--size", "20"]);
        assert!(cli.command.needs_session());
    }
}
