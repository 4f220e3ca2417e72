use anyhow::Context;
use clap::{Parser, Subcommand};
use cmkgui_core::GuiConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "cmkgui.yaml";

#[derive(Parser, Debug)]
#[command(name = "cmkgui", version, about = "cmkgui share tokens and rule tools")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, env = "CMKGUI_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage dashboard share tokens.
    Token {
        /// User performing the action (recorded as issuer and in the security log).
        #[arg(long, env = "CMKGUI_USER", default_value = "cmkadmin", global = true)]
        user: String,

        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Rule condition tools.
    Rules {
        #[command(subcommand)]
        cmd: RulesCommand,
    },

    /// Serve shared dashboard links over HTTP.
    Serve,
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a share token for a dashboard.
    Issue {
        /// Dashboard name.
        #[arg(long)]
        dashboard: String,

        /// Owner of the dashboard. Defaults to --user.
        #[arg(long)]
        owner: Option<String>,

        /// Free-text comment shown to the owner.
        #[arg(long)]
        comment: Option<String>,

        /// Validity period, e.g. "24h", "7d", "2w". Never expires when omitted.
        #[arg(long)]
        expires: Option<String>,
    },

    /// Verify a client token string ("0:<token_id>").
    Verify { token: String },

    /// List issued tokens.
    List {
        /// Only tokens issued by this user.
        #[arg(long)]
        issuer: Option<String>,
    },

    /// Show one token as JSON.
    Show { token_id: String },

    /// Revoke a token. The token stays in the store.
    Revoke { token_id: String },

    /// Delete a token from the store.
    Delete { token_id: String },

    /// Switch a share off without revoking it.
    Disable { token_id: String },

    /// Switch a disabled share back on.
    Enable { token_id: String },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Describe the conditions of a rule file (YAML).
    Describe { file: PathBuf },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GuiConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                tracing::debug!("No configuration file, using defaults");
                return Ok(GuiConfig::default());
            }
            default
        }
    };

    GuiConfig::from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Token { user, cmd } => match cmd {
            TokenCommand::Issue {
                dashboard,
                owner,
                comment,
                expires,
            } => commands::token::issue(&config, &user, dashboard, owner, comment, expires).await,
            TokenCommand::Verify { token } => commands::token::verify(&config, &token),
            TokenCommand::List { issuer } => commands::token::list(&config, issuer.as_deref()),
            TokenCommand::Show { token_id } => commands::token::show(&config, &token_id),
            TokenCommand::Revoke { token_id } => {
                commands::token::revoke(&config, &user, &token_id).await
            }
            TokenCommand::Delete { token_id } => {
                commands::token::delete(&config, &user, &token_id).await
            }
            TokenCommand::Disable { token_id } => {
                commands::token::set_disabled(&config, &user, &token_id, true).await
            }
            TokenCommand::Enable { token_id } => {
                commands::token::set_disabled(&config, &user, &token_id, false).await
            }
        },
        Command::Rules { cmd } => match cmd {
            RulesCommand::Describe { file } => commands::rules::describe(&config, &file),
        },
        Command::Serve => commands::serve::run(&config).await,
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
    fn test_parse_issue() {
        let cli = Cli::parse_from([
            "cmkgui",
            "token",
            "--user",
            "alice",
            "issue",
            "--dashboard",
            "main",
            "--expires",
            "7d",
        ]);

        match cli.cmd {
            Command::Token {
                user,
                cmd: TokenCommand::Issue {
                    dashboard, expires, ..
                },
            } => {
                assert_eq!(user, "alice");
                assert_eq!(dashboard, "main");
                assert_eq!(expires.as_deref(), Some("7d"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
