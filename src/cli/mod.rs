pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "homelab-api")]
#[command(about = "Multi-tenant API for homelab assets and their maintenance logs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Mint an HS256 bearer token for local development")]
    Token {
        #[arg(help = "Tenant (JWT subject) the token is issued for")]
        subject: String,
        #[arg(long, help = "Lifetime in minutes (defaults to SECURITY_TOKEN_TTL_MINUTES)")]
        ttl_minutes: Option<i64>,
    },
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle(config).await,
        Commands::Migrate => commands::migrate::handle(config).await,
        Commands::Token { subject, ttl_minutes } => commands::token::handle(config, &subject, ttl_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["homelab-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn token_takes_subject_and_ttl() {
        let cli = Cli::try_parse_from(["homelab-api", "token", "alice", "--ttl-minutes", "15"]).unwrap();
        match cli.command {
            Some(Commands::Token { subject, ttl_minutes }) => {
                assert_eq!(subject, "alice");
                assert_eq!(ttl_minutes, Some(15));
            }
            _ => panic!("expected token command"),
        }
    }
}
