use anyhow::Context;

use crate::auth::JwtAuth;
use crate::config::AppConfig;

/// Prints the token on stdout so it can be captured by a shell.
pub fn handle(config: &AppConfig, subject: &str, ttl_minutes: Option<i64>) -> anyhow::Result<()> {
    let subject = subject.trim();
    if subject.is_empty() {
        anyhow::bail!("subject must not be empty");
    }

    let auth = JwtAuth::from_config(&config.security).context("loading JWT settings")?;
    let ttl = ttl_minutes.unwrap_or(config.security.token_ttl_minutes);
    let token = auth.issue(subject, ttl).context("issuing token")?;
    println!("{}", token);
    Ok(())
}
