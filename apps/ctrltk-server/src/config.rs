use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ctrltk_core::{CredentialStore, Tier};
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(
    name = "ctrltk-server",
    author,
    version,
    about = "Remote display and input control server"
)]
pub struct Cli {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "CTRLTK_LISTEN_ADDR", default_value = "127.0.0.1:8037")]
    listen_addr: String,

    /// Path to the TOML credentials file.
    #[arg(long, env = "CTRLTK_CONFIG", default_value = "ctrltk.toml")]
    config: PathBuf,
}

/// Credentials file shape:
///
/// ```toml
/// [users.alice]
/// secret = "hunter2"
/// tier = "admin"
/// ```
#[derive(Debug, Deserialize)]
struct ConfigFile {
    users: HashMap<String, UserEntry>,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    secret: String,
    tier: Tier,
}

/// Resolved server configuration. Built once at startup; there is no
/// hot-reload path.
#[derive(Debug)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub credentials: CredentialStore,
}

impl ServerConfig {
    pub fn load(cli: Cli) -> Result<Self> {
        let listen_addr = cli
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address: {}", cli.listen_addr))?;
        let raw = std::fs::read_to_string(&cli.config)
            .with_context(|| format!("failed to read {}", cli.config.display()))?;
        let credentials = parse_credentials(&raw)
            .with_context(|| format!("invalid credentials file {}", cli.config.display()))?;
        Ok(Self {
            listen_addr,
            credentials,
        })
    }
}

fn parse_credentials(raw: &str) -> Result<CredentialStore> {
    let file: ConfigFile = toml::from_str(raw)?;
    if file.users.is_empty() {
        bail!("no users configured");
    }
    let store = CredentialStore::from_users(
        file.users
            .into_iter()
            .map(|(username, entry)| (username, entry.secret, entry.tier)),
    )?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_users_with_tiers() {
        let store = parse_credentials(
            r#"
            [users.alice]
            secret = "hunter2"
            tier = "admin"

            [users.bob]
            secret = "s3cret"
            tier = "read"
            "#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.verify("alice", "hunter2").unwrap().tier, Tier::Admin);
        assert_eq!(store.verify("bob", "s3cret").unwrap().tier, Tier::Read);
    }

    #[test]
    fn rejects_unknown_tier_values() {
        let result = parse_credentials(
            r#"
            [users.alice]
            secret = "hunter2"
            tier = "owner"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_secret() {
        let result = parse_credentials(
            r#"
            [users.alice]
            tier = "read"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_an_empty_user_table() {
        assert!(parse_credentials("[users]\n").is_err());
        assert!(parse_credentials("").is_err());
    }
}
