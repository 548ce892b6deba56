//! Process configuration, read from command-line flags or the environment.

use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "leads-backend")]
#[command(about = "Contact lead import service")]
#[command(version)]
pub struct Config {
    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1", env = "LEADS_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 4000, env = "PORT")]
    pub port: u16,

    /// SQLite database file holding imported leads
    #[arg(short, long, default_value = "leads.sqlite", env = "LEADS_DATABASE")]
    pub database: PathBuf,

    /// Shared secret used to verify bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Largest accepted upload, in bytes
    #[arg(long, default_value_t = 10 * 1024 * 1024, env = "LEADS_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn database_path(&self) -> &Path {
        &self.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "leads-backend",
            "--port",
            "8081",
            "--database",
            "/tmp/x.sqlite",
            "--jwt-secret",
            "abc",
        ])
        .unwrap();

        assert_eq!(config.bind_address().1, 8081);
        assert_eq!(config.database_path(), Path::new("/tmp/x.sqlite"));
        assert_eq!(config.jwt_secret.as_deref(), Some("abc"));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }
}
