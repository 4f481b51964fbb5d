//! IMAP endpoint configuration

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Gmail's IMAP endpoint (implicit TLS).
pub const DEFAULT_HOST: &str = "imap.gmail.com";
pub const DEFAULT_PORT: u16 = 993;

/// Where to reach the IMAP server and which extra certificates to trust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    /// PEM bundle of additional trust anchors, on top of the webpki roots.
    pub ca_file: Option<PathBuf>,
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ca_file: None,
        }
    }
}

impl ImapConfig {
    /// Load the endpoint from environment variables
    ///
    /// Reads from `.env` file if present. Every variable is optional:
    /// - `GMAIL_IMAP_HOST` (default: `imap.gmail.com`)
    /// - `GMAIL_IMAP_PORT` (default: `993`)
    /// - `GMAIL_IMAP_CA_FILE` (default: none)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `GMAIL_IMAP_PORT` is not a valid port.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("GMAIL_IMAP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid GMAIL_IMAP_PORT: {e}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("GMAIL_IMAP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            ca_file: lookup("GMAIL_IMAP_CA_FILE").map(PathBuf::from),
        })
    }

    pub(crate) fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
