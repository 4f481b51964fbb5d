//! Error types for gmail-client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("IMAP fetch error: {0}")]
    Fetch(String),

    #[error("INBOX is empty, nothing to browse")]
    EmptyMailbox,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
