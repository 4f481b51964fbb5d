//! Gmail IMAP client library
//!
//! An interactive, read-only client that browses a Gmail INBOX over
//! IMAP (implicit TLS on port 993). It logs in with an app password,
//! walks the messages newest first, prints headers or full raw messages,
//! and saves raw messages to `<uid>.txt` files.
//!
//! The pieces are wired together by the `gmail-cli` binary:
//! [`Credential`] discovery and [`select_account`], [`GmailClient`]
//! login, a [`Navigator`] over the message UIDs, and the
//! [`CommandLoop`].

mod account;
mod archive;
mod client;
mod config;
mod connection;
mod console;
mod error;
mod message;
mod navigator;
mod repl;

pub use account::{Credential, ENV_PREFIX, Selection, select_account};
pub use archive::Archiver;
pub use client::{GmailClient, MailSession};
pub use config::{DEFAULT_HOST, DEFAULT_PORT, ImapConfig};
pub use console::Console;
pub use error::{Error, Result};
pub use message::{MessageId, Metadata};
pub use navigator::Navigator;
pub use repl::{Command, CommandLoop, FAREWELL, HELP, State};
