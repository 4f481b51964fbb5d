//! Account discovery and selection
//!
//! Credentials live in numbered environment variables (`GMAIL1`,
//! `GMAIL2`, ...), each holding an address and an app password separated
//! by whitespace. Discovery walks the numbers from 1 and stops at the
//! first one that is not set.

use crate::console::Console;
use crate::error::{Error, Result};
use std::env;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

/// Prefix of the numbered credential variables.
pub const ENV_PREFIX: &str = "GMAIL";

/// One account address and its secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub account: String,
    secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("account", &self.account)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credential {
    #[must_use]
    pub fn new(account: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            secret: secret.into(),
        }
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Parse one `<account> <secret>` entry read from `var`.
    ///
    /// The secret is everything after the first run of whitespace, so
    /// app passwords pasted as `abcd efgh ijkl mnop` survive intact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming `var` when there is no secret.
    pub fn parse(var: &str, value: &str) -> Result<Self> {
        let malformed =
            || Error::Config(format!("{var} must hold an account and a secret separated by a space"));

        let (account, secret) = value
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(malformed)?;
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(malformed());
        }

        Ok(Self::new(account, secret))
    }

    /// Load credentials from the environment
    ///
    /// Reads from `.env` file if present, then `GMAIL1`, `GMAIL2`, ...
    /// until the first missing variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if an entry is malformed.
    pub fn from_env() -> Result<Vec<Self>> {
        dotenvy::dotenv().ok();
        Self::discover(|key| env::var(key).ok())
    }

    /// Enumerate `GMAIL1..` through `lookup`, stopping at the first gap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for the first malformed entry.
    pub fn discover<F>(lookup: F) -> Result<Vec<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut credentials = Vec::new();
        for n in 1_u32.. {
            let var = format!("{ENV_PREFIX}{n}");
            let Some(value) = lookup(&var) else {
                break;
            };
            credentials.push(Self::parse(&var, &value)?);
        }
        debug!("Found {} configured account(s)", credentials.len());
        Ok(credentials)
    }
}

/// Outcome of the account picker.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    Account(Credential),
    Quit,
}

/// Resolve the configured credentials to a single account.
///
/// A lone entry is returned without prompting. With several entries the
/// user picks one by index or quits with `q`; anything else is answered
/// with a hint and the menu is shown again. End of input counts as `q`.
///
/// # Errors
///
/// Returns [`Error::Config`] when no credentials are configured, and
/// propagates console I/O failures.
pub async fn select_account<R, W>(
    mut credentials: Vec<Credential>,
    console: &mut Console<R, W>,
) -> Result<Selection>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match credentials.len() {
        0 => {
            return Err(Error::Config(format!(
                "no accounts configured, set {ENV_PREFIX}1=\"<address> <app password>\""
            )));
        }
        1 => return Ok(Selection::Account(credentials.remove(0))),
        _ => {}
    }

    loop {
        console.println(" Choose a GMAIL account:").await?;
        for (i, credential) in credentials.iter().enumerate() {
            console
                .println(&format!("    {i}: {}", credential.account))
                .await?;
        }
        console.println("q to quit.").await?;
        console.println("   ").await?;

        let Some(input) = console.prompt("disconnected").await? else {
            return Ok(Selection::Quit);
        };
        if input == "q" {
            return Ok(Selection::Quit);
        }

        if let Some(index) = parse_choice(&input, credentials.len()) {
            return Ok(Selection::Account(credentials.swap_remove(index)));
        }
        console
            .println("Enter the index number of the account you would like to use.")
            .await?;
    }
}

fn parse_choice(input: &str, count: usize) -> Option<usize> {
    input.parse::<usize>().ok().filter(|index| *index < count)
}
