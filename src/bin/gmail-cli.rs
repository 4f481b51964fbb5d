#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Interactive Gmail IMAP browser and raw message downloader
//!
//! Accounts come from `GMAIL1`, `GMAIL2`, ... (`<address> <app password>`),
//! optionally via a `.env` file. Logs go to stderr, filtered by `RUST_LOG`.

use gmail_client::{
    Archiver, CommandLoop, Console, Credential, FAREWELL, GmailClient, ImapConfig, MailSession,
    Navigator, Selection, select_account,
};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut console = Console::stdio();
    print_banner(&mut console).await?;

    let credentials = Credential::from_env()?;
    let credential = match select_account(credentials, &mut console).await? {
        Selection::Account(credential) => credential,
        Selection::Quit => {
            console.println("   ").await?;
            console.println(FAREWELL).await?;
            return Ok(());
        }
    };
    let config = ImapConfig::from_env()?;

    console.println("   ").await?;
    console
        .println(&format!("Connecting to gmail account: {}", credential.account))
        .await?;
    console.println("  'h' for help.").await?;

    let mut client = GmailClient::login(&config, &credential).await?;
    drop(credential);

    let navigator = match client.message_ids().await.and_then(Navigator::new) {
        Ok(navigator) => navigator,
        Err(e) => {
            client.logout().await;
            return Err(e.into());
        }
    };

    CommandLoop::new(client, navigator, Archiver::current_dir())
        .run(&mut console)
        .await?;

    Ok(())
}

async fn print_banner<R, W>(console: &mut Console<R, W>) -> gmail_client::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.println("   ").await?;
    console.println("GMAIL IMAP client").await?;
    console.println("Raw message downloader").await?;
    console.println("   ").await
}
