//! IMAP connection and TLS helpers
//!
//! Provides the low-level `connect()` and `select()` functions used by
//! `GmailClient`.

use crate::account::Credential;
use crate::config::ImapConfig;
use crate::error::{Error, Result};
use async_imap::Session;
use async_imap::imap_proto::{Response, Status};
use rustls::RootCertStore;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::ServerName;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

/// A TLS-wrapped IMAP session.
pub type ImapSession = Session<Compat<tokio_rustls::client::TlsStream<TcpStream>>>;

/// Build a TLS connector trusting the webpki roots plus any
/// certificates listed in `config.ca_file`.
fn tls_connector(config: &ImapConfig) -> Result<TlsConnector> {
    let mut roots = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    if let Some(path) = &config.ca_file {
        let added = add_pem_roots(&mut roots, path)?;
        debug!("Trusting {} extra certificate(s) from {}", added, path.display());
    }

    let provider = CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::ring::default_provider()));

    let tls = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(format!("Unsupported protocol versions: {e}")))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(tls)))
}

fn add_pem_roots(roots: &mut RootCertStore, path: &Path) -> Result<usize> {
    let file = File::open(path)
        .map_err(|e| Error::Tls(format!("Cannot open CA file {}: {e}", path.display())))?;

    let mut added = 0;
    for cert in rustls_pemfile::certs(&mut BufReader::new(file)) {
        let cert = cert
            .map_err(|e| Error::Tls(format!("Invalid PEM in {}: {e}", path.display())))?;
        roots
            .add(cert)
            .map_err(|e| Error::Tls(format!("Rejected certificate in {}: {e}", path.display())))?;
        added += 1;
    }

    if added == 0 {
        return Err(Error::Tls(format!(
            "No certificates found in {}",
            path.display()
        )));
    }
    Ok(added)
}

/// Open a fresh TLS-wrapped IMAP session.
///
/// Connects to `config.host:config.port` via TCP, performs the TLS
/// handshake straight away (implicit TLS, as on port 993), reads the
/// server greeting and logs in.
pub async fn connect(config: &ImapConfig, credential: &Credential) -> Result<ImapSession> {
    let addr = config.addr();
    debug!("Connecting to IMAP server at {}", addr);

    let tcp_stream = TcpStream::connect(&addr)
        .await
        .map_err(|e| Error::Login(format!("Cannot reach {addr}: {e}")))?;

    let connector = tls_connector(config)?;
    let server_name = ServerName::try_from(config.host.clone())
        .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

    let tls_stream = connector
        .connect(server_name, tcp_stream)
        .await
        .map_err(|e| Error::Tls(e.to_string()))?;

    let mut client = async_imap::Client::new(tls_stream.compat());
    let greeting = client.read_response().await.ok().flatten();
    if greeting.as_ref().is_none_or(|data| is_bye(data.parsed())) {
        return Err(Error::Login(format!(
            "{addr}: server closed connection before greeting"
        )));
    }

    let session = client
        .login(&credential.account, credential.secret())
        .await
        .map_err(|(e, _)| Error::Login(format!("{} was rejected: {e}", credential.account)))?;

    info!("Logged in as {}", credential.account);
    Ok(session)
}

/// An untagged `BYE` instead of a greeting means the server will not
/// talk to us.
const fn is_bye(response: &Response<'_>) -> bool {
    matches!(
        response,
        Response::Data {
            status: Status::Bye,
            ..
        }
    )
}

/// SELECT a folder on an existing session.
pub async fn select(session: &mut ImapSession, folder: &str) -> Result<()> {
    session
        .select(folder)
        .await
        .map_err(|e| Error::Fetch(format!("Failed to select {folder}: {e}")))?;
    Ok(())
}
