//! Message identifiers and header metadata

use mail_parser::MessageParser;
use std::fmt;

/// IMAP UID of a message in the selected mailbox.
///
/// UIDs grow with arrival order, so sorting them yields the mailbox in
/// chronological order. The UID is also the stem of the archive file
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u32);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MessageId {
    fn from(uid: u32) -> Self {
        Self(uid)
    }
}

/// The two header fields shown while browsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub sender: String,
    pub subject: String,
}

impl Metadata {
    /// Decode `From` and `Subject` out of a raw header block.
    ///
    /// Fields are located by name, so the order the server returns them
    /// in does not matter. Encoded words and folded lines are decoded by
    /// `mail-parser`. Missing fields come back empty.
    #[must_use]
    pub fn from_header_block(raw: &[u8]) -> Self {
        let Some(message) = MessageParser::default().parse(raw) else {
            return Self::default();
        };

        let sender = message
            .from()
            .and_then(|from| from.first())
            .map(|addr| match (addr.name(), addr.address()) {
                (Some(name), Some(address)) => format!("{name} <{address}>"),
                (None, Some(address)) => address.to_string(),
                (Some(name), None) => name.to_string(),
                (None, None) => String::new(),
            })
            .unwrap_or_default();

        Self {
            sender,
            subject: message.subject().unwrap_or_default().to_string(),
        }
    }
}

/// Raw message bytes as text. Invalid UTF-8 is replaced, never fatal.
#[must_use]
pub fn decode_body(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
