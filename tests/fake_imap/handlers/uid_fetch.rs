//! UID FETCH command handler.
//!
//! Message data travels as **counted literals**:
//!
//! ```text
//! * <seq> FETCH (UID <uid> BODY[] {<length>}
//! <exactly length bytes of raw RFC 2822 message>
//! )
//! ```
//!
//! Two sections are served: the whole message (`BODY[]`) and a header
//! subset (`BODY[HEADER.FIELDS (FROM SUBJECT)]`). For the subset, the
//! matching header lines (with their continuation lines) are returned in
//! the order they appear in the message, followed by the blank line
//! that ends a header block, just like Gmail does.
//!
//! The sequence number is the 1-based index of the message within the
//! folder, per RFC 3501 Section 7.4.2.

use crate::fake_imap::io::{write_bytes, write_line};
use crate::fake_imap::mailbox::Mailbox;
use imap_codec::imap_types::sequence::{SeqOrUid, Sequence, SequenceSet};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Extract UIDs from a `SequenceSet`. We only support single values
/// (not ranges) since that's what the client sends.
fn extract_uids(seq_set: &SequenceSet) -> Vec<u32> {
    seq_set
        .0
        .as_ref()
        .iter()
        .filter_map(|seq| match seq {
            Sequence::Single(SeqOrUid::Value(v)) => Some(v.get()),
            _ => None,
        })
        .collect()
}

/// Field names listed in a `HEADER.FIELDS (...)` section of the raw
/// command line, upper-cased. `None` when the whole message was asked for.
pub fn requested_header_fields(line: &str) -> Option<Vec<String>> {
    const MARKER: &str = "HEADER.FIELDS (";

    let upper = line.to_ascii_uppercase();
    let start = upper.find(MARKER)? + MARKER.len();
    let end = start + upper[start..].find(')')?;
    Some(
        upper[start..end]
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    )
}

/// The header lines of `raw` whose field name is in `fields`, plus the
/// terminating blank line.
fn select_header_fields(raw: &[u8], fields: &[String]) -> Vec<u8> {
    let text = String::from_utf8_lossy(raw);
    let header = text.split("\r\n\r\n").next().unwrap_or_default();

    let mut out = String::new();
    let mut keep = false;
    for line in header.split("\r\n") {
        let continuation = line.starts_with(' ') || line.starts_with('\t');
        if !continuation {
            keep = line.split_once(':').is_some_and(|(name, _)| {
                fields.iter().any(|f| f.eq_ignore_ascii_case(name.trim()))
            });
        }
        if keep {
            out.push_str(line);
            out.push_str("\r\n");
        }
    }
    out.push_str("\r\n");
    out.into_bytes()
}

/// Handle the UID FETCH command. Returns the requested section of each
/// message as an IMAP literal.
pub async fn handle_uid_fetch<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    sequence_set: &SequenceSet,
    header_fields: Option<&[String]>,
    mailbox: &Mailbox,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        let resp = format!("{tag} BAD No folder selected\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    let Some(folder) = mailbox.get_folder(folder_name) else {
        let resp = format!("{tag} BAD Folder not found\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    for uid in extract_uids(sequence_set) {
        let Some((idx, email)) = folder.emails.iter().enumerate().find(|(_, e)| e.uid == uid)
        else {
            continue;
        };
        let seq = idx + 1; // 1-based sequence number

        let (section, data) = match header_fields {
            Some(fields) => (
                format!("BODY[HEADER.FIELDS ({})]", fields.join(" ")),
                select_header_fields(&email.raw, fields),
            ),
            None => ("BODY[]".to_string(), email.raw.clone()),
        };

        let header = format!("* {seq} FETCH (UID {uid} {section} {{{}}}\r\n", data.len());
        if write_line(stream, &header).await.is_err()
            || write_bytes(stream, &data).await.is_err()
            || write_line(stream, ")\r\n").await.is_err()
        {
            return;
        }
    }

    let resp = format!("{tag} OK FETCH completed\r\n");
    let _ = write_line(stream, &resp).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use std::num::NonZeroU32;
    use tokio::io::BufReader;

    fn make_raw_email() -> Vec<u8> {
        b"Subject: Test\r\n\
          Date: Mon, 01 Jan 2024 12:00:00 +0000\r\n\
          From: Alice\r\n <a@b.com>\r\n\
          \r\n\
          Body"
            .to_vec()
    }

    fn uid_set(uid: u32) -> SequenceSet {
        SequenceSet(
            vec![Sequence::Single(SeqOrUid::Value(
                NonZeroU32::new(uid).unwrap(),
            ))]
            .try_into()
            .unwrap(),
        )
    }

    fn from_subject() -> Vec<String> {
        vec!["FROM".to_string(), "SUBJECT".to_string()]
    }

    async fn run(
        tag: &str,
        sequence_set: &SequenceSet,
        header_fields: Option<&[String]>,
        mailbox: &Mailbox,
        selected: Option<&str>,
    ) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        handle_uid_fetch(tag, sequence_set, header_fields, mailbox, selected, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parses_requested_fields() {
        let line = "A0004 UID FETCH 42 (BODY.PEEK[HEADER.FIELDS (FROM SUBJECT)])\r\n";
        assert_eq!(requested_header_fields(line), Some(from_subject()));
        assert_eq!(requested_header_fields("A0005 UID FETCH 42 (BODY.PEEK[])"), None);
    }

    #[test]
    fn header_subset_keeps_message_order_and_folding() {
        let selected = select_header_fields(&make_raw_email(), &from_subject());
        assert_eq!(
            String::from_utf8(selected).unwrap(),
            "Subject: Test\r\nFrom: Alice\r\n <a@b.com>\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn fetches_full_message_by_uid() {
        let raw = make_raw_email();
        let mailbox = MailboxBuilder::new().folder("INBOX").email(42, &raw).build();

        let output = run("A1", &uid_set(42), None, &mailbox, Some("INBOX")).await;

        // Sequence number is 1 (1st message), UID is 42
        let literal = format!("* 1 FETCH (UID 42 BODY[] {{{}}}\r\n", raw.len());
        assert!(output.starts_with(&literal));
        assert!(output.contains("Body"));
        assert!(output.contains("A1 OK FETCH completed"));
    }

    #[tokio::test]
    async fn fetches_header_fields_only() {
        let raw = make_raw_email();
        let mailbox = MailboxBuilder::new().folder("INBOX").email(7, &raw).build();
        let fields = from_subject();

        let output = run("A1", &uid_set(7), Some(&fields), &mailbox, Some("INBOX")).await;

        assert!(output.contains("BODY[HEADER.FIELDS (FROM SUBJECT)]"));
        assert!(output.contains("Subject: Test"));
        assert!(!output.contains("Date:"));
        assert!(!output.contains("Body"));
    }

    #[tokio::test]
    async fn missing_uid_returns_only_ok() {
        let mailbox = MailboxBuilder::new().folder("INBOX").build();

        let output = run("A1", &uid_set(99), None, &mailbox, Some("INBOX")).await;

        assert_eq!(output, "A1 OK FETCH completed\r\n");
    }

    #[tokio::test]
    async fn no_folder_selected_returns_bad() {
        let mailbox = MailboxBuilder::new().folder("INBOX").build();

        let output = run("A1", &uid_set(1), None, &mailbox, None).await;

        assert!(output.contains("A1 BAD No folder selected"));
    }
}
