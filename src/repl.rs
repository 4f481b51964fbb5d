//! Interactive command loop
//!
//! Shows the sender and subject of the current message, reads a
//! one-letter command and acts on it until `q` (or end of input).
//! Unknown input is ignored without comment.

use crate::archive::Archiver;
use crate::client::MailSession;
use crate::console::Console;
use crate::error::Result;
use crate::message::Metadata;
use crate::navigator::Navigator;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

pub const FAREWELL: &str = "Thank you, come again!";

pub const HELP: &str = "
h : show this help
r : read current message
d : download current message
n : next (older) message
p : previous (newer) message
q : quit";

const SPACER: &str = "   ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Read,
    Download,
    /// Move to the next OLDER message.
    Next,
    /// Move to the previous, NEWER message.
    Previous,
    Quit,
}

impl Command {
    /// Map a trimmed input line to a command. Only the exact letters match.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "h" => Some(Self::Help),
            "r" => Some(Self::Read),
            "d" => Some(Self::Download),
            "n" => Some(Self::Next),
            "p" => Some(Self::Previous),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Displaying,
    AwaitingCommand,
    Terminated,
}

/// The browsing session: mail session, cursor and archive target.
pub struct CommandLoop<S> {
    session: S,
    navigator: Navigator,
    archiver: Archiver,
    metadata: Metadata,
    state: State,
}

impl<S: MailSession> CommandLoop<S> {
    #[must_use]
    pub fn new(session: S, navigator: Navigator, archiver: Archiver) -> Self {
        Self {
            session,
            navigator,
            archiver,
            metadata: Metadata::default(),
            state: State::Displaying,
        }
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Run until the user quits.
    ///
    /// # Errors
    ///
    /// Any fetch, archive or console error ends the loop. The session is
    /// logged out before the error is returned.
    pub async fn run<R, W>(&mut self, console: &mut Console<R, W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let outcome = self.drive(console).await;
        if outcome.is_err() {
            self.session.logout().await;
            self.state = State::Terminated;
        }
        outcome
    }

    async fn drive<R, W>(&mut self, console: &mut Console<R, W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.refresh().await?;

        while self.state != State::Terminated {
            console
                .println(&format!("From: {}", self.metadata.sender))
                .await?;
            console
                .println(&format!("Subject: {}", self.metadata.subject))
                .await?;
            self.state = State::AwaitingCommand;

            let label = self.navigator.current().to_string();
            let command = console
                .prompt(&label)
                .await?
                .map_or(Some(Command::Quit), |line| Command::parse(&line));

            if let Some(command) = command {
                self.dispatch(command, console).await?;
            }
            if self.state == State::AwaitingCommand {
                self.state = State::Displaying;
            }
        }
        Ok(())
    }

    async fn dispatch<R, W>(&mut self, command: Command, console: &mut Console<R, W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let id = self.navigator.current();
        debug!("{:?} on UID {}", command, id);
        match command {
            Command::Help => console.println(HELP).await?,
            Command::Read => {
                let body = self.session.body(id).await?;
                console.println(&body).await?;
                console.println(SPACER).await?;
            }
            Command::Download => {
                let body = self.session.body(id).await?;
                self.archiver.save(id, &body).await?;
                console.println(SPACER).await?;
                console
                    .println(&format!("Message saved as: {}", Archiver::file_name(id)))
                    .await?;
                console.println(SPACER).await?;
            }
            Command::Next => {
                if self.navigator.next() {
                    self.refresh().await?;
                    console.println(SPACER).await?;
                } else {
                    console.println("No older messages.").await?;
                }
            }
            Command::Previous => {
                if self.navigator.previous() {
                    self.refresh().await?;
                    console.println(SPACER).await?;
                } else {
                    console.println("No newer messages.").await?;
                }
            }
            Command::Quit => {
                self.session.logout().await;
                self.state = State::Terminated;
                console.println(SPACER).await?;
                console.println(FAREWELL).await?;
            }
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        self.metadata = self.session.metadata(self.navigator.current()).await?;
        Ok(())
    }
}
