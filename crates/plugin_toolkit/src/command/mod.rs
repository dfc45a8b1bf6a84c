//! Command-dispatch base types.
//!
//! A plugin command implements [`Command`] and reads its input through the
//! [`CommandContext`] guards. Every guard returns `Result<_, CommandFailure>`,
//! so `?` anywhere in `run` aborts the command and the failure's message is
//! what the sender sees. The [`CommandRegistry`] resolves labels, enforces
//! scope and permission, runs the command and delivers that message.

pub mod context;
pub mod registry;

pub use context::CommandContext;
pub use registry::{CommandRegistry, DispatchOutcome};

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::types::PlayerId;

/// Who issued a command; also the target type for chat delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandSender {
    Player(PlayerId),
    Console,
}

impl CommandSender {
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Self::Player(id) => Some(*id),
            Self::Console => None,
        }
    }

    pub fn is_console(&self) -> bool {
        matches!(self, Self::Console)
    }
}

impl fmt::Display for CommandSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "player {id}"),
            Self::Console => write!(f, "console"),
        }
    }
}

/// Which senders a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandScope {
    /// Players and the console alike.
    #[default]
    Universal,
    /// Players only; the console gets the configured only-players answer.
    PlayerOnly,
    /// Console only; players get the configured only-console answer.
    ConsoleOnly,
}

/// Aborts a running command with a message for the sender.
///
/// Guards produce these; returning one from anywhere in [`Command::run`]
/// (usually via `?`) ends the command and delivers the message. An empty
/// message aborts silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandFailure {
    message: String,
}

impl CommandFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A failure that aborts the command without answering the sender.
    pub fn silent() -> Self {
        Self::new("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type CommandResult<T> = Result<T, CommandFailure>;

/// A permission node. Plugins conventionally keep their nodes in an enum
/// and implement this on it; plain strings work too.
pub trait Permission {
    fn node(&self) -> &str;
}

impl Permission for str {
    fn node(&self) -> &str {
        self
    }
}

impl Permission for &str {
    fn node(&self) -> &str {
        self
    }
}

impl Permission for String {
    fn node(&self) -> &str {
        self
    }
}

/// One registered command.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary label, registered lowercased.
    fn name(&self) -> &str;

    /// Extra labels resolving to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Universal
    }

    /// Node checked before `run`; `None` means everyone may call it.
    fn permission(&self) -> Option<&str> {
        None
    }

    async fn run(&self, ctx: &mut CommandContext<'_>) -> CommandResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_carries_message() {
        let failure = CommandFailure::new("&cNot enough arguments.");
        assert_eq!(failure.message(), "&cNot enough arguments.");
        assert!(CommandFailure::silent().message().is_empty());
    }

    #[test]
    fn test_permission_on_strings() {
        fn node_of(p: &impl Permission) -> String {
            p.node().to_string()
        }
        assert_eq!(node_of(&"toolkit.use"), "toolkit.use");
        assert_eq!(node_of(&"toolkit.use".to_string()), "toolkit.use");
    }

    #[test]
    fn test_sender_accessors() {
        let id = PlayerId::new();
        assert_eq!(CommandSender::Player(id).player(), Some(id));
        assert_eq!(CommandSender::Console.player(), None);
        assert!(CommandSender::Console.is_console());
    }
}
