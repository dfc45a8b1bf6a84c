//! The per-invocation view a command runs against.

use super::{CommandFailure, CommandResult, CommandSender, Permission};
use crate::host::PluginHost;
use crate::logging::log_error_chain;
use crate::messages;
use crate::types::PlayerId;

/// Everything one command invocation gets to see: the host, the sender,
/// the resolved label and the argument list.
///
/// The guard methods all answer `Err(CommandFailure)` carrying the message
/// the sender should get, so command bodies read as a straight line of `?`s:
///
/// ```no_run
/// # use plugin_toolkit::command::{CommandContext, CommandResult};
/// # async fn run(ctx: &mut CommandContext<'_>) -> CommandResult<()> {
/// ctx.require_args(2, "&cUsage: /warp <name> <delay>")?;
/// let delay = ctx.number_in_range(1, 0, 60, "&cDelay must be {min}-{max}.")?;
/// # let _ = delay; Ok(())
/// # }
/// ```
pub struct CommandContext<'a> {
    host: &'a dyn PluginHost,
    sender: CommandSender,
    label: String,
    args: Vec<String>,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        host: &'a dyn PluginHost,
        sender: CommandSender,
        label: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            host,
            sender,
            label: label.into(),
            args,
        }
    }

    pub fn host(&self) -> &'a dyn PluginHost {
        self.host
    }

    pub fn sender(&self) -> CommandSender {
        self.sender
    }

    /// The label this invocation actually used (an alias keeps its spelling,
    /// lowercased).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// The sending player, for commands that only make sense for one.
    /// The console gets the configured only-players answer.
    pub fn player(&self) -> CommandResult<PlayerId> {
        self.sender
            .player()
            .ok_or_else(|| CommandFailure::new(messages::only_players_message()))
    }

    /// Parses argument `index` as a number.
    pub fn number(&self, index: usize, error: &str) -> CommandResult<i64> {
        self.arg(index)
            .and_then(|arg| arg.parse().ok())
            .ok_or_else(|| CommandFailure::new(error))
    }

    /// Parses argument `index` as a number within `min..=max`. `{min}` and
    /// `{max}` in the error message are filled in.
    pub fn number_in_range(
        &self,
        index: usize,
        min: i64,
        max: i64,
        error: &str,
    ) -> CommandResult<i64> {
        let bounded = error
            .replace("{min}", &min.to_string())
            .replace("{max}", &max.to_string());
        let number = self.number(index, &bounded)?;
        if (min..=max).contains(&number) {
            Ok(number)
        } else {
            Err(CommandFailure::new(bounded))
        }
    }

    pub fn require(&self, condition: bool, error: &str) -> CommandResult<()> {
        if condition {
            Ok(())
        } else {
            Err(CommandFailure::new(error))
        }
    }

    /// Unwraps an option, failing the command when it is `None`.
    pub fn require_some<T>(&self, value: Option<T>, error: &str) -> CommandResult<T> {
        value.ok_or_else(|| CommandFailure::new(error))
    }

    pub fn require_args(&self, min: usize, error: &str) -> CommandResult<()> {
        self.require(self.args.len() >= min, error)
    }

    pub fn require_exact_args(&self, count: usize, error: &str) -> CommandResult<()> {
        self.require(self.args.len() == count, error)
    }

    /// Fails with the configured no-permission answer (`{prefix}` and
    /// `{permission}` substituted) unless the sender holds the node.
    pub fn require_permission(&self, permission: &impl Permission) -> CommandResult<()> {
        let node = permission.node();
        if self.host.has_permission(&self.sender, node) {
            Ok(())
        } else {
            Err(CommandFailure::new(messages::no_permission_for(node)))
        }
    }

    /// Answers the sender. Delivery failures are logged, not propagated;
    /// a command that already ran should not abort over a dropped player.
    pub async fn tell(&self, message: &str) {
        if let Err(err) = messages::tell(self.host, &self.sender, message).await {
            log_error_chain("failed to answer command sender", &err);
        }
    }

    /// Tells a different player, e.g. the target of an admin command.
    pub async fn tell_target(&self, player: PlayerId, message: &str) {
        let target = CommandSender::Player(player);
        if let Err(err) = messages::tell(self.host, &target, message).await {
            log_error_chain("failed to message command target", &err);
        }
    }
}
