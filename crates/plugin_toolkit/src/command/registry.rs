//! Label resolution and command dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{Command, CommandContext, CommandScope, CommandSender};
use crate::error::HostResult;
use crate::host::PluginHost;
use crate::messages;

/// What became of one raw input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A command ran (or was rejected with an answer to the sender).
    Handled,
    /// No registered command matches the label. The caller decides what to
    /// do; nothing is sent to the sender.
    UnknownCommand,
    /// The line held no label at all.
    Empty,
}

/// Holds every command a plugin registers and routes input lines to them.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
    labels: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its name and aliases, all lowercased.
    /// A label that is already taken stays with its first owner.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let index = self.commands.len();
        let mut labels = vec![command.name().to_string()];
        labels.extend(command.aliases().iter().map(|a| a.to_string()));

        for label in labels {
            let label = label.to_lowercase();
            if self.labels.contains_key(&label) {
                warn!("command label '{label}' is already registered, skipping");
                continue;
            }
            self.labels.insert(label, index);
        }
        self.commands.push(command);
    }

    /// Every registered command, in registration order. Help screens
    /// iterate this.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.iter()
    }

    pub fn resolve(&self, label: &str) -> Option<&Arc<dyn Command>> {
        self.labels
            .get(&label.to_lowercase())
            .map(|&index| &self.commands[index])
    }

    /// Dispatches one raw input line: resolves the label, enforces scope,
    /// preflights the command's permission node, runs it and delivers any
    /// failure message back to the sender.
    ///
    /// A leading slash is tolerated so both chat input and console lines
    /// route the same way.
    pub async fn dispatch(
        &self,
        host: &dyn PluginHost,
        sender: CommandSender,
        line: &str,
    ) -> HostResult<DispatchOutcome> {
        let mut words = line.trim().trim_start_matches('/').split_whitespace();
        let Some(label) = words.next() else {
            return Ok(DispatchOutcome::Empty);
        };
        let label = label.to_lowercase();
        let args: Vec<String> = words.map(str::to_string).collect();

        let Some(command) = self.resolve(&label) else {
            return Ok(DispatchOutcome::UnknownCommand);
        };

        match (command.scope(), sender) {
            (CommandScope::PlayerOnly, CommandSender::Console) => {
                messages::tell(host, &sender, &messages::only_players_message()).await?;
                return Ok(DispatchOutcome::Handled);
            }
            (CommandScope::ConsoleOnly, CommandSender::Player(_)) => {
                messages::tell(host, &sender, &messages::only_console_message()).await?;
                return Ok(DispatchOutcome::Handled);
            }
            _ => {}
        }

        if let Some(node) = command.permission() {
            if !host.has_permission(&sender, node) {
                messages::tell(host, &sender, &messages::no_permission_for(node)).await?;
                return Ok(DispatchOutcome::Handled);
            }
        }

        debug!("dispatching '{label}' for {sender}");
        let mut ctx = CommandContext::new(host, sender, label, args);
        if let Err(failure) = command.run(&mut ctx).await {
            messages::tell(host, &sender, failure.message()).await?;
        }
        Ok(DispatchOutcome::Handled)
    }
}
