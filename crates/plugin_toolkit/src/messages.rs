//! Player messaging and the shared message settings.
//!
//! A plugin configures its chat prefix and the handful of stock answers
//! (no permission, wrong sender, update available) once at startup; every
//! delivery helper then substitutes `{prefix}` and colorizes before handing
//! the component to the host. The settings are process-global on purpose:
//! they are plugin-wide strings, and threading them through every call site
//! buys nothing.

use once_cell::sync::Lazy;
use std::sync::RwLock;

use crate::command::CommandSender;
use crate::error::{HostError, HostResult};
use crate::host::PluginHost;
use crate::text::{colorize, TextComponent};
use crate::types::{PlayerId, TitleTimes};

/// The stock strings every plugin ends up needing.
#[derive(Debug, Clone)]
pub struct MessageSettings {
    /// Substituted for `{prefix}` in every delivered message.
    pub prefix: String,
    /// Sent when a permission check fails. `{permission}` names the node.
    pub no_permission: String,
    /// Sent when the console runs a player-only command.
    pub only_players: String,
    /// Sent when a player runs a console-only command.
    pub only_console: String,
    /// Sent (or logged) when the update checker finds a newer release.
    pub update_available: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            no_permission: "&cYou do not have permission to do that.".to_string(),
            only_players: "&cI'm sorry only players can use this command.".to_string(),
            only_console: "&cThis command may only be used from the console.".to_string(),
            update_available: String::new(),
        }
    }
}

static SETTINGS: Lazy<RwLock<MessageSettings>> = Lazy::new(|| RwLock::new(MessageSettings::default()));

fn read() -> MessageSettings {
    SETTINGS.read().unwrap_or_else(|e| e.into_inner()).clone()
}

fn write(apply: impl FnOnce(&mut MessageSettings)) {
    apply(&mut SETTINGS.write().unwrap_or_else(|e| e.into_inner()));
}

/// Replaces the whole settings block. Typically called once from a plugin's
/// enable path after its config loads.
pub fn configure(settings: MessageSettings) {
    write(|s| *s = settings);
}

pub fn settings() -> MessageSettings {
    read()
}

pub fn set_prefix(prefix: impl Into<String>) {
    write(|s| s.prefix = prefix.into());
}

pub fn prefix() -> String {
    read().prefix
}

pub fn set_no_permission_message(message: impl Into<String>) {
    write(|s| s.no_permission = message.into());
}

pub fn set_only_players_message(message: impl Into<String>) {
    write(|s| s.only_players = message.into());
}

pub fn set_only_console_message(message: impl Into<String>) {
    write(|s| s.only_console = message.into());
}

pub fn set_update_available_message(message: impl Into<String>) {
    write(|s| s.update_available = message.into());
}

pub fn update_available_message() -> String {
    read().update_available
}

/// The no-permission answer with `{prefix}` and `{permission}` filled in.
pub fn no_permission_for(node: &str) -> String {
    let settings = read();
    settings
        .no_permission
        .replace("{prefix}", &settings.prefix)
        .replace("{permission}", node)
}

pub fn only_players_message() -> String {
    read().only_players
}

pub fn only_console_message() -> String {
    read().only_console
}

/// Turns a raw message into the component that actually goes out:
/// `{prefix}` substituted, color codes translated, legacy codes parsed.
pub fn render(message: &str) -> TextComponent {
    TextComponent::from_legacy(&colorize(&message.replace("{prefix}", &prefix())))
}

/// Tells a sender one message. Empty messages are silently skipped, so
/// plugins can blank out an answer in config to suppress it.
pub async fn tell(host: &dyn PluginHost, target: &CommandSender, message: &str) -> HostResult<()> {
    if message.is_empty() {
        return Ok(());
    }
    host.send_chat(target, &render(message)).await
}

/// Tells a sender several lines in order.
pub async fn tell_each(
    host: &dyn PluginHost,
    target: &CommandSender,
    messages: &[&str],
) -> HostResult<()> {
    for message in messages {
        tell(host, target, message).await?;
    }
    Ok(())
}

/// Shows a title and subtitle with the stock timing: 20 ticks fade-in,
/// 60 stay, 10 fade-out.
pub async fn send_title(
    host: &dyn PluginHost,
    player: PlayerId,
    title: &str,
    subtitle: &str,
) -> HostResult<()> {
    host.send_title(
        player,
        &render(title),
        &render(subtitle),
        TitleTimes::default(),
    )
    .await
}

/// Writes a message to a player's hotbar area. Hosts without that surface
/// get the message as regular chat instead.
pub async fn send_action_bar(
    host: &dyn PluginHost,
    player: PlayerId,
    message: &str,
) -> HostResult<()> {
    match host.send_action_bar(player, &render(message)).await {
        Err(HostError::Unsupported(_)) => {
            tell(host, &CommandSender::Player(player), message).await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{settings_guard, RecordingHost};

    #[tokio::test]
    async fn test_tell_substitutes_prefix_and_colorizes() {
        let _guard = settings_guard();
        set_prefix("&6[Test]&r ");
        let host = RecordingHost::new();
        let target = CommandSender::Player(PlayerId::new());

        tell(&host, &target, "{prefix}&ahello").await.unwrap();

        let chats = host.chats();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].1.plain_text(), "[Test] hello");
    }

    #[tokio::test]
    async fn test_tell_skips_empty_messages() {
        let _guard = settings_guard();
        let host = RecordingHost::new();
        tell(&host, &CommandSender::Console, "").await.unwrap();
        assert!(host.chats().is_empty());
    }

    #[tokio::test]
    async fn test_tell_each_keeps_order() {
        let _guard = settings_guard();
        let host = RecordingHost::new();
        let target = CommandSender::Console;

        tell_each(&host, &target, &["one", "", "two"]).await.unwrap();

        let chats = host.chats();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].1.plain_text(), "one");
        assert_eq!(chats[1].1.plain_text(), "two");
    }

    #[test]
    fn test_no_permission_fills_placeholders() {
        let _guard = settings_guard();
        set_prefix("[P] ");
        set_no_permission_message("{prefix}&cYou need {permission}.");

        let message = no_permission_for("toolkit.admin");
        assert_eq!(message, "[P] &cYou need toolkit.admin.");
    }

    #[tokio::test]
    async fn test_title_uses_stock_times() {
        let _guard = settings_guard();
        let host = RecordingHost::new();
        let player = PlayerId::new();

        send_title(&host, player, "&6Welcome", "&7enjoy").await.unwrap();

        let titles = host.titles();
        assert_eq!(titles.len(), 1);
        let (who, title, subtitle, times) = &titles[0];
        assert_eq!(*who, player);
        assert_eq!(title.plain_text(), "Welcome");
        assert_eq!(subtitle.plain_text(), "enjoy");
        assert_eq!(*times, TitleTimes::default());
    }

    #[tokio::test]
    async fn test_action_bar_falls_back_to_chat() {
        let _guard = settings_guard();
        let host = RecordingHost::new().without_action_bar();
        let player = PlayerId::new();

        send_action_bar(&host, player, "&elook up").await.unwrap();

        assert!(host.action_bars().is_empty());
        let chats = host.chats();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].0, CommandSender::Player(player));
    }

    #[tokio::test]
    async fn test_action_bar_uses_hotbar_when_supported() {
        let _guard = settings_guard();
        let host = RecordingHost::new();
        let player = PlayerId::new();

        send_action_bar(&host, player, "&elook up").await.unwrap();

        assert_eq!(host.action_bars().len(), 1);
        assert!(host.chats().is_empty());
    }
}
