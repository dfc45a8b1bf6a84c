//! Example MOTD plugin consuming the toolkit end to end: bundled config
//! defaults, a `/motd` command family, per-player toggle files, interactive
//! join messages and the update notifier.

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use plugin_toolkit::command::{
    Command, CommandContext, CommandFailure, CommandRegistry, CommandResult, CommandScope,
    CommandSender, DispatchOutcome,
};
use plugin_toolkit::config::{PlayerConfigs, SimpleConfig};
use plugin_toolkit::error::HostResult;
use plugin_toolkit::host::PluginHost;
use plugin_toolkit::messages::{self, MessageSettings};
use plugin_toolkit::text::MessageBuilder;
use plugin_toolkit::types::{PlayerId, Version};
use plugin_toolkit::update::{UpdateChecker, UpdateListener};

/// The default config text shipped inside the plugin binary.
const DEFAULT_CONFIG: &str = include_str!("../defaults/motd.yml");

const CONFIG_FILE: &str = "motd.yml";

/// Node required for `/motd set` and `/motd reload`.
const ADMIN_NODE: &str = "motd.admin";

/// Shared, reloadable view of the plugin's config.
type SharedConfig = Arc<Mutex<SimpleConfig>>;

fn lock(config: &SharedConfig) -> MutexGuard<'_, SimpleConfig> {
    config.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct MotdPlugin {
    host: Arc<dyn PluginHost>,
    config: SharedConfig,
    players: Arc<PlayerConfigs>,
    commands: CommandRegistry,
    update_task: Option<JoinHandle<()>>,
}

impl MotdPlugin {
    /// Brings the plugin up: config from the bundle, message settings,
    /// per-player files, commands and (when configured) the update task.
    pub fn enable(host: Arc<dyn PluginHost>) -> anyhow::Result<Self> {
        let mut config = SimpleConfig::with_defaults(host.data_dir(), CONFIG_FILE, DEFAULT_CONFIG)
            .context("failed to load motd.yml")?;
        config.set_header(&[
            "MOTD plugin configuration.",
            "Comments outside this header are lost when the plugin rewrites the file.",
        ]);
        apply_message_settings(&mut config)?;

        let players = Arc::new(
            PlayerConfigs::new(host.data_dir()).context("failed to prepare player data dir")?,
        );
        let config = Arc::new(Mutex::new(config));

        let mut commands = CommandRegistry::new();
        commands.register(Arc::new(MotdCommand {
            config: config.clone(),
            players: players.clone(),
        }));

        let mut plugin = Self {
            host,
            config,
            players,
            commands,
            update_task: None,
        };
        plugin.start_update_checker()?;
        info!("MOTD plugin enabled");
        Ok(plugin)
    }

    /// Saves player data and stops the update task.
    pub fn disable(&mut self) {
        if let Some(task) = self.update_task.take() {
            task.abort();
        }
        let saved = self.players.save_all();
        info!("MOTD plugin disabled, {saved} player file(s) saved");
    }

    /// Routes one raw command line from the host.
    pub async fn handle_command(
        &self,
        sender: CommandSender,
        line: &str,
    ) -> HostResult<DispatchOutcome> {
        self.commands.dispatch(self.host.as_ref(), sender, line).await
    }

    /// Greets a joining player, unless they toggled the MOTD off.
    pub async fn on_join(&self, player: PlayerId) -> anyhow::Result<()> {
        if !self.wants_motd(player) {
            return Ok(());
        }

        let (lines, footer, title) = {
            let mut config = lock(&self.config);
            if !config.get_bool("motd.enabled")? {
                return Ok(());
            }
            let lines = config.get_string_list("motd.lines")?;
            let footer = (
                config.get_string("motd.footer.text")?,
                config.get_string("motd.footer.command")?,
                config.get_string("motd.footer.hover")?,
            );
            let title = config
                .get_bool("title.enabled")?
                .then(|| -> anyhow::Result<_> {
                    Ok((
                        config.get_string("title.main")?,
                        config.get_string("title.subtitle")?,
                    ))
                })
                .transpose()?;
            (lines, footer, title)
        };

        let target = CommandSender::Player(player);
        for line in &lines {
            messages::tell(self.host.as_ref(), &target, line).await?;
        }

        let (text, command, hover) = footer;
        MessageBuilder::new(&messages::prefix())
            .append(&text)
            .on_click_run_command(&command)
            .on_hover_text(&hover)
            .send(self.host.as_ref(), &[target])
            .await?;

        if let Some((main, subtitle)) = title {
            messages::send_title(self.host.as_ref(), player, &main, &subtitle).await?;
        }
        Ok(())
    }

    fn wants_motd(&self, player: PlayerId) -> bool {
        match self.players.get(player) {
            // Absent key means the player never toggled; default on.
            Ok(config) => config.get_bool("motd.enabled").ok().flatten().unwrap_or(true),
            Err(_) => true,
        }
    }

    fn start_update_checker(&mut self) -> anyhow::Result<()> {
        let mut config = lock(&self.config);
        if !config.get_bool("update-check.enabled")? {
            return Ok(());
        }
        let resource = config.get_i64("update-check.resource")?;
        let hours = config.get_i64("update-check.interval-hours")?.max(1);
        drop(config);

        let checker = UpdateChecker::new(
            resource as u64,
            Version::parse(self.host.plugin_version()),
        );
        let listener = Arc::new(AnnounceUpdate);
        self.update_task = Some(checker.spawn(
            Duration::from_secs(hours as u64 * 60 * 60),
            listener,
        ));
        Ok(())
    }
}

/// Pushes the `messages:` section of the config into the toolkit's shared
/// message settings.
fn apply_message_settings(config: &mut SimpleConfig) -> anyhow::Result<()> {
    messages::configure(MessageSettings {
        prefix: config.get_string("prefix")?,
        no_permission: config.get_string("messages.no-permission")?,
        only_players: config.get_string("messages.only-players")?,
        only_console: config.get_string("messages.only-console")?,
        update_available: config.get_string("messages.update-available")?,
    });
    Ok(())
}

struct AnnounceUpdate;

#[async_trait]
impl UpdateListener for AnnounceUpdate {
    async fn on_update_available(&self, latest: &Version) {
        let message = messages::update_available_message().replace("{version}", &latest.to_string());
        if !message.is_empty() {
            info!("{message}");
        }
    }
}

/// `/motd` — show the MOTD; `set`, `reload` (admin) and `toggle` subcommands.
struct MotdCommand {
    config: SharedConfig,
    players: Arc<PlayerConfigs>,
}

impl MotdCommand {
    fn message(&self, key: &str) -> CommandResult<String> {
        lock(&self.config)
            .get_string(&format!("messages.{key}"))
            .map_err(|err| CommandFailure::new(format!("&cConfig error: {err}")))
    }

    async fn show(&self, ctx: &CommandContext<'_>) -> CommandResult<()> {
        let lines = lock(&self.config)
            .get_string_list("motd.lines")
            .map_err(|err| CommandFailure::new(format!("&cConfig error: {err}")))?;
        for line in &lines {
            ctx.tell(line).await;
        }
        Ok(())
    }

    async fn set(&self, ctx: &CommandContext<'_>) -> CommandResult<()> {
        ctx.require_permission(&ADMIN_NODE)?;
        let usage = self.message("set-usage")?;
        ctx.require_args(2, &usage)?;

        let text = ctx.args()[1..].join(" ");
        lock(&self.config)
            .write("motd.lines", vec![text])
            .map_err(|err| CommandFailure::new(format!("&cFailed to save: {err}")))?;
        ctx.tell(&self.message("line-set")?).await;
        Ok(())
    }

    async fn reload(&self, ctx: &CommandContext<'_>) -> CommandResult<()> {
        ctx.require_permission(&ADMIN_NODE)?;
        {
            let mut config = lock(&self.config);
            config
                .reload()
                .map_err(|err| CommandFailure::new(format!("&cReload failed: {err}")))?;
            apply_message_settings(&mut config)
                .map_err(|err| CommandFailure::new(format!("&cReload failed: {err}")))?;
        }
        ctx.tell(&self.message("reloaded")?).await;
        Ok(())
    }

    async fn toggle(&self, ctx: &CommandContext<'_>) -> CommandResult<()> {
        let player = ctx.player()?;
        let config = self
            .players
            .get(player)
            .map_err(|err| CommandFailure::new(format!("&cData error: {err}")))?;

        let enabled = !config.get_bool("motd.enabled").ok().flatten().unwrap_or(true);
        config.set("motd.enabled", enabled);
        config
            .save()
            .map_err(|err| CommandFailure::new(format!("&cData error: {err}")))?;

        let key = if enabled { "toggled-on" } else { "toggled-off" };
        ctx.tell(&self.message(key)?).await;
        Ok(())
    }
}

#[async_trait]
impl Command for MotdCommand {
    fn name(&self) -> &str {
        "motd"
    }

    fn aliases(&self) -> &[&str] {
        &["messageoftheday"]
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Universal
    }

    async fn run(&self, ctx: &mut CommandContext<'_>) -> CommandResult<()> {
        match ctx.arg(0) {
            None | Some("show") => self.show(ctx).await,
            Some("set") => self.set(ctx).await,
            Some("reload") => self.reload(ctx).await,
            Some("toggle") => self.toggle(ctx).await,
            Some(other) => Err(CommandFailure::new(format!(
                "&cUnknown subcommand '&7{other}&c'. Try show, set, reload or toggle."
            ))),
        }
    }
}
