//! End-to-end tests driving the toolkit the way a plugin would: config with
//! bundled defaults, command dispatch against a mock host, and item blobs
//! persisted through a player config.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::TempDir;

use plugin_toolkit::command::{
    Command, CommandContext, CommandRegistry, CommandResult, CommandSender, DispatchOutcome,
};
use plugin_toolkit::config::{PlayerConfigs, SimpleConfig};
use plugin_toolkit::error::HostResult;
use plugin_toolkit::host::PluginHost;
use plugin_toolkit::inventory::{decode_items, menu_item, InventoryView, ItemStack};
use plugin_toolkit::text::TextComponent;
use plugin_toolkit::types::{NamespacedKey, PlayerId, TitleTimes, Version};
use plugin_toolkit::messages;

// The message settings are process-global; tests touching them take this.
static SETTINGS: Mutex<()> = Mutex::new(());

fn settings_guard() -> MutexGuard<'static, ()> {
    let guard = SETTINGS.lock().unwrap_or_else(|e| e.into_inner());
    messages::configure(messages::MessageSettings::default());
    guard
}

struct TestHost {
    data_dir: PathBuf,
    chats: Mutex<Vec<(CommandSender, TextComponent)>>,
}

impl TestHost {
    fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            chats: Mutex::new(Vec::new()),
        }
    }

    fn chat_lines(&self) -> Vec<String> {
        self.chats
            .lock()
            .unwrap()
            .iter()
            .map(|(_, component)| component.plain_text())
            .collect()
    }
}

#[async_trait]
impl PluginHost for TestHost {
    fn plugin_name(&self) -> &str {
        "integration"
    }

    fn plugin_version(&self) -> &str {
        "1.0.0"
    }

    fn server_version(&self) -> Version {
        Version::new(1, 21, 0)
    }

    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn send_chat(&self, target: &CommandSender, component: &TextComponent) -> HostResult<()> {
        self.chats.lock().unwrap().push((*target, component.clone()));
        Ok(())
    }

    async fn send_title(
        &self,
        _player: PlayerId,
        _title: &TextComponent,
        _subtitle: &TextComponent,
        _times: TitleTimes,
    ) -> HostResult<()> {
        Ok(())
    }

    async fn send_action_bar(&self, _player: PlayerId, _component: &TextComponent) -> HostResult<()> {
        Ok(())
    }

    fn has_permission(&self, sender: &CommandSender, node: &str) -> bool {
        sender.is_console() || node != "vault.admin"
    }
}

const SETTINGS_BUNDLE: &str = "\
prefix: '&8[&6Vault&8]&r '
vault:
  rows: 2
  title: '&8Your vault'
";

/// A vault command: players stash a button item into their per-player
/// config as a blob, then read it back.
struct VaultCommand {
    configs: Arc<PlayerConfigs>,
    view_rows: usize,
}

#[async_trait]
impl Command for VaultCommand {
    fn name(&self) -> &str {
        "vault"
    }

    fn aliases(&self) -> &[&str] {
        &["stash"]
    }

    fn permission(&self) -> Option<&str> {
        Some("vault.use")
    }

    async fn run(&self, ctx: &mut CommandContext<'_>) -> CommandResult<()> {
        let player = ctx.player()?;
        ctx.require_args(1, "&cUsage: /vault <save|load>")?;

        let config = self
            .configs
            .get(player)
            .map_err(|_| plugin_toolkit::command::CommandFailure::new("&cVault unavailable."))?;

        match ctx.arg(0) {
            Some("save") => {
                let mut view = InventoryView::new("&8Your vault", self.view_rows);
                let key = NamespacedKey::minecraft("emerald").unwrap();
                view.place(5, menu_item(key, 3, "&aSavings", &["&7Nest egg"]))
                    .map_err(|_| plugin_toolkit::command::CommandFailure::silent())?;
                let blob = view
                    .to_blob()
                    .map_err(|_| plugin_toolkit::command::CommandFailure::new("&cSave failed."))?;
                config.set("vault.contents", blob);
                config
                    .save()
                    .map_err(|_| plugin_toolkit::command::CommandFailure::new("&cSave failed."))?;
                ctx.tell("{prefix}&aVault saved.").await;
            }
            Some("load") => {
                let blob = ctx.require_some(
                    config.get_string("vault.contents").ok().flatten(),
                    "&cNothing stashed yet.",
                )?;
                let items = decode_items(&blob)
                    .map_err(|_| plugin_toolkit::command::CommandFailure::new("&cCorrupt vault."))?;
                let stacks: Vec<&ItemStack> = items.iter().flatten().collect();
                ctx.tell(&format!("{{prefix}}&7Restored {} stack(s).", stacks.len()))
                    .await;
            }
            _ => ctx.tell("&cUsage: /vault <save|load>").await,
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_vault_flow_end_to_end() {
    let _guard = settings_guard();
    let dir = TempDir::new().unwrap();
    let host = TestHost::new(dir.path());

    // Config comes up from the bundle and feeds the message settings.
    let mut settings = SimpleConfig::with_defaults(dir.path(), "settings.yml", SETTINGS_BUNDLE)
        .expect("bundle loads");
    messages::set_prefix(settings.get_string("prefix").unwrap());
    let rows = settings.get_i64("vault.rows").unwrap() as usize;

    let configs = Arc::new(PlayerConfigs::new(dir.path()).unwrap());
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(VaultCommand {
        configs: configs.clone(),
        view_rows: rows,
    }));

    let player = PlayerId::new();
    let sender = CommandSender::Player(player);

    // Save through the alias, load through the name.
    let outcome = registry.dispatch(&host, sender, "/stash save").await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Handled);
    let outcome = registry.dispatch(&host, sender, "vault load").await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Handled);

    let lines = host.chat_lines();
    assert_eq!(lines, vec![
        "[Vault] Vault saved.".to_string(),
        "[Vault] Restored 1 stack(s).".to_string(),
    ]);

    // The blob really lives in the player's file.
    assert_eq!(configs.save_all(), 1);
    let reopened = PlayerConfigs::new(dir.path()).unwrap();
    let config = reopened.get(player).unwrap();
    let blob = config.get_string("vault.contents").unwrap().unwrap();
    let items = decode_items(&blob).unwrap();
    assert_eq!(items.len(), rows * 9);
    assert_eq!(items.iter().flatten().count(), 1);
}

#[tokio::test]
async fn test_dispatch_guards_from_outside() {
    let _guard = settings_guard();
    messages::set_only_players_message("&cPlayers only.");
    let dir = TempDir::new().unwrap();
    let host = TestHost::new(dir.path());

    let configs = Arc::new(PlayerConfigs::new(dir.path()).unwrap());
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(VaultCommand {
        configs,
        view_rows: 1,
    }));

    // Console passes the permission preflight but fails the player guard.
    registry
        .dispatch(&host, CommandSender::Console, "vault save")
        .await
        .unwrap();
    // Usage guard fires before anything touches the filesystem.
    let player = CommandSender::Player(PlayerId::new());
    registry.dispatch(&host, player, "vault").await.unwrap();
    // Unknown labels answer nobody.
    let outcome = registry.dispatch(&host, player, "warp").await.unwrap();
    assert_eq!(outcome, DispatchOutcome::UnknownCommand);

    let lines = host.chat_lines();
    assert_eq!(lines, vec![
        "Players only.".to_string(),
        "Usage: /vault <save|load>".to_string(),
    ]);
}
