//! Shared test fixtures: a recording mock host and a guard serializing
//! tests that touch the global message settings.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::command::CommandSender;
use crate::error::{HostError, HostResult};
use crate::host::PluginHost;
use crate::messages::{self, MessageSettings};
use crate::text::TextComponent;
use crate::types::{PlayerId, TitleTimes, Version};

static SETTINGS_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that read or write the global message settings, and
/// resets them to defaults on entry so tests cannot leak into each other.
pub fn settings_guard() -> MutexGuard<'static, ()> {
    let guard = SETTINGS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    messages::configure(MessageSettings::default());
    guard
}

/// In-memory host that records every delivery for assertions.
pub struct RecordingHost {
    plugin_version: String,
    server_version: Version,
    data_dir: PathBuf,
    action_bar_supported: bool,
    granted: Mutex<Option<Vec<String>>>,
    chats: Mutex<Vec<(CommandSender, TextComponent)>>,
    titles: Mutex<Vec<(PlayerId, TextComponent, TextComponent, TitleTimes)>>,
    action_bars: Mutex<Vec<(PlayerId, TextComponent)>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            plugin_version: "0.0.1".to_string(),
            server_version: Version::new(1, 21, 0),
            data_dir: PathBuf::from("."),
            action_bar_supported: true,
            granted: Mutex::new(None),
            chats: Mutex::new(Vec::new()),
            titles: Mutex::new(Vec::new()),
            action_bars: Mutex::new(Vec::new()),
        }
    }

    /// A host whose client protocol predates the hotbar message surface.
    pub fn without_action_bar(mut self) -> Self {
        self.action_bar_supported = false;
        self
    }

    pub fn with_plugin_version(mut self, version: &str) -> Self {
        self.plugin_version = version.to_string();
        self
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = dir.to_path_buf();
        self
    }

    /// Switches permission checks from allow-all to an explicit grant list.
    pub fn grant_only(self, nodes: &[&str]) -> Self {
        *self.granted.lock().unwrap() = Some(nodes.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn chats(&self) -> Vec<(CommandSender, TextComponent)> {
        self.chats.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<(PlayerId, TextComponent, TextComponent, TitleTimes)> {
        self.titles.lock().unwrap().clone()
    }

    pub fn action_bars(&self) -> Vec<(PlayerId, TextComponent)> {
        self.action_bars.lock().unwrap().clone()
    }
}

#[async_trait]
impl PluginHost for RecordingHost {
    fn plugin_name(&self) -> &str {
        "test_plugin"
    }

    fn plugin_version(&self) -> &str {
        &self.plugin_version
    }

    fn server_version(&self) -> Version {
        self.server_version.clone()
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
        player: PlayerId,
        title: &TextComponent,
        subtitle: &TextComponent,
        times: TitleTimes,
    ) -> HostResult<()> {
        self.titles
            .lock()
            .unwrap()
            .push((player, title.clone(), subtitle.clone(), times));
        Ok(())
    }

    async fn send_action_bar(&self, player: PlayerId, component: &TextComponent) -> HostResult<()> {
        if !self.action_bar_supported {
            return Err(HostError::Unsupported("action bars"));
        }
        self.action_bars
            .lock()
            .unwrap()
            .push((player, component.clone()));
        Ok(())
    }

    fn has_permission(&self, sender: &CommandSender, node: &str) -> bool {
        // Consoles hold every node, like real hosts.
        if matches!(sender, CommandSender::Console) {
            return true;
        }
        match &*self.granted.lock().unwrap() {
            Some(nodes) => nodes.iter().any(|n| n == node),
            None => true,
        }
    }
}
