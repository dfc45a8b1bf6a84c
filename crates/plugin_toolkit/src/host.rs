//! The seam between the toolkit and the host framework.
//!
//! Every helper in this crate that ultimately touches a player, the console
//! or the plugin's data folder goes through [`PluginHost`]. The host server
//! implements it once and hands plugins an `Arc<dyn PluginHost>`; tests
//! implement it with an in-memory recorder.

use async_trait::async_trait;
use std::path::Path;

use crate::command::CommandSender;
use crate::error::HostResult;
use crate::text::TextComponent;
use crate::types::{PlayerId, TitleTimes, Version};

/// Host-framework surface the toolkit forwards work to.
///
/// The trait is object safe on purpose: plugins keep a single
/// `Arc<dyn PluginHost>` around and thread it through the helpers.
#[async_trait]
pub trait PluginHost: Send + Sync {
    /// Name the plugin is registered under with the host.
    fn plugin_name(&self) -> &str;

    /// Version string the running plugin was built as.
    fn plugin_version(&self) -> &str;

    /// Version of the server the plugin runs inside, for feature gates like
    /// [`Version::at_least`].
    fn server_version(&self) -> Version;

    /// Directory the host assigned this plugin for its files.
    fn data_dir(&self) -> &Path;

    /// Delivers a chat component to a player or the console.
    ///
    /// Console targets conventionally get the component flattened to plain
    /// text on the host side; [`crate::text::strip_codes`] exists for that.
    async fn send_chat(&self, target: &CommandSender, component: &TextComponent) -> HostResult<()>;

    /// Shows a title and subtitle on a player's screen.
    async fn send_title(
        &self,
        player: PlayerId,
        title: &TextComponent,
        subtitle: &TextComponent,
        times: TitleTimes,
    ) -> HostResult<()>;

    /// Writes a component to the hotbar area above a player's inventory.
    ///
    /// Hosts without that surface answer [`crate::error::HostError::Unsupported`];
    /// callers going through [`crate::messages::send_action_bar`] then fall
    /// back to regular chat.
    async fn send_action_bar(&self, player: PlayerId, component: &TextComponent) -> HostResult<()>;

    /// Whether the sender holds the given permission node. Hosts
    /// conventionally grant the console every node.
    fn has_permission(&self, sender: &CommandSender, node: &str) -> bool;
}
