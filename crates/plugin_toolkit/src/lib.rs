//! Convenience toolkit for game-server plugins.
//!
//! Everything here is a thin layer between plugin logic and the host
//! framework: chat-component builders, command-dispatch base types,
//! YAML-backed configuration with bundled defaults, per-player config files,
//! inventory menu helpers and a version-check notifier. The host itself is
//! reached through one seam, [`host::PluginHost`], which the server
//! implements once and hands to plugins as an `Arc<dyn PluginHost>`.
//!
//! # Quick start
//!
//! ```no_run
//! use plugin_toolkit::text::MessageBuilder;
//!
//! let line = MessageBuilder::new("&6[Shop] ")
//!     .append("&fClick to browse")
//!     .on_click_run_command("/shop")
//!     .on_hover_text("&7Opens the shop menu")
//!     .build();
//! # let _ = line;
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod inventory;
pub mod logging;
pub mod messages;
pub mod text;
pub mod types;
pub mod update;

pub use command::{Command, CommandContext, CommandFailure, CommandRegistry, CommandSender};
pub use error::{ConfigError, HostError, ItemError, KeyError, UpdateError};
pub use host::PluginHost;
pub use text::{colorize, strip_codes, MessageBuilder, TextComponent};
pub use types::{NamespacedKey, PlayerId, TitleTimes, Version};

#[cfg(test)]
pub(crate) mod test_util;
