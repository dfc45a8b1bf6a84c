//! YAML-backed configuration.
//!
//! Three layers, each thin: [`YamlDocument`] is one file on disk with
//! dotted-path access and atomic saves, [`SimpleConfig`] adds the bundled
//! defaults a plugin ships inside its binary, and [`PlayerConfigs`] manages
//! one small document per player under the plugin's data folder.

pub mod document;
pub mod players;
pub mod simple;

pub use document::YamlDocument;
pub use players::{PlayerConfig, PlayerConfigs};
pub use simple::SimpleConfig;
