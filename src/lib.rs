pub mod clipboard;
pub mod commands;
pub mod config;
pub mod deferred;
pub mod dom;
pub mod dropdown;
pub mod editor;
pub mod inspector;
pub mod keybindings;
pub mod messaging;
pub mod panel;
pub mod results;
pub mod stats_popup;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
