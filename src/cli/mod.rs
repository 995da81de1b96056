pub mod inspect;
pub mod list_actions;
pub mod list_keybinds;
pub mod serve;
pub mod stats;
pub mod validate_config;
