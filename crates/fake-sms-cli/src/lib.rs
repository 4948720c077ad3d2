//! fake-sms CLI: interactive menu and one-shot commands over the
//! `fake-sms` library.

pub mod commands;
pub mod config;
pub mod menu;
pub mod session;

pub use config::{resolve_export_dir, resolve_fetch_config, resolve_store_dir};
pub use menu::{LinePrompt, Prompt};
pub use session::Session;
