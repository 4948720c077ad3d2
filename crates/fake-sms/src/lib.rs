//! fake-sms: scrape disposable phone numbers, keep a local registry of them,
//! and read or filter the SMS they receive.

pub mod export;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod scrape;
pub mod store;
pub mod types;

pub use export::{export_file_name, export_messages, render_messages};
pub use extract::{extract_messages, extract_numbers, extract_numbers_at, format_timestamp};
pub use fetch::{FetchConfig, Fetcher, SessionCookie};
pub use filter::{filter, MessageFilter};
pub use scrape::{available_numbers, messages_for};
pub use store::{resolve_store_dir, RecordStore, DB_FILE_NAME, STORE_DIR_ENV};
pub use types::*;
