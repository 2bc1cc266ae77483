// Adapters layer: concrete implementations of the domain ports (storage, csv, notification).

pub mod csv_io;
pub mod notifier;
pub mod storage;

pub use notifier::{ConfiguredNotifier, LogNotifier, SendGridNotifier};
pub use storage::LocalStorage;
