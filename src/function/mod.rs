pub mod config;
pub mod catalog;
pub mod classifier;
pub mod prober;
pub mod scanner;
pub mod aggregate;
pub mod report;
pub mod console;
pub mod menu;
pub mod error;

pub use self::config::Config;
pub use self::scanner::{Scanner, ScanSession, ScanMode, ScanObserver, run_scan};
pub use self::report::Finding;
pub use self::error::ScanError;
