//! fintrack-core
//!
//! Recurring projection, balance aggregation, and savings vault logic.
//! Depends on fintrack-domain. No terminal I/O and no system clock access:
//! every entry point takes "today" or "now" from the caller.

pub mod alerts;
pub mod balance;
pub mod error;
pub mod expansion;
pub mod insights;
pub mod occurrence;
pub mod records;
pub mod storage;
pub mod templates;
pub mod time;
pub mod upcoming;
pub mod vault;

pub use alerts::*;
pub use balance::*;
pub use error::CoreError;
pub use expansion::*;
pub use insights::*;
pub use occurrence::*;
pub use records::RecordService;
pub use templates::TemplateService;
pub use time::Clock;
pub use upcoming::*;
pub use vault::*;
