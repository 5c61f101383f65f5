#![doc(test(attr(deny(warnings))))]

//! Fintrack ties the recurring projection, balance, and savings vault engine
//! to JSON storage, user configuration, and a small command-line front end.

pub mod app;
pub mod cli;
pub mod clock;
pub mod errors;
pub mod format;
pub mod utils;

pub use app::FinanceApp;
pub use errors::AppError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("fintrack tracing initialized");
    });
}
