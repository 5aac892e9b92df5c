#![doc(test(attr(deny(warnings))))]

//! Referral Intake implements the agency intake wizard of a 211 referral
//! network: editable hours/contact/service lists, the step navigator with its
//! conditional validation rules, and the conversion of the finished form into
//! the canonical record handed to persistence.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(None);
        tracing::info!("Referral intake tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
