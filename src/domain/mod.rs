//! Pure data types for the intake form. No I/O.

pub mod canonical;
pub mod common;
pub mod contact;
pub mod form;
pub mod hours;
pub mod selection;
pub mod service;
pub mod steps;

pub use canonical::*;
pub use common::*;
pub use contact::*;
pub use form::*;
pub use hours::*;
pub use selection::*;
pub use service::*;
pub use steps::*;
