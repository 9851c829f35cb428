//! Page state machines.
//!
//! Everything in here is plain data plus transition functions, so it can be
//! unit tested natively without a browser.

pub mod counter;
pub mod dashboard;
pub mod photo;
pub mod profile;
pub mod reveal;
pub mod table;
pub mod validation;
