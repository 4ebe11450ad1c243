//! Test support shared by the workspace crates.
//!
//! Only holds what every test binary needs regardless of which crate it
//! exercises; crate-specific fakes live next to the tests that use them.

pub mod logging;
pub mod unique_helpers;
