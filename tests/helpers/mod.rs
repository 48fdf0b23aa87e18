// Shared fixtures for HTTP integration tests.
//
// Include from a test target with:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;

#![allow(dead_code)]

pub mod test_app;

pub use test_app::*;
pub use test_data::*;
