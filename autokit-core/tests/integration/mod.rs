//! Integration tests across store, config and export

pub mod export_tests;
pub mod store_tests;
