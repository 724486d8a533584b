//! Property-based tests for AutoKit core library

mod backend_tests;
mod bootstrap_tests;
mod cipher_tests;
mod config_tests;
mod locator_tests;
mod store_tests;
