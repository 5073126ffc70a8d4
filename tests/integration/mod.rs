//! Integration tests for quizwheel

mod cli_smoke;
mod config_integration;
mod http_source;
mod store_integration;
mod test_utils;
