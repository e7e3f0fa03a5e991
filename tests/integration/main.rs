//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! fetcher and full runs end-to-end.

mod common;
mod fetch_tests;
mod run_tests;
