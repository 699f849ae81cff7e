//! Integration tests for Page-Scribe
//!
//! These tests use wiremock to serve pages and run the full
//! fetch, extract and store cycle end-to-end.

mod scrape_tests;
