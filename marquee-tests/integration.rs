//! Integration tests for Marquee
//!
//! These tests run the lookup, trending and web layers together against
//! stub HTTP servers standing in for TMDB and Appwrite.

#[path = "integration/stubs.rs"]
mod stubs;

#[path = "integration/search_flow.rs"]
mod search_flow;

#[path = "integration/web_server.rs"]
mod web_server;
