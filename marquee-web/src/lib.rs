//! Marquee Web - HTMX movie discovery UI and JSON API

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Server-rendered page with HTMX partial updates for search results and
//! the trending list, plus JSON endpoints for external clients.

pub mod components;
pub mod handlers;
pub mod htmx;
pub mod pages;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server};
