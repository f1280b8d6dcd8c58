//! Reusable HTML components for the HTMX + Tailwind UI
//!
//! Components are server-rendered HTML fragments used both in the full page
//! and as HTMX partial updates. All styling uses Tailwind CSS.

pub mod layout;
pub mod movies;
pub mod trending;

// Re-export main component functions
pub use layout::{escape, render_page, search_input};
pub use movies::{movie_card, results_section, spinner};
pub use trending::trending_section;
