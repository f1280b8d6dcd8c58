//! Full page handlers
//!
//! Pages compose components into complete HTML responses.

pub mod home;

pub use home::home_page;
