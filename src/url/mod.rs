//! URL handling module for Course-Mirror
//!
//! This module provides view-URL derivation for chapter pages and the
//! link/image resolution rules shared by the page extractors.

mod resolve;
mod view;

pub use resolve::{resolve_image, resolve_link};
pub use view::derive_view_url;
