//! URL handling module for Espectro
//!
//! This module provides the `Domain` key used for all per-site crawl state,
//! and link resolution for URLs discovered on listing pages.

mod domain;
mod normalize;

pub use domain::Domain;
pub use normalize::resolve_link;
