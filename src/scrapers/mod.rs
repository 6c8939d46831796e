//! Category page scraping.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Discovery** ([`discover`]): page through the category listing and
//!    collect article URLs
//! 2. **Extraction** ([`article`]): fetch each article and pull out its
//!    title, body, publish date and cover image
//!
//! Both phases are strictly sequential and pace themselves with a fixed
//! delay after every request.

pub mod article;
pub mod discover;

pub use article::extract;
pub use discover::discover;
