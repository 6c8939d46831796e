//! Report output files.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`Report`](crate::report::Report) as JSON for other tools
//! - [`markdown`]: Renders the report as a readable Markdown page
//!
//! # Output Structure
//!
//! ```text
//! report_dir/
//! ├── 2025-05-06/
//! │   └── report.json
//! └── 2025-05-06_report.md
//! ```
//!
//! A later run on the same day overwrites that day's files.

pub mod json;
pub mod markdown;
