//! Output generation modules for the static site.
//!
//! - [`html`]: renders the daily dashboard page and maintains the
//!   index/history pages
//! - [`json`]: writes the per-scenario item data as a JSON API file
//!
//! # Output structure
//!
//! ```text
//! output_dir/
//! ├── index.html        # redirect to today's page
//! ├── history.html      # archive listing
//! ├── 2026-01-22.html   # one dashboard page per day
//! └── data/
//!     └── 2026-01-22.json
//! ```

pub mod html;
pub mod json;
