//! Core types for kotoba
//!
//! Content records, JLPT levels, the list filter/sort/paginate engine and the
//! lenient JSON helpers shared by every other crate.

mod config;
pub mod constants;
mod content;
mod env_config;
mod error;
mod json_utils;
mod level;
mod listing;

pub use config::*;
pub use content::*;
pub use env_config::*;
pub use error::*;
pub use json_utils::*;
pub use level::*;
pub use listing::*;
