pub mod args;
pub mod choice;
pub mod error;
pub mod gen;
pub mod options;
pub mod output_path;
pub mod prompt;
pub mod utils;

pub use error::{Error, Result};
