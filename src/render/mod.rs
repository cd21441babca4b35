//! Rendering module for writing document outlines.

mod json;

pub use json::{to_json, write_json, write_json_file, JsonFormat};
