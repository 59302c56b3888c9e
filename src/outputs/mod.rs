//! Output generation.
//!
//! - [`json`]: writes the collected articles as one JSON document, to a file
//!   or to standard output

pub mod json;
