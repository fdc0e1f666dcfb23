//! Pipeline stages for text extraction.
//!
//! ```text
//! input ──▶ backend ──▶ assemble
//! (validate) (engine)   (markers + join)
//! ```
//!
//! 1. [`input`]    check the path is a readable file with a PDF header
//! 2. [`backend`]  open the document and read each page's text layer
//! 3. [`assemble`] prefix every page with its marker and concatenate

pub mod assemble;
pub mod backend;
pub mod input;
