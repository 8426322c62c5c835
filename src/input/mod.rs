// file: src/input/mod.rs
// description: input resolution module exports
// reference: internal module structure

pub mod scanner;

pub use scanner::{InputFilter, InputScanner};
