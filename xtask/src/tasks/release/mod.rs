pub mod build;
pub(crate) mod common;
pub mod matrix;
