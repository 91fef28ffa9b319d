pub mod release;
pub mod tooling;
