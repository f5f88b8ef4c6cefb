pub mod base;
pub mod scalars;
