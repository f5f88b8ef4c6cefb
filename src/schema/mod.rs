//! Runtime description of a schema: its types, fields and resolvers

pub mod builder;
pub mod meta;
pub mod model;
