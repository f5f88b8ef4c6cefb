//! Provides serialization for the types exchanged with clients

pub mod serde;
