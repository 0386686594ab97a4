//! Plain data shared by the engine, the store, and front ends.

pub mod keys;
pub mod story;
