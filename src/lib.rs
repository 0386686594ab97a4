//! Bedtime Story Engine — personalised children's stories from templates.
//!
//! A reader picks a child's name, an animal companion, a theme, and an
//! optional closing message. The engine picks a name and title, draws a
//! set of story details, and fills hand-written narrative fragments with
//! them. No network, no model inference: every story is assembled from a
//! content pack of RON files and a random source.

pub mod core;
pub mod schema;
pub mod service;
pub mod store;
