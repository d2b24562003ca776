//! HTTP client and session state for the Comic Factory generation API.
//!
//! [`api::ComicFactoryApi`] wraps the remote endpoints; [`session::StudioSession`]
//! owns the form state, received prompts, comic result, and error banner, and
//! enforces the prompts-before-comic ordering.

pub mod api;
pub mod session;
