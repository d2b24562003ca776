//! Domain types and validation for the Comic Factory generation API.
//!
//! Pure logic only: the wire-level request/response models, field-by-field
//! form mutation, pre-flight validation, and download path helpers. All
//! network I/O lives in `comicfactory-client`.

pub mod download;
pub mod error;
pub mod request;
pub mod response;
