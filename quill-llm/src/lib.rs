//! # quill-llm — Text Generation Backends for Quill
//!
//! One interface over two interchangeable HTTP backends:
//!   - **Managed** — a credential-gated generation service reached via a
//!     tenant identifier (no per-user API key)
//!   - **Inference** — a public inference API reached via a bearer token
//!     and a named model
//!
//! All generation goes through [`Generator::generate_text`], which layers
//! duplicate suppression, prompt augmentation, typed error translation, and
//! response formatting on top of the raw backend call. Which backend runs
//! is decided from the settings store on every call.

pub mod client;
pub mod error;
pub mod generate;

pub use client::{Provider, TextClient};
pub use error::GenerateError;
pub use generate::{Generation, Generator, RecordRef};
