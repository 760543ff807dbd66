//! Backend HTTP collaborator.
//!
//! The backend performs the actual transcript collection and NLP analysis;
//! this crate only issues requests and decodes the JSON envelopes.

pub mod client;

pub use client::{BackendClient, BackendError};
