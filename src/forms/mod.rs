//! Form input normalisation and validation.
//!
//! Raw submissions deserialize into `*Form` structs and convert into typed
//! `*FormPayload`s through `TryFrom`, collecting every field error.

pub mod recipes;
pub mod settings;
pub mod validation;
