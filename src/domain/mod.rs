//! Domain entities and value objects shared by the filter, form and
//! navigation layers.

pub mod filter;
pub mod recipe;
pub mod types;
