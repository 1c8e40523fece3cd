//! Core logic of the meal-planning client.
//!
//! Recipe list filtering, form field validation, ingredient quantity
//! formatting and the unsaved-changes navigation guard. Rendering, HTTP and
//! routing live in the application that embeds this crate.

pub mod domain;
pub mod dto;
pub mod forms;
#[cfg(feature = "settings")]
pub mod models;
pub mod services;
