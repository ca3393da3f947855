//! JDM-DESIGN - a text-to-image studio for the terminal
//!
//! Takes a rough creative idea, asks a hosted language model to enrich it
//! into a detailed prompt, then sends that prompt to a hosted image model
//! and saves the returned picture for display.

pub mod ai;
pub mod app;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod ui;

pub use error::{Error, Result};
