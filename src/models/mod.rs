//! API data models
//!
//! This module contains data structures for the relay and the Gemini API.

pub mod gemini;
pub mod relay;
