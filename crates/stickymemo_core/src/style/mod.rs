//! Deterministic card styling.

pub mod postit;
