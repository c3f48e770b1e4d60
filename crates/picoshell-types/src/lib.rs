//! Foundation types for picoshell.
//!
//! This crate contains the platform-agnostic types shared by all picoshell
//! crates: the error taxonomy, shell configuration, and the control-byte
//! vocabulary understood by the line editor.

pub mod config;
pub mod error;
pub mod input;
