//! Shared configuration, constants and errors for the cardfile workspace.

pub mod config;
pub mod constants;
pub mod error;
