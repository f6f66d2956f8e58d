//! Error types and error handling for the analysis core.
//!
//! This module defines the error types used throughout analysis. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for scoping, literal pooling and typing
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
