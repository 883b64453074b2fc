//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate identity, validation and repository calls into tracker
//!   use-cases.
//! - Keep presentation callers decoupled from storage details.

pub mod entry_resolution;
pub mod tracker_service;
