//! Reel Core
//!
//! Core types shared by the Reel client crates.
//!
//! This crate contains:
//! - Domain types: jobs, their statuses and resolved artifacts
//! - DTOs: the wire shapes of the video-generation backend
//! - Validation: client-side checks applied before a job is submitted

pub mod domain;
pub mod dto;
pub mod validation;

pub use validation::ValidationError;
