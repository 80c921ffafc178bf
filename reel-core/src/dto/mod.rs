//! Data Transfer Objects for the backend HTTP contract
//!
//! These are the shapes exchanged with the video-generation backend. They are
//! deliberately lenient on input since the backend stores every field as text.

pub mod job;
