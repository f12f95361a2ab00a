//! Core business logic for Nagari.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `storage` - Physical placement, naming, and removal of uploaded files
//! - `attachment` - Keeping a stored profile picture reference consistent with the file it names

pub mod attachment;
pub mod storage;
