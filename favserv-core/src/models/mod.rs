//! Core data models for `favserv`
//!
//! This module contains the [`ServerRecord`] stored by the favorites store
//! and its identifier type.

mod server;

pub use server::{
    DEFAULT_PORT, RecordId, ServerRecord, ValidationError, display_identity_name,
};
