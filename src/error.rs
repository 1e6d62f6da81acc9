//! Error handling for resource decoding
//!
//! This module re-exports the error type used throughout the crate. It uses
//! thiserror for the `Display` impls and keeps one variant per failure class.

pub use crate::common::AssetError;
pub use crate::common::Result;
