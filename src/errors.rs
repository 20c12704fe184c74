//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`Error`] covers:
//! - Asset loading and decoding failures
//! - Clip selection on an invalid index
//! - Operations issued before the model has finished loading
//!
//! A missing neck joint is not an error; head tracking becomes a no-op.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use kinema::errors::{Error, Result};
//!
//! fn pick(driver: &mut ClipDriver, scene: &mut Scene) -> Result<()> {
//!     driver.select_clip(scene, 2)
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The model at `path` could not be fetched or parsed.
    #[error("Failed to load '{path}': {reason}")]
    LoadFailure {
        /// Path (or URI) of the asset that failed
        path: String,
        /// Human readable cause
        reason: String,
    },

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    // ========================================================================
    // Clip Driver Errors
    // ========================================================================
    /// A clip index outside `0..len` was requested.
    #[error("Clip index out of bounds: {index} (clip count: {len})")]
    InvalidClipIndex {
        /// The rejected index
        index: usize,
        /// Number of clips loaded
        len: usize,
    },

    /// The model was loaded but carries no animation clips.
    #[error("Model has no animation clips")]
    EmptyClipSet,

    /// A clip operation was requested before the model finished loading.
    #[error("Model is not loaded yet")]
    NotLoaded,

    // ========================================================================
    // Window Errors
    // ========================================================================
    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // I/O & Configuration Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Async & Threading Errors
    // ========================================================================
    /// Task join error (when async tasks fail to complete).
    #[error("Task join error: {0}")]
    TaskJoinError(String),
}

impl From<gltf::Error> for Error {
    fn from(err: gltf::Error) -> Self {
        Error::GltfError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoinError(err.to_string())
    }
}

impl Error {
    /// Wraps any displayable cause into a [`Error::LoadFailure`] for `path`.
    pub fn load_failure(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::LoadFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
