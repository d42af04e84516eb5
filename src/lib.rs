//! Lipsync Layer - Limited-lipsync viseme override generator
//!
//! Generates the animator layer that overrides an avatar's mouth shape while
//! a gesture asks for limited lipsync. For each of the fifteen visemes it
//! produces a regular and a wide clip, then connects them to a universal
//! source through mutually exclusive guarded transitions.
//!
//! # Architecture
//!
//! The generator talks to its collaborators through narrow seams:
//! - `graph::AnimatorGraph`: the animator controller being written
//! - `assets::AssetRegistry`: the container that owns generated clips
//! - `clip::ClipAuthoring`: bakes a viseme pose into a clip
//! - `progress::ProgressSink`: receives progress checkpoints
//!
//! Each seam ships with a concrete implementation so the crate runs on its own
//! from JSON files (see the `lipsync-cli` binary).

pub mod assets;
pub mod avatar;
pub mod cli;
pub mod clip;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod manifest;
pub mod progress;
pub mod viseme;

pub use error::{LipsyncError, Result};
pub use generator::{GenerationReport, LipsyncLayerGenerator};
