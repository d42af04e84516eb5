//! Viseme Domain
//!
//! The fixed fifteen-entry viseme enumeration and the per-viseme tweak table.
//! Index is identity: entry `n` of every table belongs to viseme `n`.

mod id;
mod tweak;

pub use id::{Viseme, VISEME_COUNT};
pub use tweak::{VisemeTweak, VisemeTweakTable};
