//! Animation Graph Module
//!
//! The animator controller the generator writes into:
//! - `AnimatorGraph`: the container seam (layers and parameters)
//! - `AnimatorController`: an in-memory, JSON-persisted implementation
//! - `StateMachine`: states plus an explicit star of universal transitions
//! - `ParameterValues`: a parameter snapshot for evaluating guards

mod controller;
mod eval;
mod machine;

pub use controller::{
    AnimatorController, AnimatorGraph, AnimatorLayer, AvatarMask, Parameter, ParameterKind,
};
pub use eval::{ParameterValue, ParameterValues};
pub use machine::{
    grid_position, Condition, ConditionMode, Position, State, StateId, StateMachine, Transition,
};
