//! State machine of a single layer
//!
//! Universal ("any state") transitions are stored as an adjacency list fanning
//! out from one implicit source node, so the whole layer is a star graph.

use serde::{Deserialize, Serialize};

use super::eval::ParameterValues;
use crate::assets::ClipRef;

/// Horizontal spacing of one layout grid cell
const GRID_CELL_WIDTH: f32 = 200.0;

/// Vertical spacing of one layout grid cell
const GRID_CELL_HEIGHT: f32 = 70.0;

/// Editor layout position of a state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Map a layout grid cell to editor coordinates
pub fn grid_position(x: i32, y: i32) -> Position {
    Position {
        x: x as f32 * GRID_CELL_WIDTH,
        y: y as f32 * GRID_CELL_HEIGHT,
    }
}

/// Handle to a state inside one `StateMachine`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A state playing one motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub position: Position,
    pub motion: Option<ClipRef>,
    pub write_defaults: bool,
}

/// Comparison applied by a transition condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionMode {
    /// Bool parameter is true
    If,
    /// Bool parameter is false
    IfNot,
    /// Numeric parameter strictly greater than the threshold
    Greater,
    /// Numeric parameter strictly less than the threshold
    Less,
    /// Int parameter equal to the threshold
    Equals,
    /// Int parameter different from the threshold
    NotEqual,
}

/// Guard on a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub mode: ConditionMode,
    pub threshold: f32,
    pub parameter: String,
}

/// Edge from the universal source to a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub target: StateId,
    pub can_transition_to_self: bool,
    /// Blend duration in seconds
    pub duration: f32,
    /// Normalized start offset into the target motion
    pub offset: f32,
    pub has_exit_time: bool,
    /// Normalized exit time; 0 makes the edge eligible on every tick
    pub exit_time: f32,
    pub conditions: Vec<Condition>,
}

impl Transition {
    fn new(target: StateId) -> Self {
        Self {
            target,
            can_transition_to_self: true,
            duration: 0.0,
            offset: 0.0,
            has_exit_time: false,
            exit_time: 0.0,
            conditions: Vec::new(),
        }
    }

    /// Append a guard; all guards must hold for the transition to fire
    pub fn add_condition(&mut self, mode: ConditionMode, threshold: f32, parameter: &str) {
        self.conditions.push(Condition {
            mode,
            threshold,
            parameter: parameter.to_string(),
        });
    }

    /// Check every guard against a parameter snapshot
    pub fn is_satisfied(&self, values: &ParameterValues) -> bool {
        self.conditions.iter().all(|c| values.satisfies(c))
    }
}

/// States of one layer plus the universal transitions into them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateMachine {
    states: Vec<State>,
    any_state_transitions: Vec<Transition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state with no motion; new states write defaults until told otherwise
    pub fn add_state(&mut self, name: &str, position: Position) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State {
            name: name.to_string(),
            position,
            motion: None,
            write_defaults: true,
        });
        id
    }

    /// Get a state by ID
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    /// Mutable access to a state returned by `add_state`
    pub fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.0]
    }

    /// Add an edge from the universal source to `target`
    pub fn add_any_state_transition(&mut self, target: StateId) -> &mut Transition {
        self.any_state_transitions.push(Transition::new(target));
        let last = self.any_state_transitions.len() - 1;
        &mut self.any_state_transitions[last]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn any_state_transitions(&self) -> &[Transition] {
        &self.any_state_transitions
    }

    /// Find a state by name
    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }

    /// The universal transition leading into a state, if any
    pub fn transition_to(&self, target: StateId) -> Option<&Transition> {
        self.any_state_transitions.iter().find(|t| t.target == target)
    }

    /// Targets of every universal transition whose guards all hold
    pub fn satisfied_transitions(&self, values: &ParameterValues) -> Vec<StateId> {
        self.any_state_transitions
            .iter()
            .filter(|t| t.is_satisfied(values))
            .map(|t| t.target)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}
