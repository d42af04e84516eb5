//! Parameter snapshots for guard evaluation

use std::collections::HashMap;

use super::machine::{Condition, ConditionMode};

/// Runtime value of an animator parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Int(i32),
    Float(f32),
    Bool(bool),
}

/// Values of the animator parameters at one evaluation tick
#[derive(Debug, Clone, Default)]
pub struct ParameterValues {
    values: HashMap<String, ParameterValue>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_string(), ParameterValue::Int(value));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), ParameterValue::Float(value));
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), ParameterValue::Bool(value));
    }

    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.values.get(name).copied()
    }

    /// Evaluate one condition; an unset parameter never satisfies a guard
    pub fn satisfies(&self, condition: &Condition) -> bool {
        let Some(value) = self.get(&condition.parameter) else {
            return false;
        };

        match (condition.mode, value) {
            (ConditionMode::If, ParameterValue::Bool(b)) => b,
            (ConditionMode::IfNot, ParameterValue::Bool(b)) => !b,
            (ConditionMode::Greater, ParameterValue::Float(v)) => v > condition.threshold,
            (ConditionMode::Greater, ParameterValue::Int(v)) => v as f32 > condition.threshold,
            (ConditionMode::Less, ParameterValue::Float(v)) => v < condition.threshold,
            (ConditionMode::Less, ParameterValue::Int(v)) => (v as f32) < condition.threshold,
            // Int thresholds are truncated the way the host does it
            (ConditionMode::Equals, ParameterValue::Int(v)) => v == condition.threshold as i32,
            (ConditionMode::NotEqual, ParameterValue::Int(v)) => v != condition.threshold as i32,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn condition(mode: ConditionMode, threshold: f32, parameter: &str) -> Condition {
        Condition {
            mode,
            threshold,
            parameter: parameter.to_string(),
        }
    }

    #[test_case(ConditionMode::Less, 0.4 => true ; "less below")]
    #[test_case(ConditionMode::Less, 0.5 => false ; "less at boundary")]
    #[test_case(ConditionMode::Greater, 0.5 => false ; "greater at boundary")]
    #[test_case(ConditionMode::Greater, 0.6 => true ; "greater above")]
    fn test_float_comparisons_are_strict(mode: ConditionMode, value: f32) -> bool {
        let mut values = ParameterValues::new();
        values.set_float("Signal", value);
        values.satisfies(&condition(mode, 0.5, "Signal"))
    }

    #[test]
    fn test_int_equality() {
        let mut values = ParameterValues::new();
        values.set_int("Viseme", 3);

        assert!(values.satisfies(&condition(ConditionMode::Equals, 3.0, "Viseme")));
        assert!(!values.satisfies(&condition(ConditionMode::Equals, 4.0, "Viseme")));
        assert!(values.satisfies(&condition(ConditionMode::NotEqual, 4.0, "Viseme")));
    }

    #[test]
    fn test_missing_parameter_never_satisfies() {
        let values = ParameterValues::new();
        assert!(!values.satisfies(&condition(ConditionMode::Less, 1.0, "Signal")));
    }

    #[test]
    fn test_bool_conditions() {
        let mut values = ParameterValues::new();
        values.set_bool("Talking", true);

        assert!(values.satisfies(&condition(ConditionMode::If, 0.0, "Talking")));
        assert!(!values.satisfies(&condition(ConditionMode::IfNot, 0.0, "Talking")));
    }
}
