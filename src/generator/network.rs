//! Transition network assembly
//!
//! Every state is one hop from the universal source. Viseme transitions are
//! partitioned by exact equality on `Viseme` and by opposite strict
//! comparisons of the analog signal against one shared threshold.

use log::debug;

use super::clips::{ClipVariant, GeneratedClip};
use super::{ANALOG_PARAMETER, NONE_STATE_NAME, VISEME_PARAMETER};
use crate::assets::ClipRef;
use crate::config::LipsyncLayerConfig;
use crate::error::Result;
use crate::graph::{grid_position, ConditionMode, StateMachine, Transition};

/// Layout column of the wide states
const WIDE_COLUMN: i32 = 4;

/// Layout column of the regular states
const REGULAR_COLUMN: i32 = -4;

/// First layout row of the viseme states
const FIRST_VISEME_ROW: i32 = 2;

/// Duration of the transition into a viseme state
///
/// Same formula for both variants: `transition_duration * factor(index)`.
pub fn transition_duration(config: &LipsyncLayerConfig, index: i64) -> Result<f32> {
    Ok(config.transition_duration * config.tweaks.transition_factor(index)?)
}

/// Build the none state, then the wide states, then the regular states
pub(super) fn assemble_network(
    machine: &mut StateMachine,
    config: &LipsyncLayerConfig,
    empty_clip: &ClipRef,
    wide: &[GeneratedClip],
    regular: &[GeneratedClip],
) -> Result<()> {
    let none = machine.add_state(NONE_STATE_NAME, grid_position(0, 0));
    let state = machine.state_mut(none);
    state.motion = Some(empty_clip.clone());
    state.write_defaults = false;

    let transition = machine.add_any_state_transition(none);
    setup_lipsync_transition(transition);
    transition.duration = config.transition_duration;
    transition.add_condition(ConditionMode::Less, config.analog_threshold, ANALOG_PARAMETER);

    add_viseme_states(machine, config, wide, WIDE_COLUMN)?;
    add_viseme_states(machine, config, regular, REGULAR_COLUMN)?;

    Ok(())
}

fn add_viseme_states(
    machine: &mut StateMachine,
    config: &LipsyncLayerConfig,
    clips: &[GeneratedClip],
    column: i32,
) -> Result<()> {
    for clip in clips {
        let index = clip.viseme.index();
        let duration = transition_duration(config, index as i64)?;
        let analog_mode = match clip.variant {
            ClipVariant::Wide => ConditionMode::Greater,
            ClipVariant::Regular => ConditionMode::Less,
        };

        let id = machine.add_state(
            &format!("{} {}", clip.variant, index),
            grid_position(column, FIRST_VISEME_ROW + index as i32),
        );
        let state = machine.state_mut(id);
        state.motion = Some(clip.clip.clone());
        state.write_defaults = config.write_defaults;

        let transition = machine.add_any_state_transition(id);
        setup_lipsync_transition(transition);
        transition.duration = duration;
        transition.add_condition(ConditionMode::Equals, index as f32, VISEME_PARAMETER);
        transition.add_condition(analog_mode, config.analog_threshold, ANALOG_PARAMETER);

        debug!("Added state '{} {}' with duration {:.3}s", clip.variant, index, duration);
    }

    Ok(())
}

/// Common setup: never re-enter the active state, evaluate on every tick
fn setup_lipsync_transition(transition: &mut Transition) {
    transition.offset = 0.0;
    transition.can_transition_to_self = false;
    transition.has_exit_time = true;
    transition.exit_time = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LipsyncError;
    use crate::viseme::{Viseme, VisemeTweak};
    use approx::assert_relative_eq;

    #[test]
    fn test_transition_duration_uses_factor() {
        let mut config = LipsyncLayerConfig::default();
        config.transition_duration = 0.1;
        config.tweaks.set(Viseme::Th, VisemeTweak::new(0.5, 2.0));

        assert_relative_eq!(transition_duration(&config, 3).unwrap(), 0.2);
        assert_relative_eq!(transition_duration(&config, 2).unwrap(), 0.1);
    }

    #[test]
    fn test_transition_duration_out_of_range() {
        let config = LipsyncLayerConfig::default();
        assert!(matches!(
            transition_duration(&config, 15),
            Err(LipsyncError::VisemeOutOfRange { index: 15 })
        ));
    }

    #[test]
    fn test_setup_lipsync_transition() {
        let mut machine = StateMachine::new();
        let id = machine.add_state("Target", grid_position(0, 0));
        let transition = machine.add_any_state_transition(id);

        setup_lipsync_transition(transition);

        assert!(!transition.can_transition_to_self);
        assert!(transition.has_exit_time);
        assert_eq!(transition.exit_time, 0.0);
    }
}
