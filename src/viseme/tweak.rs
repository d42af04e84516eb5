//! Per-viseme tweak table
//!
//! Each viseme gets an amplitude (applied to the wide variant only) and a
//! multiplier on the base transition duration.

use serde::{Deserialize, Serialize};

use super::id::{Viseme, VISEME_COUNT};
use crate::error::{LipsyncError, Result};

/// Tweak applied to a single viseme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisemeTweak {
    /// Scale factor (0.0 - 1.0) applied to the wide clip of this viseme
    pub amplitude: f32,
    /// Multiplier on the configured base transition duration
    pub transition_factor: f32,
}

impl VisemeTweak {
    pub fn new(amplitude: f32, transition_factor: f32) -> Self {
        Self {
            amplitude,
            transition_factor,
        }
    }
}

impl Default for VisemeTweak {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Fixed-length table of tweaks, one entry per viseme
///
/// Serialized as a plain JSON array; anything other than exactly fifteen
/// entries is rejected on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<VisemeTweak>", into = "Vec<VisemeTweak>")]
pub struct VisemeTweakTable {
    entries: [VisemeTweak; VISEME_COUNT],
}

impl VisemeTweakTable {
    /// Create a table where every viseme uses the same tweak
    pub fn uniform(tweak: VisemeTweak) -> Self {
        Self {
            entries: [tweak; VISEME_COUNT],
        }
    }

    /// Get the tweak for a viseme parameter value
    ///
    /// # Errors
    /// `VisemeOutOfRange` when `index` is outside `0..=14`. The lookup never
    /// clamps, so a drift in viseme count surfaces immediately.
    pub fn get(&self, index: i64) -> Result<&VisemeTweak> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .ok_or(LipsyncError::VisemeOutOfRange { index })
    }

    /// Amplitude tweak for a viseme parameter value
    pub fn amplitude(&self, index: i64) -> Result<f32> {
        self.get(index).map(|t| t.amplitude)
    }

    /// Transition duration multiplier for a viseme parameter value
    pub fn transition_factor(&self, index: i64) -> Result<f32> {
        self.get(index).map(|t| t.transition_factor)
    }

    /// Replace the tweak of one viseme
    pub fn set(&mut self, viseme: Viseme, tweak: VisemeTweak) {
        self.entries[viseme.index()] = tweak;
    }

    /// Iterate over `(viseme, tweak)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (Viseme, &VisemeTweak)> {
        Viseme::ALL.iter().copied().zip(self.entries.iter())
    }
}

impl Default for VisemeTweakTable {
    fn default() -> Self {
        Self::uniform(VisemeTweak::default())
    }
}

impl TryFrom<Vec<VisemeTweak>> for VisemeTweakTable {
    type Error = LipsyncError;

    fn try_from(entries: Vec<VisemeTweak>) -> Result<Self> {
        let actual = entries.len();
        let entries: [VisemeTweak; VISEME_COUNT] =
            entries
                .try_into()
                .map_err(|_| LipsyncError::InvalidTweakTable {
                    expected: VISEME_COUNT,
                    actual,
                })?;
        Ok(Self { entries })
    }
}

impl From<VisemeTweakTable> for Vec<VisemeTweak> {
    fn from(table: VisemeTweakTable) -> Self {
        table.entries.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_table_is_neutral() {
        let table = VisemeTweakTable::default();
        for (_, tweak) in table.iter() {
            assert_relative_eq!(tweak.amplitude, 1.0);
            assert_relative_eq!(tweak.transition_factor, 1.0);
        }
    }

    #[test]
    fn test_set_and_lookup() {
        let mut table = VisemeTweakTable::default();
        table.set(Viseme::Th, VisemeTweak::new(0.5, 2.0));

        assert_relative_eq!(table.amplitude(3).unwrap(), 0.5);
        assert_relative_eq!(table.transition_factor(3).unwrap(), 2.0);
        assert_relative_eq!(table.amplitude(4).unwrap(), 1.0);
    }

    #[test]
    fn test_lookup_out_of_range_fails() {
        let table = VisemeTweakTable::default();
        assert!(matches!(
            table.amplitude(15),
            Err(LipsyncError::VisemeOutOfRange { index: 15 })
        ));
        assert!(matches!(
            table.transition_factor(-1),
            Err(LipsyncError::VisemeOutOfRange { index: -1 })
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let json = serde_json::to_string(&vec![VisemeTweak::default(); 14]).unwrap();
        let err = serde_json::from_str::<VisemeTweakTable>(&json).unwrap_err();
        assert!(err.to_string().contains("must have 15 entries, found 14"));
    }

    #[test]
    fn test_json_is_plain_array() {
        let table = VisemeTweakTable::default();
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(VISEME_COUNT));
    }
}
