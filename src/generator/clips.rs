//! Clip synthesis
//!
//! Fifteen clips per variant, each registered with the asset container the
//! moment it is authored so a failure leaves an individually named trail.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{LipsyncLayerGenerator, GENERATED_CLIP_PREFIX};
use crate::assets::{AssetKind, AssetRegistry, ClipRef};
use crate::clip::AnimationClip;
use crate::config::LipsyncLayerConfig;
use crate::error::Result;
use crate::viseme::Viseme;

/// Which branch of the layer a clip belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipVariant {
    /// Analog signal below the threshold; full amplitude
    Regular,
    /// Analog signal above the threshold; tweaked amplitude
    Wide,
}

impl ClipVariant {
    pub fn label(self) -> &'static str {
        match self {
            ClipVariant::Regular => "Regular",
            ClipVariant::Wide => "Wide",
        }
    }
}

impl fmt::Display for ClipVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A synthesized clip, already owned by the asset container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedClip {
    pub name: String,
    pub viseme: Viseme,
    pub variant: ClipVariant,
    pub amplitude: f32,
    /// Handle returned by the asset container
    pub clip: ClipRef,
}

/// Name of the generated clip for a viseme
pub fn generated_clip_name(viseme: Viseme) -> String {
    format!("{}{}", GENERATED_CLIP_PREFIX, viseme.index())
}

/// Amplitude of a variant's clip for a viseme parameter value
///
/// Regular clips always use 1.0; wide clips use
/// `amplitude_scale * tweaks[index].amplitude`. Out-of-range indices fail for
/// both variants.
pub fn clip_amplitude(config: &LipsyncLayerConfig, variant: ClipVariant, index: i64) -> Result<f32> {
    let tweak = config.tweaks.amplitude(index)?;
    Ok(match variant {
        ClipVariant::Regular => 1.0,
        ClipVariant::Wide => config.amplitude_scale * tweak,
    })
}

impl LipsyncLayerGenerator<'_> {
    /// Remove every previously generated clip, whatever shape the last run had
    pub(super) fn purge_generated_clips(&self, assets: &mut dyn AssetRegistry) -> Result<usize> {
        assets.remove_assets_with_prefix(GENERATED_CLIP_PREFIX, AssetKind::AnimationClip)
    }

    /// Author and register the fifteen clips of one variant, in viseme order
    pub fn synthesize_clips(
        &self,
        variant: ClipVariant,
        assets: &mut dyn AssetRegistry,
    ) -> Result<Vec<GeneratedClip>> {
        Viseme::ALL
            .iter()
            .map(|&viseme| {
                let amplitude = clip_amplitude(self.config, variant, viseme.index() as i64)?;
                let name = generated_clip_name(viseme);

                let mut clip = AnimationClip::new(name.clone());
                self.authoring
                    .override_animation(&mut clip, self.avatar, viseme, amplitude)?;
                let handle = assets.add_animation(clip)?;

                debug!(
                    "Registered {} clip {} ({}) at amplitude {:.3}",
                    variant, name, viseme, amplitude
                );

                Ok(GeneratedClip {
                    name,
                    viseme,
                    variant,
                    amplitude,
                    clip: handle,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LipsyncError;
    use crate::viseme::VisemeTweak;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(0 ; "first viseme")]
    #[test_case(7 ; "middle viseme")]
    #[test_case(14 ; "last viseme")]
    fn test_regular_amplitude_is_one(index: i64) {
        let mut config = LipsyncLayerConfig::default();
        config.amplitude_scale = 0.4;
        config
            .tweaks
            .set(Viseme::from_index(index).unwrap(), VisemeTweak::new(0.2, 3.0));

        assert_relative_eq!(clip_amplitude(&config, ClipVariant::Regular, index).unwrap(), 1.0);
    }

    #[test]
    fn test_wide_amplitude_scales_tweak() {
        let mut config = LipsyncLayerConfig::default();
        config.amplitude_scale = 0.8;
        config.tweaks.set(Viseme::Th, VisemeTweak::new(0.5, 1.0));

        assert_relative_eq!(clip_amplitude(&config, ClipVariant::Wide, 3).unwrap(), 0.4);
        assert_relative_eq!(clip_amplitude(&config, ClipVariant::Wide, 4).unwrap(), 0.8);
    }

    #[test_case(ClipVariant::Regular, 15)]
    #[test_case(ClipVariant::Wide, 15)]
    #[test_case(ClipVariant::Regular, -1)]
    #[test_case(ClipVariant::Wide, -1)]
    fn test_out_of_range_amplitude_fails(variant: ClipVariant, index: i64) {
        let config = LipsyncLayerConfig::default();
        assert!(matches!(
            clip_amplitude(&config, variant, index),
            Err(LipsyncError::VisemeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_generated_clip_name() {
        assert_eq!(generated_clip_name(Viseme::Sil), "zAutogeneratedLipsync_0");
        assert_eq!(generated_clip_name(Viseme::Ou), "zAutogeneratedLipsync_14");
    }
}
