//! Viseme pose authoring from avatar blendshapes

use super::{AnimationClip, BlendshapeCurve, ClipAuthoring, Keyframe};
use crate::avatar::AvatarDescriptor;
use crate::error::{LipsyncError, Result};
use crate::viseme::Viseme;

/// Blendshape weight of a fully expressed viseme
pub const BLENDSHAPE_FULL_WEIGHT: f32 = 100.0;

/// Length of the constant pose, one frame at 60 fps
const POSE_DURATION: f32 = 1.0 / 60.0;

/// Poses one viseme and silences every other viseme blendshape
///
/// Visemes sharing a blendshape produce a single curve carrying the highest
/// weight among them.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisemeAnimationMaker;

impl VisemeAnimationMaker {
    pub fn new() -> Self {
        Self
    }
}

impl ClipAuthoring for VisemeAnimationMaker {
    fn override_animation(
        &self,
        clip: &mut AnimationClip,
        avatar: &AvatarDescriptor,
        viseme: Viseme,
        amplitude: f32,
    ) -> Result<()> {
        if !amplitude.is_finite() {
            return Err(LipsyncError::ClipAuthoring {
                viseme: viseme.index(),
                reason: format!("amplitude must be finite, got {}", amplitude),
            });
        }

        let mut weights: Vec<(&str, f32)> = Vec::new();
        for candidate in Viseme::ALL {
            let blendshape = avatar.blendshape(candidate);
            if blendshape.is_empty() {
                continue;
            }

            let weight = if candidate == viseme {
                BLENDSHAPE_FULL_WEIGHT * amplitude
            } else {
                0.0
            };

            match weights.iter_mut().find(|(name, _)| *name == blendshape) {
                Some((_, existing)) => *existing = existing.max(weight),
                None => weights.push((blendshape, weight)),
            }
        }

        for (blendshape, weight) in weights {
            clip.set_curve(BlendshapeCurve {
                path: avatar.face_mesh_path.clone(),
                property: format!("blendShape.{}", blendshape),
                keyframes: vec![
                    Keyframe {
                        time: 0.0,
                        value: weight,
                    },
                    Keyframe {
                        time: POSE_DURATION,
                        value: weight,
                    },
                ],
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn avatar() -> AvatarDescriptor {
        AvatarDescriptor::with_standard_blendshapes("Body")
    }

    #[test]
    fn test_target_viseme_at_amplitude() {
        let mut clip = AnimationClip::new("zAuto_10");
        VisemeAnimationMaker::new()
            .override_animation(&mut clip, &avatar(), Viseme::Aa, 0.5)
            .unwrap();

        assert_eq!(clip.curves.len(), 15);
        let aa = clip.curve("blendShape.vrc.v_aa").unwrap();
        assert_eq!(aa.path, "Body");
        assert_eq!(aa.keyframes.len(), 2);
        assert_relative_eq!(aa.keyframes[0].value, 50.0);
        assert_relative_eq!(aa.keyframes[1].value, 50.0);

        let oh = clip.curve("blendShape.vrc.v_oh").unwrap();
        assert_relative_eq!(oh.keyframes[0].value, 0.0);
    }

    #[test]
    fn test_shared_blendshape_keeps_highest_weight() {
        let mut avatar = avatar();
        avatar.viseme_blendshapes[Viseme::Oh.index()] = "vrc.v_ou".to_string();

        let mut clip = AnimationClip::new("zAuto_13");
        VisemeAnimationMaker::new()
            .override_animation(&mut clip, &avatar, Viseme::Oh, 1.0)
            .unwrap();

        assert_eq!(clip.curves.len(), 14);
        let ou = clip.curve("blendShape.vrc.v_ou").unwrap();
        assert_relative_eq!(ou.keyframes[0].value, 100.0);
    }

    #[test]
    fn test_empty_blendshape_skipped() {
        let mut avatar = avatar();
        avatar.viseme_blendshapes[Viseme::Sil.index()] = String::new();

        let mut clip = AnimationClip::new("zAuto_0");
        VisemeAnimationMaker::new()
            .override_animation(&mut clip, &avatar, Viseme::Sil, 1.0)
            .unwrap();

        assert_eq!(clip.curves.len(), 14);
    }

    #[test]
    fn test_non_finite_amplitude_rejected() {
        let mut clip = AnimationClip::new("zAuto_1");
        let result =
            VisemeAnimationMaker::new().override_animation(&mut clip, &avatar(), Viseme::Pp, f32::NAN);

        assert!(matches!(
            result,
            Err(LipsyncError::ClipAuthoring { viseme: 1, .. })
        ));
        assert!(clip.is_empty());
    }
}
