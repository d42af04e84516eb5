//! Animation Clips
//!
//! A clip is a set of blendshape curves on the face mesh. Clip content is
//! produced through the `ClipAuthoring` seam so the generator never depends on
//! how a pose is baked.

mod viseme_maker;

use serde::{Deserialize, Serialize};

use crate::avatar::AvatarDescriptor;
use crate::error::Result;
use crate::viseme::Viseme;

pub use viseme_maker::{VisemeAnimationMaker, BLENDSHAPE_FULL_WEIGHT};

/// A single keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in seconds
    pub time: f32,
    pub value: f32,
}

/// Curve driving one blendshape property of a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendshapeCurve {
    /// Renderer path relative to the avatar root
    pub path: String,
    /// Animated property, e.g. `blendShape.vrc.v_aa`
    pub property: String,
    pub keyframes: Vec<Keyframe>,
}

/// An animation clip
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub curves: Vec<BlendshapeCurve>,
}

impl AnimationClip {
    /// Create an empty clip
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    /// Find the curve animating `property`
    pub fn curve(&self, property: &str) -> Option<&BlendshapeCurve> {
        self.curves.iter().find(|c| c.property == property)
    }

    /// Set a curve, replacing any curve on the same path and property
    pub fn set_curve(&mut self, curve: BlendshapeCurve) {
        match self
            .curves
            .iter_mut()
            .find(|c| c.path == curve.path && c.property == curve.property)
        {
            Some(existing) => *existing = curve,
            None => self.curves.push(curve),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// Bakes a viseme pose into a clip
pub trait ClipAuthoring {
    /// Fill `clip` with curves posing `viseme` at `amplitude` (0.0 - 1.0)
    fn override_animation(
        &self,
        clip: &mut AnimationClip,
        avatar: &AvatarDescriptor,
        viseme: Viseme,
        amplitude: f32,
    ) -> Result<()>;
}
