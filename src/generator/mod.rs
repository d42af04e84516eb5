//! Lipsync Override Layer Generator
//!
//! Rebuilds the limited-lipsync layer from nothing on every run:
//! 1. Reset the layer slot at its current index
//! 2. Purge previously generated clips, then synthesize regular and wide clips
//! 3. Commit the assets, then wire the universal transitions into them
//!
//! Runs are single-threaded and assume exclusive ownership of the layer slot
//! and of the generated clip namespace; callers serialize invocations.

mod clips;
mod network;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::assets::{AssetRegistry, ClipRef};
use crate::avatar::AvatarDescriptor;
use crate::clip::ClipAuthoring;
use crate::config::LipsyncLayerConfig;
use crate::error::Result;
use crate::graph::{AnimatorGraph, ParameterKind, StateMachine};
use crate::manifest::{requires_generation, ManifestBinding};
use crate::progress::ProgressSink;

pub use clips::{clip_amplitude, generated_clip_name, ClipVariant, GeneratedClip};
pub use network::transition_duration;

/// Name of the generated layer
pub const LIPSYNC_LAYER_NAME: &str = "Hai_GestureLipsync";

/// Name prefix reserved for generated clips
pub const GENERATED_CLIP_PREFIX: &str = "zAutogeneratedLipsync_";

/// Int parameter carrying the current viseme
pub const VISEME_PARAMETER: &str = "Viseme";

/// Float parameter selecting the regular or wide branch
pub const ANALOG_PARAMETER: &str = "_Hai_GestureAnimLSWide";

/// Name of the idle state
pub const NONE_STATE_NAME: &str = "None";

/// Weight the layer is recreated with
const LAYER_WEIGHT: f32 = 1.0;

/// Summary of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub layer_name: String,
    /// False when no binding required the layer and it was left empty
    pub generated: bool,
    /// Number of stale generated assets removed before synthesis
    pub purged_assets: usize,
    pub regular_clips: Vec<GeneratedClip>,
    pub wide_clips: Vec<GeneratedClip>,
    pub state_count: usize,
    pub transition_count: usize,
}

impl GenerationReport {
    fn skipped() -> Self {
        Self {
            layer_name: LIPSYNC_LAYER_NAME.to_string(),
            generated: false,
            purged_assets: 0,
            regular_clips: Vec::new(),
            wide_clips: Vec::new(),
            state_count: 0,
            transition_count: 0,
        }
    }

    /// Total number of clips synthesized
    pub fn clip_count(&self) -> usize {
        self.regular_clips.len() + self.wide_clips.len()
    }
}

/// Generates the lipsync override layer for one avatar
pub struct LipsyncLayerGenerator<'a> {
    config: &'a LipsyncLayerConfig,
    avatar: &'a AvatarDescriptor,
    bindings: &'a [ManifestBinding],
    authoring: &'a dyn ClipAuthoring,
    empty_clip: ClipRef,
}

impl<'a> LipsyncLayerGenerator<'a> {
    /// Create a generator
    ///
    /// # Arguments
    /// * `empty_clip` - Shared clip with no curves, played by the none state
    pub fn new(
        config: &'a LipsyncLayerConfig,
        avatar: &'a AvatarDescriptor,
        bindings: &'a [ManifestBinding],
        authoring: &'a dyn ClipAuthoring,
        empty_clip: ClipRef,
    ) -> Self {
        Self {
            config,
            avatar,
            bindings,
            authoring,
            empty_clip,
        }
    }

    /// Regenerate the layer
    ///
    /// When no binding requires limited lipsync the layer is still reset, so
    /// downstream systems always find a stable (empty) layer in its slot.
    ///
    /// # Errors
    /// Container failures and out-of-range tweak lookups abort the run. Assets
    /// created before the failure are left for the next run's purge.
    pub fn create(
        &self,
        graph: &mut dyn AnimatorGraph,
        assets: &mut dyn AssetRegistry,
        progress: &mut dyn ProgressSink,
    ) -> Result<GenerationReport> {
        progress.report("Clearing lipsync override layer", 0.0);

        let required = requires_generation(self.bindings);
        if required {
            graph.ensure_parameter(VISEME_PARAMETER, ParameterKind::Int)?;
            graph.ensure_parameter(ANALOG_PARAMETER, ParameterKind::Float)?;
        }

        let machine = reset_layer(graph, self.config)?;

        if !required {
            info!(
                "No manifest requires limited lipsync, leaving layer '{}' empty",
                LIPSYNC_LAYER_NAME
            );
            return Ok(GenerationReport::skipped());
        }

        progress.report("Removing previously generated lipsync clips", 0.2);
        let purged_assets = self.purge_generated_clips(assets)?;
        if purged_assets > 0 {
            info!("Purged {} previously generated lipsync assets", purged_assets);
        }

        let regular_clips = self.synthesize_clips(ClipVariant::Regular, assets)?;
        let wide_clips = self.synthesize_clips(ClipVariant::Wide, assets)?;

        progress.report("Saving generated lipsync clips", 0.7);
        assets.commit()?;

        network::assemble_network(
            machine,
            self.config,
            &self.empty_clip,
            &wide_clips,
            &regular_clips,
        )?;

        let report = GenerationReport {
            layer_name: LIPSYNC_LAYER_NAME.to_string(),
            generated: true,
            purged_assets,
            regular_clips,
            wide_clips,
            state_count: machine.len(),
            transition_count: machine.any_state_transitions().len(),
        };

        info!(
            "Generated layer '{}': {} states, {} clips",
            report.layer_name,
            report.state_count,
            report.clip_count()
        );

        Ok(report)
    }

    /// Remove the layer entirely; a missing layer is not an error
    pub fn delete(graph: &mut dyn AnimatorGraph) -> Result<()> {
        if graph.remove_layer_if_exists(LIPSYNC_LAYER_NAME)? {
            info!("Removed layer '{}'", LIPSYNC_LAYER_NAME);
        } else {
            warn!("Layer '{}' not present, nothing to delete", LIPSYNC_LAYER_NAME);
        }
        Ok(())
    }
}

/// Recreate the lipsync layer empty, at the same index, with the configured mask
fn reset_layer<'g>(
    graph: &'g mut (dyn AnimatorGraph + '_),
    config: &LipsyncLayerConfig,
) -> Result<&'g mut StateMachine> {
    graph.create_or_replace_layer(LIPSYNC_LAYER_NAME, LAYER_WEIGHT, &config.mask)
}
