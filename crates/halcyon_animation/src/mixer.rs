use std::sync::Arc;

use halcyon_core::AssetError;
use smallvec::SmallVec;

use crate::action::{AnimationAction, LoopMode};
use crate::binder::Binder;
use crate::clip::AnimationClip;
use crate::skeleton::Skeleton;

/// Lifecycle of the mixer's single clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixerState {
    /// Nothing requested, or the last request failed.
    Idle,
    /// Waiting for the mesh skeleton, the clip, or both.
    Loading,
    /// Clip resolved against the skeleton; playback not started.
    Bound,
    Playing,
}

/// Drives one clip on one skeleton.
///
/// Mesh and clip arrive independently and in either order. The clip is only
/// bound once the skeleton is present, so playback can never start against a
/// mesh that has not finished loading.
#[derive(Debug)]
pub struct AnimationMixer {
    state: MixerState,
    history: SmallVec<[MixerState; 8]>,

    skeleton: Option<Skeleton>,
    waiting_clip: Option<Arc<AnimationClip>>,
    action: Option<AnimationAction>,

    loop_mode: LoopMode,
    time_scale: f32,
    auto_play: bool,

    /// Set by `play()`; the next `advance` applies the start pose without
    /// moving the playhead.
    pending_start: bool,
    last_error: Option<AssetError>,
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        let mut history = SmallVec::new();
        history.push(MixerState::Idle);
        Self {
            state: MixerState::Idle,
            history,
            skeleton: None,
            waiting_clip: None,
            action: None,
            loop_mode: LoopMode::default(),
            time_scale: 1.0,
            auto_play: false,
            pending_start: false,
            last_error: None,
        }
    }

    /// Start playback as soon as the clip binds.
    #[must_use]
    pub fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> MixerState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    #[must_use]
    pub fn transitions(&self) -> &[MixerState] {
        &self.history
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&AssetError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    #[must_use]
    pub fn action(&self) -> Option<&AnimationAction> {
        self.action.as_ref()
    }

    /// Playhead of the bound clip in seconds, `None` before binding.
    #[must_use]
    pub fn playback_time(&self) -> Option<f32> {
        self.action.as_ref().map(|a| a.time)
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
        if let Some(action) = &mut self.action {
            action.time_scale = time_scale;
        }
    }

    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
        if let Some(action) = &mut self.action {
            action.loop_mode = loop_mode;
        }
    }

    // ========================================================================
    // Load sequencing
    // ========================================================================

    /// Discards any previous skeleton and clip and waits for new ones.
    pub fn begin_loading(&mut self) {
        self.skeleton = None;
        self.waiting_clip = None;
        self.action = None;
        self.pending_start = false;
        self.last_error = None;
        self.transition(MixerState::Loading);
    }

    pub fn on_mesh_loaded(&mut self, skeleton: Skeleton) {
        if self.state != MixerState::Loading {
            log::debug!("Mixer: ignoring skeleton '{}' in state {:?}", skeleton.name, self.state);
            return;
        }
        log::debug!("Mixer: skeleton '{}' ready ({} bones)", skeleton.name, skeleton.bone_count());
        self.skeleton = Some(skeleton);
        self.try_bind();
    }

    pub fn on_clip_loaded(&mut self, clip: Arc<AnimationClip>) {
        if self.state != MixerState::Loading {
            log::debug!("Mixer: ignoring clip '{}' in state {:?}", clip.name, self.state);
            return;
        }
        log::debug!("Mixer: clip '{}' ready ({:.3}s)", clip.name, clip.duration);
        self.waiting_clip = Some(clip);
        self.try_bind();
    }

    /// Abandons the current load. Completions arriving afterwards are ignored
    /// until the next [`begin_loading`](Self::begin_loading).
    pub fn on_load_failed(&mut self, error: AssetError) {
        if self.state != MixerState::Loading {
            log::debug!("Mixer: ignoring failure in state {:?}: {error}", self.state);
            return;
        }
        log::warn!("Animation load failed: {error}");
        self.skeleton = None;
        self.waiting_clip = None;
        self.last_error = Some(error);
        self.transition(MixerState::Idle);
    }

    fn try_bind(&mut self) {
        let Some(skeleton) = &self.skeleton else {
            return;
        };
        let Some(clip) = self.waiting_clip.take() else {
            return;
        };

        let bindings = Binder::bind(skeleton, &clip);
        if bindings.is_empty() && !clip.tracks.is_empty() {
            log::warn!(
                "Clip '{}' has no track matching skeleton '{}'",
                clip.name,
                skeleton.name
            );
        }

        self.action = Some(
            AnimationAction::new(clip, bindings)
                .with_loop_mode(self.loop_mode)
                .with_time_scale(self.time_scale),
        );
        self.transition(MixerState::Bound);

        if self.auto_play {
            self.play();
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// `Bound → Playing`. Returns whether playback started.
    pub fn play(&mut self) -> bool {
        if self.state != MixerState::Bound {
            return false;
        }
        self.pending_start = true;
        self.transition(MixerState::Playing);
        true
    }

    /// Advances playback by `delta` seconds.
    ///
    /// Does nothing unless `Playing`. The first call after `play()` applies
    /// the pose at time zero without advancing.
    pub fn advance(&mut self, delta: f32) {
        if self.state != MixerState::Playing {
            return;
        }
        let (Some(action), Some(skeleton)) = (&mut self.action, &mut self.skeleton) else {
            return;
        };

        if self.pending_start {
            self.pending_start = false;
        } else {
            action.update(delta);
        }

        action.apply(skeleton);
        skeleton.update_world_matrices();
    }

    /// Drops everything and returns to `Idle`.
    pub fn reset(&mut self) {
        self.skeleton = None;
        self.waiting_clip = None;
        self.action = None;
        self.pending_start = false;
        if self.state != MixerState::Idle {
            self.transition(MixerState::Idle);
        }
    }

    fn transition(&mut self, next: MixerState) {
        if self.state == next {
            return;
        }
        log::debug!("Mixer: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}
