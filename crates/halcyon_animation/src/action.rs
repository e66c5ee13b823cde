use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::binder::PropertyBinding;
use crate::clip::{AnimationClip, TargetPath, TrackData};
use crate::skeleton::Skeleton;
use crate::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    #[default]
    Loop,
    PingPong,
}

/// Playback state of one clip on one skeleton.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,

    pub bindings: Vec<PropertyBinding>,

    track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>, bindings: Vec<PropertyBinding>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::default(),
            paused: false,
            bindings,
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
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

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Advances the playhead by `dt` seconds (scaled by `time_scale`).
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let t = self.time.rem_euclid(double_duration);
                self.time = if t > duration { double_duration - t } else { t };
            }
        }
    }

    /// Writes sampled track values into the bound bones' local pose.
    pub fn apply(&mut self, skeleton: &mut Skeleton) {
        let time = self.time;
        for binding in &self.bindings {
            let Some(track) = self.clip.tracks.get(binding.track_index) else {
                continue;
            };
            let Some(cursor) = self.track_cursors.get_mut(binding.track_index) else {
                continue;
            };
            let Some(pose) = skeleton.pose_mut(binding.bone_index) else {
                continue;
            };

            match (&track.data, binding.target) {
                (TrackData::Vector3(t), TargetPath::Translation) => {
                    if let Some(v) = t.sample_with_cursor(time, cursor) {
                        pose.translation = v;
                    }
                }
                (TrackData::Vector3(t), TargetPath::Scale) => {
                    if let Some(v) = t.sample_with_cursor(time, cursor) {
                        pose.scale = v;
                    }
                }
                (TrackData::Quaternion(t), TargetPath::Rotation) => {
                    if let Some(q) = t.sample_with_cursor(time, cursor) {
                        pose.rotation = q;
                    }
                }
                _ => {}
            }
        }
    }

    /// Samples a single track at the current time without touching a skeleton.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
