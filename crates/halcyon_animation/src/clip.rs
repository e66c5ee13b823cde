use glam::{Quat, Vec3};

use crate::tracks::KeyframeTrack;

/// The bone property a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMeta {
    /// Name of the bone this track animates.
    pub bone_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    fn end_time(&self) -> f32 {
        match self {
            Self::Vector3(t) => t.end_time(),
            Self::Quaternion(t) => t.end_time(),
        }
    }

    fn is_well_formed(&self) -> bool {
        match self {
            Self::Vector3(t) => t.is_well_formed(),
            Self::Quaternion(t) => t.is_well_formed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn translation(bone_name: impl Into<String>, track: KeyframeTrack<Vec3>) -> Self {
        Self::vec3(bone_name, TargetPath::Translation, track)
    }

    #[must_use]
    pub fn scale(bone_name: impl Into<String>, track: KeyframeTrack<Vec3>) -> Self {
        Self::vec3(bone_name, TargetPath::Scale, track)
    }

    #[must_use]
    pub fn rotation(bone_name: impl Into<String>, track: KeyframeTrack<Quat>) -> Self {
        Self {
            meta: TrackMeta {
                bone_name: bone_name.into(),
                target: TargetPath::Rotation,
            },
            data: TrackData::Quaternion(track),
        }
    }

    fn vec3(bone_name: impl Into<String>, target: TargetPath, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            meta: TrackMeta {
                bone_name: bone_name.into(),
                target,
            },
            data: TrackData::Vector3(track),
        }
    }
}

/// A named set of tracks. Duration is the latest keyframe over all tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Builds a clip, dropping malformed tracks (empty, or with a value count
    /// not matching the interpolation mode).
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let name = name.into();
        let before = tracks.len();
        let tracks: Vec<Track> = tracks.into_iter().filter(|t| t.data.is_well_formed()).collect();
        if tracks.len() != before {
            log::warn!(
                "Clip '{name}': dropped {} malformed track(s)",
                before - tracks.len()
            );
        }

        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            tracks,
        }
    }
}
