use crate::clip::{AnimationClip, TargetPath};
use crate::skeleton::Skeleton;

/// Connects one clip track to one bone property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub bone_index: usize,
    pub target: TargetPath,
}

pub struct Binder;

impl Binder {
    /// Resolves each track's bone name against `skeleton`.
    ///
    /// Tracks naming a bone the skeleton does not have are skipped.
    #[must_use]
    pub fn bind(skeleton: &Skeleton, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let Some(bone_index) = skeleton.bone_index(&track.meta.bone_name) else {
                log::warn!(
                    "Clip '{}': no bone named '{}' in skeleton '{}'",
                    clip.name,
                    track.meta.bone_name,
                    skeleton.name
                );
                continue;
            };

            bindings.push(PropertyBinding {
                track_index,
                bone_index,
                target: track.meta.target,
            });
        }

        bindings
    }
}
