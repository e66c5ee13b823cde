//! Bone hierarchy and pose.
//!
//! A [`Skeleton`] stores bones in load order together with a parent-first
//! evaluation order computed once at construction, so world matrices can be
//! rebuilt every frame in a single pass.

use std::collections::VecDeque;

use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Local TRS of one bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BonePose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for BonePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Pose the bone returns to on [`Skeleton::reset_pose`].
    pub rest: BonePose,
}

impl Bone {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>, rest: BonePose) -> Self {
        Self {
            name: name.into(),
            parent,
            rest,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkeletonError {
    #[error("bone {bone} references missing parent {parent}")]
    ParentOutOfRange { bone: usize, parent: usize },

    #[error("bone {bone} is part of a parent cycle")]
    Cycle { bone: usize },
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,
    bones: Vec<Bone>,
    pose: Vec<BonePose>,
    world: Vec<Affine3A>,
    /// Parents always precede their children.
    order: Vec<usize>,
    by_name: FxHashMap<String, usize>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>, bones: Vec<Bone>) -> Result<Self, SkeletonError> {
        let count = bones.len();
        let mut children = vec![Vec::new(); count];
        let mut queue = VecDeque::new();

        for (i, bone) in bones.iter().enumerate() {
            match bone.parent {
                Some(p) if p >= count => {
                    return Err(SkeletonError::ParentOutOfRange { bone: i, parent: p });
                }
                Some(p) => children[p].push(i),
                None => queue.push_back(i),
            }
        }

        let mut order = Vec::with_capacity(count);
        while let Some(i) = queue.pop_front() {
            order.push(i);
            queue.extend(children[i].iter().copied());
        }

        if order.len() != count {
            let mut reached = vec![false; count];
            for &i in &order {
                reached[i] = true;
            }
            let bone = reached.iter().position(|r| !r).unwrap_or(0);
            return Err(SkeletonError::Cycle { bone });
        }

        let mut by_name = FxHashMap::default();
        for (i, bone) in bones.iter().enumerate() {
            // First bone wins on duplicate names.
            by_name.entry(bone.name.clone()).or_insert(i);
        }

        let pose: Vec<BonePose> = bones.iter().map(|b| b.rest).collect();
        let mut skeleton = Self {
            name: name.into(),
            bones,
            pose,
            world: vec![Affine3A::IDENTITY; count],
            order,
            by_name,
        };
        skeleton.update_world_matrices();
        Ok(skeleton)
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn pose(&self, bone: usize) -> Option<&BonePose> {
        self.pose.get(bone)
    }

    #[inline]
    pub fn pose_mut(&mut self, bone: usize) -> Option<&mut BonePose> {
        self.pose.get_mut(bone)
    }

    /// Restores every bone to its rest pose and rebuilds world matrices.
    pub fn reset_pose(&mut self) {
        for (pose, bone) in self.pose.iter_mut().zip(&self.bones) {
            *pose = bone.rest;
        }
        self.update_world_matrices();
    }

    /// Recomputes model-space bone matrices from the current local pose.
    pub fn update_world_matrices(&mut self) {
        for &i in &self.order {
            let local = self.pose[i].matrix();
            self.world[i] = match self.bones[i].parent {
                Some(p) => self.world[p] * local,
                None => local,
            };
        }
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self, bone: usize) -> Option<&Affine3A> {
        self.world.get(bone)
    }

    #[inline]
    #[must_use]
    pub fn world_matrices(&self) -> &[Affine3A] {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_listed_before_parents_still_evaluate_parent_first() {
        let bones = vec![
            Bone::new("hand", Some(1), BonePose { translation: Vec3::X, ..BonePose::IDENTITY }),
            Bone::new("arm", None, BonePose { translation: Vec3::Y, ..BonePose::IDENTITY }),
        ];
        let skeleton = Skeleton::new("rig", bones).unwrap();
        let hand = skeleton.world_matrix(0).unwrap();
        assert_eq!(Vec3::from(hand.translation), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn cycle_is_rejected() {
        let bones = vec![
            Bone::new("a", Some(1), BonePose::IDENTITY),
            Bone::new("b", Some(0), BonePose::IDENTITY),
        ];
        assert_eq!(
            Skeleton::new("rig", bones).unwrap_err(),
            SkeletonError::Cycle { bone: 0 }
        );
    }
}
