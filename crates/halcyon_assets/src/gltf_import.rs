//! glTF 2.0 import: mesh summary, first skin as a [`Skeleton`], and every
//! animation as an [`AnimationClip`].
//!
//! Runs synchronously; callers offload it to the blocking pool.

use std::path::Path;

use glam::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use halcyon_animation::{
    AnimationClip, Bone, BonePose, InterpolationMode, KeyframeTrack, Skeleton, Track,
};
use halcyon_core::AssetError;
use halcyon_scene::{BoundingBox, MeshData};

use crate::loader::LoadedMesh;

struct Imported {
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
}

/// Parses the document and resolves its buffers. Images are never read.
fn import(path: &Path) -> Result<Imported, AssetError> {
    let label = path.display().to_string();
    let to_asset_error = |e: gltf::Error| match e {
        gltf::Error::Io(io) => AssetError::from_io(&label, &io),
        other => AssetError::Format(format!("{label}: {other}")),
    };

    let gltf::Gltf { document, blob } = gltf::Gltf::open(path).map_err(to_asset_error)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob).map_err(to_asset_error)?;
    Ok(Imported { document, buffers })
}

/// Imports the mesh, rig and clips of a `.gltf` / `.glb` file.
pub fn load_mesh(path: &Path) -> Result<LoadedMesh, AssetError> {
    let Imported { document, buffers } = import(path)?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let mut mesh = MeshData::new(name);

    for gltf_mesh in document.meshes() {
        for primitive in gltf_mesh.primitives() {
            mesh.primitive_count += 1;
            if let Some(positions) = primitive.get(&gltf::Semantic::Positions) {
                mesh.vertex_count += positions.count();
            }
            if let Some(indices) = primitive.indices() {
                mesh.index_count += indices.count();
            }
            let bounds = primitive.bounding_box();
            let bounds = BoundingBox {
                min: Vec3::from_array(bounds.min),
                max: Vec3::from_array(bounds.max),
            };
            mesh.bounds = mesh.bounds.union(&bounds);
        }
    }

    if mesh.primitive_count == 0 {
        return Err(AssetError::InvalidData(format!(
            "{}: file contains no mesh primitives",
            path.display()
        )));
    }

    log::info!(
        "Loaded mesh '{}': {} primitive(s), {} vertices",
        mesh.name,
        mesh.primitive_count,
        mesh.vertex_count
    );

    Ok(LoadedMesh {
        mesh,
        skeleton: load_skeleton(&document)?,
        clips: load_animations(&document, &buffers),
    })
}

/// Imports the first animation of a file.
pub fn load_clip(path: &Path) -> Result<AnimationClip, AssetError> {
    let Imported { document, buffers } = import(path)?;
    load_animations(&document, &buffers)
        .into_iter()
        .next()
        .ok_or_else(|| AssetError::InvalidData(format!("{}: file contains no animations", path.display())))
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn load_skeleton(document: &gltf::Document) -> Result<Option<Skeleton>, AssetError> {
    let Some(skin) = document.skins().next() else {
        return Ok(None);
    };

    let joints: Vec<gltf::Node> = skin.joints().collect();
    let joint_of = |node_index: usize| joints.iter().position(|j| j.index() == node_index);

    let mut parents = vec![None; joints.len()];
    for (parent, joint) in joints.iter().enumerate() {
        for child in joint.children() {
            if let Some(child_joint) = joint_of(child.index()) {
                parents[child_joint] = Some(parent);
            }
        }
    }

    let bones = joints
        .iter()
        .zip(parents)
        .map(|(joint, parent)| {
            let (t, r, s) = joint.transform().decomposed();
            let rest = BonePose {
                translation: Vec3::from_array(t),
                rotation: Quat::from_array(r),
                scale: Vec3::from_array(s),
            };
            Bone::new(node_name(joint), parent, rest)
        })
        .collect();

    let name = skin.name().unwrap_or("skin");
    Skeleton::new(name, bones)
        .map(Some)
        .map_err(|e| AssetError::InvalidData(format!("skin '{name}': {e}")))
}

fn load_animations(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<AnimationClip> {
    let mut clips = Vec::new();

    for anim in document.animations() {
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
            let bone_name = node_name(&channel.target().node());

            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let track = match reader.read_outputs() {
                Some(ReadOutputs::Translations(iter)) => Track::translation(
                    bone_name,
                    KeyframeTrack::new(times, iter.map(Vec3::from_array).collect(), interpolation),
                ),
                Some(ReadOutputs::Rotations(iter)) => Track::rotation(
                    bone_name,
                    KeyframeTrack::new(times, iter.into_f32().map(Quat::from_array).collect(), interpolation),
                ),
                Some(ReadOutputs::Scales(iter)) => Track::scale(
                    bone_name,
                    KeyframeTrack::new(times, iter.map(Vec3::from_array).collect(), interpolation),
                ),
                // Morph targets are not animated by this viewer.
                Some(ReadOutputs::MorphTargetWeights(_)) | None => continue,
            };

            tracks.push(track);
        }

        let name = anim
            .name()
            .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
        clips.push(AnimationClip::new(name, tracks));
    }

    clips
}
