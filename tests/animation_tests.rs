//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation
//! - KeyframeCursor sequential access and jumps
//! - AnimationAction loop modes (Once, Loop, PingPong) and time scale
//! - AnimationClip duration and malformed track filtering
//! - Skeleton hierarchy, binding and pose application
//! - AnimationMixer load sequencing and playback

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use halcyon::animation::{
    AnimationAction, AnimationClip, AnimationMixer, Binder, Bone, BonePose, InterpolationMode, KeyframeCursor,
    KeyframeTrack, LoopMode, MixerState, Skeleton, SkeletonError, TargetPath, Track, TrackValue,
};
use halcyon::core::AssetError;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// KeyframeTrack: Linear / Step
// ============================================================================

#[test]
fn track_linear_f32_midpoint() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    let val = track.sample_with_cursor(0.5, &mut cursor).unwrap();
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn track_linear_f32_clamps_outside_range() {
    let track = KeyframeTrack::new(vec![1.0, 2.0], vec![4.0_f32, 8.0], InterpolationMode::Linear);

    assert!(approx(track.sample(0.0).unwrap(), 4.0));
    assert!(approx(track.sample(5.0).unwrap(), 8.0));
}

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![1.0_f32, 2.0, 3.0],
        InterpolationMode::Step,
    );

    assert!(approx(track.sample(0.99).unwrap(), 1.0));
    assert!(approx(track.sample(1.0).unwrap(), 2.0));
    assert!(approx(track.sample(1.5).unwrap(), 2.0));
}

#[test]
fn track_linear_quat_slerp() {
    let end = Quat::from_rotation_y(FRAC_PI_2);
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![Quat::IDENTITY, end], InterpolationMode::Linear);

    let mid = track.sample(0.5).unwrap();
    let expected = Quat::from_rotation_y(FRAC_PI_2 * 0.5);
    assert!(mid.angle_between(expected) < 1e-4, "got {mid:?}");
}

#[test]
fn malformed_track_samples_none() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32], InterpolationMode::Linear);
    assert!(!track.is_well_formed());
    assert_eq!(track.sample(0.5), None);

    let empty: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    assert_eq!(empty.sample(0.0), None);
}

// ============================================================================
// KeyframeTrack: Cubic Spline
// ============================================================================

#[test]
fn track_cubic_f32_endpoints() {
    // [in_tangent, value, out_tangent] per keyframe
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 1.0, 1.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(track.sample_with_cursor(0.0, &mut cursor).unwrap(), 0.0));
    assert!(approx(track.sample_with_cursor(1.0, &mut cursor).unwrap(), 10.0));
}

#[test]
fn track_cubic_zero_tangents_is_symmetric() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 0.0, 0.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    // Hermite with zero tangents passes the midpoint exactly halfway.
    assert!(approx(track.sample(0.5).unwrap(), 5.0));
    assert!(track.sample(0.25).unwrap() < 2.5);
}

// ============================================================================
// KeyframeCursor
// ============================================================================

#[test]
fn cursor_sequential_forward() {
    let times: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let values: Vec<f32> = (0..10).map(|i| i as f32 * 10.0).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    for step in 0..90 {
        let t = step as f32 * 0.1;
        let val = track.sample_with_cursor(t, &mut cursor).unwrap();
        assert!((val - t * 10.0).abs() < 1e-3, "t={t}: got {val}");
    }
    assert_eq!(cursor.last_index, 8);
}

#[test]
fn cursor_matches_stateless_sample_after_jumps() {
    let times: Vec<f32> = (0..20).map(|i| i as f32 * 0.5).collect();
    let values: Vec<f32> = (0..20).map(|i| (i * i) as f32).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    for t in [0.2, 9.4, 0.1, 5.0, 5.2, 1.7, 9.9, 0.0] {
        let with_cursor = track.sample_with_cursor(t, &mut cursor).unwrap();
        let stateless = track.sample(t).unwrap();
        assert!(approx(with_cursor, stateless), "t={t}: {with_cursor} vs {stateless}");
    }
}

// ============================================================================
// AnimationAction Loop Modes
// ============================================================================

fn make_simple_clip(duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        "test",
        vec![Track::translation(
            "root",
            KeyframeTrack::new(vec![0.0, duration], vec![Vec3::ZERO, Vec3::X], InterpolationMode::Linear),
        )],
    ))
}

#[test]
fn action_loop_mode_once() {
    let mut action = AnimationAction::new(make_simple_clip(2.0), vec![]).with_loop_mode(LoopMode::Once);

    action.update(3.0);
    assert!(approx(action.time, 2.0), "Once: should clamp to duration, got {}", action.time);
    assert!(action.paused, "Once: should auto-pause at end");
}

#[test]
fn action_loop_mode_loop() {
    let mut action = AnimationAction::new(make_simple_clip(2.0), vec![]);
    assert_eq!(action.loop_mode, LoopMode::Loop);

    action.update(2.5);
    assert!(approx(action.time, 0.5), "Loop: should wrap to 0.5, got {}", action.time);
    assert!(!action.paused);
}

#[test]
fn action_loop_reverse_playback_wraps_into_range() {
    let mut action = AnimationAction::new(make_simple_clip(2.0), vec![]).with_time_scale(-1.0);
    action.time = 0.5;

    action.update(1.0);
    assert!(approx(action.time, 1.5), "got {}", action.time);
}

#[test]
fn action_loop_mode_ping_pong() {
    let mut action = AnimationAction::new(make_simple_clip(2.0), vec![]).with_loop_mode(LoopMode::PingPong);

    action.update(2.5);
    assert!(approx(action.time, 1.5), "PingPong: should reflect to 1.5, got {}", action.time);

    action.update(2.0);
    assert!(approx(action.time, 0.5), "PingPong: second pass, got {}", action.time);
}

#[test]
fn action_paused_no_update() {
    let mut action = AnimationAction::new(make_simple_clip(2.0), vec![]);
    action.paused = true;
    action.time = 0.5;

    action.update(1.0);
    assert!(approx(action.time, 0.5), "Paused action should not advance");
}

#[test]
fn action_time_scale() {
    let mut action = AnimationAction::new(make_simple_clip(4.0), vec![])
        .with_loop_mode(LoopMode::Once)
        .with_time_scale(2.0);

    action.update(1.0);
    assert!(approx(action.time, 2.0), "Expected 2.0, got {}", action.time);
}

#[test]
fn action_samples_track_at_playhead() {
    let mut action = AnimationAction::new(make_simple_clip(2.0), vec![]);
    action.update(1.0);

    match action.sample_track(0) {
        Some(TrackValue::Vector3(v)) => assert!(approx_vec3(v, Vec3::new(0.5, 0.0, 0.0)), "got {v}"),
        other => panic!("unexpected sample {other:?}"),
    }
    assert_eq!(action.sample_track(7), None);
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_auto_duration() {
    let clip = AnimationClip::new(
        "test",
        vec![
            Track::translation(
                "a",
                KeyframeTrack::new(vec![0.0, 1.5], vec![Vec3::ZERO, Vec3::ONE], InterpolationMode::Linear),
            ),
            Track::rotation(
                "b",
                KeyframeTrack::new(vec![0.0, 3.0], vec![Quat::IDENTITY; 2], InterpolationMode::Linear),
            ),
        ],
    );
    assert!(approx(clip.duration, 3.0), "got {}", clip.duration);
}

#[test]
fn clip_drops_malformed_tracks() {
    let clip = AnimationClip::new(
        "broken",
        vec![
            Track::translation(
                "a",
                KeyframeTrack::new(vec![0.0, 9.0], vec![Vec3::ZERO], InterpolationMode::Linear),
            ),
            Track::scale(
                "b",
                KeyframeTrack::new(vec![0.0, 1.0], vec![Vec3::ONE; 2], InterpolationMode::Linear),
            ),
        ],
    );
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.target, TargetPath::Scale);
    assert!(approx(clip.duration, 1.0));
}

#[test]
fn clip_empty_tracks_zero_duration() {
    let clip = AnimationClip::new("empty", vec![]);
    assert!(approx(clip.duration, 0.0));
}

// ============================================================================
// Skeleton
// ============================================================================

fn arm_skeleton() -> Skeleton {
    Skeleton::new(
        "arm",
        vec![
            Bone::new("shoulder", None, BonePose::IDENTITY),
            Bone::new(
                "elbow",
                Some(0),
                BonePose {
                    translation: Vec3::new(0.0, 2.0, 0.0),
                    ..BonePose::IDENTITY
                },
            ),
            Bone::new(
                "wrist",
                Some(1),
                BonePose {
                    translation: Vec3::new(0.0, 1.0, 0.0),
                    ..BonePose::IDENTITY
                },
            ),
        ],
    )
    .unwrap()
}

#[test]
fn skeleton_world_matrices_chain_parents() {
    let skeleton = arm_skeleton();
    let wrist = skeleton.world_matrix(2).unwrap();
    assert!(approx_vec3(wrist.translation.into(), Vec3::new(0.0, 3.0, 0.0)));

    let heights: Vec<f32> = skeleton.world_matrices().iter().map(|m| m.translation.y).collect();
    assert_eq!(heights, vec![0.0, 2.0, 3.0]);
}

#[test]
fn skeleton_parent_rotation_moves_children() {
    let mut skeleton = arm_skeleton();
    skeleton.pose_mut(0).unwrap().rotation = Quat::from_rotation_z(-FRAC_PI_2);
    skeleton.update_world_matrices();

    let wrist: Vec3 = skeleton.world_matrix(2).unwrap().translation.into();
    assert!(approx_vec3(wrist, Vec3::new(3.0, 0.0, 0.0)), "got {wrist}");

    skeleton.reset_pose();
    let wrist: Vec3 = skeleton.world_matrix(2).unwrap().translation.into();
    assert!(approx_vec3(wrist, Vec3::new(0.0, 3.0, 0.0)));
}

#[test]
fn skeleton_rejects_bad_hierarchies() {
    let out_of_range = Skeleton::new("bad", vec![Bone::new("a", Some(4), BonePose::IDENTITY)]);
    assert_eq!(out_of_range.unwrap_err(), SkeletonError::ParentOutOfRange { bone: 0, parent: 4 });

    let cycle = Skeleton::new(
        "loop",
        vec![
            Bone::new("a", Some(1), BonePose::IDENTITY),
            Bone::new("b", Some(0), BonePose::IDENTITY),
        ],
    );
    assert!(matches!(cycle, Err(SkeletonError::Cycle { .. })));
}

#[test]
fn binder_skips_unknown_bones() {
    let skeleton = arm_skeleton();
    let clip = AnimationClip::new(
        "wave",
        vec![
            Track::rotation(
                "elbow",
                KeyframeTrack::new(vec![0.0, 1.0], vec![Quat::IDENTITY; 2], InterpolationMode::Linear),
            ),
            Track::translation(
                "tail",
                KeyframeTrack::new(vec![0.0, 1.0], vec![Vec3::ZERO; 2], InterpolationMode::Linear),
            ),
        ],
    );

    let bindings = Binder::bind(&skeleton, &clip);
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].bone_index, 1);
    assert_eq!(bindings[0].target, TargetPath::Rotation);
}

#[test]
fn action_apply_writes_bone_pose() {
    let mut skeleton = arm_skeleton();
    let clip = Arc::new(AnimationClip::new(
        "lift",
        vec![Track::translation(
            "wrist",
            KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 3.0, 0.0)],
                InterpolationMode::Linear,
            ),
        )],
    ));
    let bindings = Binder::bind(&skeleton, &clip);
    let mut action = AnimationAction::new(clip, bindings);

    action.update(0.5);
    action.apply(&mut skeleton);
    skeleton.update_world_matrices();

    let wrist: Vec3 = skeleton.world_matrix(2).unwrap().translation.into();
    assert!(approx_vec3(wrist, Vec3::new(0.0, 4.0, 0.0)), "got {wrist}");
}

// ============================================================================
// AnimationMixer
// ============================================================================

fn walk_clip() -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        "walk",
        vec![Track::translation(
            "shoulder",
            KeyframeTrack::new(vec![0.0, 2.0], vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)], InterpolationMode::Linear),
        )],
    ))
}

#[test]
fn mixer_binds_in_either_order() {
    for mesh_first in [true, false] {
        let mut mixer = AnimationMixer::new();
        mixer.begin_loading();
        if mesh_first {
            mixer.on_mesh_loaded(arm_skeleton());
            assert_eq!(mixer.state(), MixerState::Loading);
            mixer.on_clip_loaded(walk_clip());
        } else {
            mixer.on_clip_loaded(walk_clip());
            assert_eq!(mixer.state(), MixerState::Loading);
            mixer.on_mesh_loaded(arm_skeleton());
        }
        assert_eq!(mixer.state(), MixerState::Bound);
        assert_eq!(
            mixer.transitions(),
            &[MixerState::Idle, MixerState::Loading, MixerState::Bound]
        );
    }
}

#[test]
fn mixer_advance_is_noop_until_playing() {
    let mut mixer = AnimationMixer::new();
    mixer.advance(1.0);
    assert_eq!(mixer.state(), MixerState::Idle);

    mixer.begin_loading();
    mixer.advance(1.0);
    mixer.on_mesh_loaded(arm_skeleton());
    mixer.on_clip_loaded(walk_clip());
    mixer.advance(1.0);

    assert_eq!(mixer.state(), MixerState::Bound);
    assert_eq!(mixer.playback_time(), Some(0.0));
}

#[test]
fn mixer_activation_frame_does_not_advance() {
    let mut mixer = AnimationMixer::new();
    mixer.begin_loading();
    mixer.on_mesh_loaded(arm_skeleton());
    mixer.on_clip_loaded(walk_clip());
    assert!(mixer.play());
    assert!(!mixer.play(), "play() only applies while Bound");

    mixer.advance(0.25);
    assert_eq!(mixer.playback_time(), Some(0.0));

    mixer.advance(0.5);
    assert!(approx(mixer.playback_time().unwrap(), 0.5));

    let shoulder = mixer.skeleton().unwrap().pose(0).unwrap().translation;
    assert!(approx_vec3(shoulder, Vec3::new(0.5, 0.0, 0.0)), "got {shoulder}");
}

#[test]
fn mixer_auto_play_starts_on_bind() {
    let mut mixer = AnimationMixer::new().with_auto_play(true).with_time_scale(2.0);
    mixer.begin_loading();
    mixer.on_clip_loaded(walk_clip());
    mixer.on_mesh_loaded(arm_skeleton());

    assert_eq!(mixer.state(), MixerState::Playing);
    assert_eq!(
        mixer.transitions(),
        &[MixerState::Idle, MixerState::Loading, MixerState::Bound, MixerState::Playing]
    );

    mixer.advance(0.1);
    mixer.advance(0.25);
    assert!(approx(mixer.playback_time().unwrap(), 0.5));
}

#[test]
fn mixer_failure_returns_to_idle_and_reports() {
    let mut mixer = AnimationMixer::new().with_auto_play(true);
    mixer.begin_loading();
    mixer.on_mesh_loaded(arm_skeleton());
    mixer.on_load_failed(AssetError::Format("walk.glb: bad header".into()));

    assert_eq!(mixer.state(), MixerState::Idle);
    assert!(matches!(mixer.last_error(), Some(AssetError::Format(_))));

    // The clip of the failed load arrives late.
    mixer.on_clip_loaded(walk_clip());
    assert_eq!(mixer.state(), MixerState::Idle);
    assert!(mixer.action().is_none());

    // A new load clears the error.
    mixer.begin_loading();
    assert!(mixer.last_error().is_none());
}

#[test]
fn mixer_loop_mode_applies_to_bound_action() {
    let mut mixer = AnimationMixer::new().with_auto_play(true);
    mixer.begin_loading();
    mixer.on_mesh_loaded(arm_skeleton());
    mixer.on_clip_loaded(walk_clip());
    mixer.set_loop_mode(LoopMode::Once);

    mixer.advance(0.0);
    mixer.advance(5.0);
    assert!(approx(mixer.playback_time().unwrap(), 2.0));
    assert_eq!(mixer.action().unwrap().loop_mode, LoopMode::Once);
}

#[test]
fn mixer_time_scale_change_applies_mid_playback() {
    let mut mixer = AnimationMixer::new().with_auto_play(true);
    mixer.begin_loading();
    mixer.on_mesh_loaded(arm_skeleton());
    mixer.on_clip_loaded(walk_clip());

    mixer.advance(0.0);
    mixer.advance(0.5);
    mixer.set_time_scale(2.0);
    mixer.advance(0.25);
    assert!(approx(mixer.playback_time().unwrap(), 1.0));
    assert_eq!(mixer.action().unwrap().time_scale, 2.0);
}

#[test]
fn mixer_reset_drops_everything() {
    let mut mixer = AnimationMixer::new().with_auto_play(true);
    mixer.begin_loading();
    mixer.on_mesh_loaded(arm_skeleton());
    mixer.on_clip_loaded(walk_clip());

    mixer.reset();
    assert_eq!(mixer.state(), MixerState::Idle);
    assert!(mixer.skeleton().is_none());
    assert_eq!(mixer.playback_time(), None);
}
