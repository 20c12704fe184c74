//! Clip Driver Tests
//!
//! Tests for:
//! - initialize: neck track trimming, action creation, clip 0 playing
//! - select_clip: single running action, rejected indices leave state intact
//! - advance: zero-elapsed idempotence, accumulated mixer time
//! - look_at: neck orientation, no-op outside head-controllable clips

use glam::{Quat, Vec2, Vec3};

use kinema::animation::binding::TargetPath;
use kinema::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use kinema::animation::tracks::{InterpolationMode, KeyframeTrack};
use kinema::app::FrameClock;
use kinema::driver::{ClipDriver, HeadTracking};
use kinema::errors::Error;
use kinema::scene::{Node, NodeHandle, Scene};

const EPSILON: f32 = 1e-4;
const NECK_TRACK: &str = "mixamorigNeck.quaternion";

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

struct Rig {
    scene: Scene,
    root: NodeHandle,
    spine: NodeHandle,
    neck: NodeHandle,
}

/// `gltf_root → mixamorigHips → mixamorigSpine → mixamorigNeck → mixamorigHead`
fn rig() -> Rig {
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("gltf_root");

    let mut hips = Node::new("mixamorigHips");
    hips.transform.position = Vec3::new(0.0, 1.0, 0.0);
    let hips = scene.add_to_parent(hips, root);

    let mut spine = Node::new("mixamorigSpine");
    spine.transform.position = Vec3::new(0.0, 0.3, 0.0);
    let spine = scene.add_to_parent(spine, hips);

    let mut neck = Node::new("mixamorigNeck");
    neck.transform.position = Vec3::new(0.0, 0.2, 0.0);
    let neck = scene.add_to_parent(neck, spine);

    scene.add_to_parent(Node::new("mixamorigHead"), neck);

    Rig {
        scene,
        root,
        spine,
        neck,
    }
}

fn rotation_track(node: &str, duration: f32) -> Track {
    Track::new(
        TrackMeta::new(node, TargetPath::Rotation),
        TrackData::Quaternion(KeyframeTrack::new(
            vec![0.0, duration],
            vec![Quat::IDENTITY, Quat::from_rotation_x(0.5)],
            InterpolationMode::Linear,
        )),
    )
}

fn position_track(node: &str, duration: f32) -> Track {
    Track::new(
        TrackMeta::new(node, TargetPath::Translation),
        TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, duration],
            vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.1, 0.0)],
            InterpolationMode::Linear,
        )),
    )
}

/// One neck rotation track plus two unrelated tracks.
fn clip(name: &str, duration: f32) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![
            position_track("mixamorigHips", duration),
            rotation_track("mixamorigNeck", duration),
            rotation_track("mixamorigSpine", duration),
        ],
    )
}

fn four_clips() -> Vec<AnimationClip> {
    vec![
        clip("Idle", 2.0),
        clip("Walk", 1.0),
        clip("Run", 0.8),
        clip("Wave", 3.0),
    ]
}

fn running_indices(driver: &ClipDriver, scene: &Scene) -> Vec<usize> {
    let mixer = scene.mixer(driver.mixer_key()).unwrap();
    (0..driver.clip_count())
        .filter(|&i| {
            let key = driver.action_key(i).unwrap();
            mixer.action(key).unwrap().is_running()
        })
        .collect()
}

fn action_time(driver: &ClipDriver, scene: &Scene, index: usize) -> f32 {
    let mixer = scene.mixer(driver.mixer_key()).unwrap();
    mixer.action(driver.action_key(index).unwrap()).unwrap().time
}

fn neck_forward(scene: &Scene, neck: NodeHandle) -> Vec3 {
    let (_, rotation, _) = scene
        .world_matrix(neck)
        .unwrap()
        .to_scale_rotation_translation();
    rotation * Vec3::Z
}

// ============================================================================
// initialize
// ============================================================================

#[test]
fn initialize_trims_neck_tracks_of_head_controllable_clips() {
    let mut rig = rig();
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    let clips = driver.clips();
    assert_eq!(clips.len(), 4);
    assert_eq!(clips[0].tracks.len(), 2);
    assert_eq!(clips[3].tracks.len(), 2);
    assert_eq!(clips[1].tracks.len(), 3);
    assert_eq!(clips[2].tracks.len(), 3);

    for index in [0, 3] {
        assert!(
            clips[index].tracks.iter().all(|t| !t.is_named(NECK_TRACK)),
            "clip {index} still has a neck rotation track"
        );
    }
    for index in [1, 2] {
        assert_eq!(clips[index].find_tracks_named(NECK_TRACK).len(), 1);
    }

    assert_eq!(driver.playing_index(), 0);
    assert_eq!(running_indices(&driver, &rig.scene), [0]);
    assert_eq!(driver.neck(), Some(rig.neck));
}

#[test]
fn initialize_keeps_clip_order() {
    let mut rig = rig();
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    let names: Vec<&str> = driver.clips().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Idle", "Walk", "Run", "Wave"]);
    for i in 0..4 {
        let mixer = rig.scene.mixer(driver.mixer_key()).unwrap();
        let action = mixer.action(driver.action_key(i).unwrap()).unwrap();
        assert_eq!(action.clip().name, names[i]);
    }
}

#[test]
fn initialize_rejects_empty_clip_set() {
    let mut rig = rig();
    let result =
        ClipDriver::initialize(&mut rig.scene, rig.root, Vec::new(), &HeadTracking::default());
    assert!(matches!(result, Err(Error::EmptyClipSet)));
    assert_eq!(rig.scene.animation_mixers.len(), 0);
}

#[test]
fn initialize_skips_out_of_range_head_indices() {
    let mut rig = rig();
    let head_tracking = HeadTracking {
        controllable_clips: vec![1, 9],
        ..HeadTracking::default()
    };
    let driver =
        ClipDriver::initialize(&mut rig.scene, rig.root, four_clips(), &head_tracking).unwrap();

    assert!(driver.is_head_controllable(1));
    assert!(!driver.is_head_controllable(9));
    assert!(!driver.is_head_controllable(0));
    assert_eq!(driver.clips()[1].tracks.len(), 2);
    assert_eq!(driver.clips()[0].tracks.len(), 3);
}

#[test]
fn initialize_without_neck_joint_still_plays() {
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("gltf_root");
    scene.add_to_parent(Node::new("mixamorigHips"), root);

    let driver =
        ClipDriver::initialize(&mut scene, root, four_clips(), &HeadTracking::default()).unwrap();
    assert!(driver.neck().is_none());
    assert_eq!(running_indices(&driver, &scene), [0]);

    assert!(!driver.look_at(&mut scene, Vec2::new(0.3, -0.2)));
}

#[test]
fn neck_track_name_follows_configured_joint() {
    let head_tracking = HeadTracking {
        neck_joint: "Neck".to_string(),
        ..HeadTracking::default()
    };
    assert_eq!(head_tracking.neck_track_name(), "Neck.quaternion");
    assert_eq!(HeadTracking::default().neck_track_name(), NECK_TRACK);
}

// ============================================================================
// select_clip
// ============================================================================

#[test]
fn select_clip_switches_the_single_running_action() {
    let mut rig = rig();
    let mut driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    for index in [2, 1, 3, 0, 0] {
        driver.select_clip(&mut rig.scene, index).unwrap();
        assert_eq!(driver.playing_index(), index);
        assert_eq!(running_indices(&driver, &rig.scene), [index]);
    }
}

#[test]
fn select_clip_stops_and_rewinds_previous_action() {
    let mut rig = rig();
    let mut driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    ClipDriver::advance(&mut rig.scene, 0.5);
    assert!(approx(action_time(&driver, &rig.scene, 0), 0.5));

    driver.select_clip(&mut rig.scene, 2).unwrap();
    assert!(approx(action_time(&driver, &rig.scene, 0), 0.0));
    assert_eq!(driver.playing_index(), 2);

    ClipDriver::advance(&mut rig.scene, 0.25);
    assert!(approx(action_time(&driver, &rig.scene, 2), 0.25));
    assert!(approx(action_time(&driver, &rig.scene, 0), 0.0));
}

#[test]
fn select_clip_out_of_range_changes_nothing() {
    let mut rig = rig();
    let mut driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();
    ClipDriver::advance(&mut rig.scene, 0.3);

    let err = driver.select_clip(&mut rig.scene, 7).unwrap_err();
    assert!(matches!(err, Error::InvalidClipIndex { index: 7, len: 4 }));

    assert_eq!(driver.playing_index(), 0);
    assert_eq!(running_indices(&driver, &rig.scene), [0]);
    assert!(approx(action_time(&driver, &rig.scene, 0), 0.3));
}

// ============================================================================
// advance
// ============================================================================

#[test]
fn advance_by_zero_is_idempotent() {
    let mut rig = rig();
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();
    ClipDriver::advance(&mut rig.scene, 0.7);

    let mixer_time = rig.scene.mixer(driver.mixer_key()).unwrap().time;
    let action = action_time(&driver, &rig.scene, 0);
    for _ in 0..10 {
        ClipDriver::advance(&mut rig.scene, 0.0);
    }
    assert!(approx(rig.scene.mixer(driver.mixer_key()).unwrap().time, mixer_time));
    assert!(approx(action_time(&driver, &rig.scene, 0), action));
}

#[test]
fn sixty_frames_of_16_7_ms_accumulate_to_1_002_seconds() {
    let mut rig = rig();
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    let mut clock = FrameClock::new(0.25);
    // The first frame only establishes the reference timestamp.
    ClipDriver::advance(&mut rig.scene, clock.tick(0.0));

    let mut previous = 0.0;
    for frame in 1..=60 {
        let dt = clock.tick(f64::from(frame) * 16.7);
        ClipDriver::advance(&mut rig.scene, dt);

        let time = rig.scene.mixer(driver.mixer_key()).unwrap().time;
        assert!(time > previous, "mixer time must increase every frame");
        previous = time;
    }

    let total = rig.scene.mixer(driver.mixer_key()).unwrap().time;
    assert!((total - 1.002).abs() < 1e-3, "got {total}");
}

#[test]
fn advance_moves_bound_joints() {
    let mut rig = rig();
    let hips = rig.scene.find_node_by_name(rig.root, "mixamorigHips").unwrap();
    ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    // Idle: hips rise from 1.0 to 1.1 over 2 seconds
    ClipDriver::advance(&mut rig.scene, 1.0);
    let y = rig.scene.get_node(hips).unwrap().transform.position.y;
    assert!(approx(y, 1.05), "got {y}");
}

// ============================================================================
// look_at
// ============================================================================

#[test]
fn look_at_aims_neck_at_offset_pointer() {
    let mut rig = rig();
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    let pointer = Vec2::new(0.4, -0.3);
    assert!(driver.look_at(&mut rig.scene, pointer));

    // Neck sits at world (0, 1.5, 0); target is (x - 0.1, y + 1.1, 1.0).
    let target = Vec3::new(0.4 - 0.1, -0.3 + 1.1, 1.0);
    let expected = (target - Vec3::new(0.0, 1.5, 0.0)).normalize();
    let forward = neck_forward(&rig.scene, rig.neck);
    assert!(forward.abs_diff_eq(expected, EPSILON), "{forward} vs {expected}");
}

#[test]
fn look_at_compensates_for_parent_rotation() {
    let mut rig = rig();
    rig.scene.get_node_mut(rig.spine).unwrap().transform.rotation = Quat::from_rotation_y(1.0);
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    driver.look_at(&mut rig.scene, Vec2::ZERO);

    let neck_pos = rig.scene.world_matrix(rig.neck).unwrap().translation;
    let target = Vec3::new(-0.1, 1.1, 1.0);
    let expected = (target - Vec3::from(neck_pos)).normalize();
    let forward = neck_forward(&rig.scene, rig.neck);
    assert!(forward.abs_diff_eq(expected, EPSILON), "{forward} vs {expected}");
}

#[test]
fn look_at_target_follows_model_root_transform() {
    let mut rig = rig();
    {
        let root = rig.scene.get_node_mut(rig.root).unwrap();
        root.transform.position = Vec3::new(2.0, 0.0, -1.0);
        root.transform.rotation = Quat::from_rotation_y(std::f32::consts::PI);
    }
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    driver.look_at(&mut rig.scene, Vec2::ZERO);

    let model = rig.scene.world_matrix(rig.root).unwrap();
    let target = model.transform_point3(Vec3::new(-0.1, 1.1, 1.0));
    let neck_pos = Vec3::from(rig.scene.world_matrix(rig.neck).unwrap().translation);
    let expected = (target - neck_pos).normalize();
    let forward = neck_forward(&rig.scene, rig.neck);
    assert!(forward.abs_diff_eq(expected, EPSILON), "{forward} vs {expected}");
}

#[test]
fn look_at_is_noop_for_other_clips() {
    let mut rig = rig();
    let mut driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();
    driver.select_clip(&mut rig.scene, 1).unwrap();
    ClipDriver::advance(&mut rig.scene, 0.4);

    let before = rig.scene.get_node(rig.neck).unwrap().transform.rotation;
    assert!(!driver.look_at(&mut rig.scene, Vec2::new(0.9, 0.9)));
    let after = rig.scene.get_node(rig.neck).unwrap().transform.rotation;
    assert_eq!(before, after);
}

#[test]
fn look_at_survives_animation_of_head_controllable_clip() {
    let mut rig = rig();
    let driver = ClipDriver::initialize(
        &mut rig.scene,
        rig.root,
        four_clips(),
        &HeadTracking::default(),
    )
    .unwrap();

    driver.look_at(&mut rig.scene, Vec2::new(0.5, 0.5));
    let aimed = rig.scene.get_node(rig.neck).unwrap().transform.rotation;

    // Clip 0 has no neck track left, so playback leaves the aim alone.
    ClipDriver::advance(&mut rig.scene, 0.5);
    let after = rig.scene.get_node(rig.neck).unwrap().transform.rotation;
    assert_eq!(aimed, after);
}
