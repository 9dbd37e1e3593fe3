//! Smoothed follow-camera rig: target tracking, zoom, pan and named
//! orientation presets composed into one pose per frame.

use std::collections::HashMap;

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::math::curve::Curve;
use bevy::math::curve::easing::EaseFunction;
use bevy::prelude::*;

use crate::clock::FrameClock;
use crate::input::{PinchState, PointerRay, PointerState, TrackedActor, ViewportInfo};

/// Duration of an orientation preset transition, in seconds
const ORIENTATION_TRANSITION_SECS: f32 = 2.0;

/// Pinch spans below this many pixels are treated as degenerate
const MIN_PINCH_DISTANCE: f32 = 1.0;

/// Frame-rate-independent exponential approach toward a target.
/// Monotone: never passes the target, regardless of delta.
fn smooth_toward(value: f32, target: f32, rate: f32, delta: f32) -> f32 {
    (value - target).mul_add((-rate * delta).exp(), target)
}

// ============================================================================
// Rig state
// ============================================================================

/// In-flight orientation change between preset directions. The start is
/// captured from the current animated value, so retargeting mid-flight
/// resamples instead of snapping back to a preset.
#[derive(Reflect, Debug, Clone)]
struct OrientationTransition {
    start:    Vec3,
    end:      Vec3,
    elapsed:  f32,
    duration: f32,
    easing:   EaseFunction,
}

impl OrientationTransition {
    fn sample(&self) -> Vec3 {
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        let eased = self.easing.sample_unchecked(t);
        self.start.lerp(self.end, eased)
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Normalized zoom mapped onto a camera distance band.
#[derive(Reflect, Debug, Clone)]
pub struct RigZoom {
    /// Zoom target in [0, 1]
    pub target_value: f32,
    value: f32,
    /// Camera distance at zoom 0
    pub min_distance: f32,
    /// Extra distance spanned as zoom goes 0 to 1
    pub amplitude: f32,
    /// Target change per scroll line
    pub wheel_sensitivity: f32,
    pub pinch_sensitivity: f32,
    /// Exponential approach rate, per second
    pub smoothing: f32,
}

impl Default for RigZoom {
    fn default() -> Self {
        Self {
            target_value: 0.5,
            value: 0.5,
            min_distance: 6.0,
            amplitude: 22.0,
            wheel_sensitivity: 0.05,
            pinch_sensitivity: 0.4,
            smoothing: 6.0,
        }
    }
}

impl RigZoom {
    /// Smoothed zoom value actually used for the pose
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Resolved camera distance for the smoothed value
    pub fn distance(&self) -> f32 {
        self.amplitude.mul_add(self.value, self.min_distance)
    }

    /// Folds scroll lines into the target; positive lines zoom in.
    pub fn add_wheel(&mut self, lines: f32) {
        self.target_value = lines
            .mul_add(-self.wheel_sensitivity, self.target_value)
            .clamp(0.0, 1.0);
    }

    /// Retargets from a pinch gesture: the ratio of the current two-finger
    /// span to the span captured at gesture start. A degenerate start span
    /// leaves the target untouched.
    pub fn apply_pinch(&mut self, start_value: f32, start_distance: f32, current_distance: f32) {
        if start_distance < MIN_PINCH_DISTANCE {
            return;
        }
        let ratio = current_distance / start_distance;
        self.target_value = (ratio - 1.0)
            .mul_add(-self.pinch_sensitivity, start_value)
            .clamp(0.0, 1.0);
    }
}

/// Ground-plane pan offset driven by single-pointer drags.
#[derive(Reflect, Debug, Clone)]
pub struct RigPan {
    /// Offset target on the ground plane (x, z)
    pub target_value: Vec2,
    value: Vec2,
    enabled: bool,
    /// Exponential approach rate, per second
    pub smoothing: f32,
    dragging: bool,
    anchor:   Vec2,
}

impl Default for RigPan {
    fn default() -> Self {
        Self {
            target_value: Vec2::ZERO,
            value: Vec2::ZERO,
            enabled: true,
            smoothing: 8.0,
            dragging: false,
            anchor: Vec2::ZERO,
        }
    }
}

impl RigPan {
    pub const fn value(&self) -> Vec2 {
        self.value
    }

    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub const fn dragging(&self) -> bool {
        self.dragging
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.dragging = false;
    }

    /// Eases the offset back to zero (the smoothed value follows)
    pub fn reset(&mut self) {
        self.target_value = Vec2::ZERO;
    }
}

/// Follow-camera rig. Attach next to the camera's `Transform`; the compose
/// system owns that transform while `bypass` is off.
///
/// Pose invariant: `translation = target_smoothed + orientation.normalize()
/// * zoom.distance() + (pan.x, 0, pan.y)`, looking at `target_smoothed`
/// with `Vec3::Y` up.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CameraRig {
    /// Raw follow target, written by the follow system or the host
    pub target: Vec3,
    target_smoothed: Vec3,
    /// Exponential approach rate for the target, per second
    pub target_smoothing: f32,
    /// Ground height the follow target sits at
    pub follow_height: f32,
    /// Whether `TrackedActor` drives `target`
    pub follow: bool,
    /// Manual-override mode: while set the compose system leaves the
    /// camera transform alone
    pub bypass: bool,
    /// Vertical field of view used for pointer rays, in radians; keep in
    /// agreement with the host's projection
    pub fov_y: f32,
    pub zoom: RigZoom,
    pub pan:  RigPan,
    presets: HashMap<String, Vec3>,
    orientation: Vec3,
    transition:  Option<OrientationTransition>,
}

impl Default for CameraRig {
    fn default() -> Self {
        let default_orientation = Vec3::new(1.1, 1.45, 1.1);
        let mut presets = HashMap::new();
        presets.insert("default".to_string(), default_orientation);
        presets.insert("overhead".to_string(), Vec3::new(0.25, 1.8, 0.25));
        Self {
            target: Vec3::ZERO,
            target_smoothed: Vec3::ZERO,
            target_smoothing: 5.0,
            follow_height: 0.0,
            follow: true,
            bypass: false,
            fov_y: std::f32::consts::FRAC_PI_4,
            zoom: RigZoom::default(),
            pan: RigPan::default(),
            presets,
            orientation: default_orientation,
            transition: None,
        }
    }
}

impl CameraRig {
    /// Current animated orientation direction (not normalized)
    pub const fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub const fn target_smoothed(&self) -> Vec3 {
        self.target_smoothed
    }

    pub fn preset(&self, name: &str) -> Option<Vec3> {
        self.presets.get(name).copied()
    }

    pub fn insert_preset(&mut self, name: impl Into<String>, direction: Vec3) {
        self.presets.insert(name.into(), direction);
    }

    /// Starts an eased transition to a named preset, sampling from the
    /// current animated direction so mid-flight retargets never snap.
    /// Unknown names are ignored; returns whether a transition started.
    pub fn set_orientation(&mut self, name: &str) -> bool {
        let Some(&end) = self.presets.get(name) else {
            debug!("unknown camera orientation preset {name:?}");
            return false;
        };
        info!("camera orientation preset {name:?}");
        self.transition = Some(OrientationTransition {
            start: self.orientation,
            end,
            elapsed: 0.0,
            duration: ORIENTATION_TRANSITION_SECS,
            easing: EaseFunction::CubicInOut,
        });
        true
    }

    /// Advances the orientation transition and every smoothed value
    fn advance(&mut self, delta: f32) {
        if let Some(transition) = self.transition.as_mut() {
            transition.elapsed += delta;
            self.orientation = transition.sample();
            if transition.finished() {
                self.transition = None;
            }
        }

        let target_decay = (-self.target_smoothing * delta).exp();
        self.target_smoothed = self.target + (self.target_smoothed - self.target) * target_decay;

        self.zoom.value = smooth_toward(
            self.zoom.value,
            self.zoom.target_value,
            self.zoom.smoothing,
            delta,
        );

        let pan_decay = (-self.pan.smoothing * delta).exp();
        self.pan.value =
            self.pan.target_value + (self.pan.value - self.pan.target_value) * pan_decay;
    }
}

// ============================================================================
// Systems
// ============================================================================

/// System that copies the tracked actor into each following rig's target
pub fn follow_actor(actor: Res<TrackedActor>, mut rigs: Query<&mut CameraRig>) {
    for mut rig in &mut rigs {
        if rig.follow {
            rig.target = Vec3::new(actor.position.x, rig.follow_height, actor.position.y);
        }
    }
}

/// System that folds mouse wheel scroll into the zoom target
pub fn apply_wheel_zoom(mut wheel: MessageReader<MouseWheel>, mut rigs: Query<&mut CameraRig>) {
    let mut lines = 0.0;
    for scroll in wheel.read() {
        lines += match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / 100.0,
        };
    }
    if lines == 0.0 {
        return;
    }
    for mut rig in &mut rigs {
        rig.zoom.add_wheel(lines);
    }
}

/// System that tracks the two-finger span and retargets zoom from its
/// ratio to the span captured at gesture start
pub fn apply_touch_pinch(
    touches: Res<Touches>,
    mut pinch: ResMut<PinchState>,
    mut rigs: Query<&mut CameraRig>,
) {
    let positions: Vec<Vec2> = touches.iter().map(|touch| touch.position()).collect();
    if positions.len() < 2 {
        pinch.active = false;
        return;
    }
    let Ok(mut rig) = rigs.single_mut() else {
        return;
    };

    let span = positions[0].distance(positions[1]);
    if pinch.active {
        rig.zoom
            .apply_pinch(pinch.start_value, pinch.start_distance, span);
    } else {
        pinch.active = true;
        pinch.start_distance = span;
        pinch.start_value = rig.zoom.target_value;
    }
}

/// System that runs the single-pointer pan drag against the ground plane
pub fn update_pan_drag(
    pointer: Res<PointerState>,
    viewport: Res<ViewportInfo>,
    mut rigs: Query<(&Transform, &mut CameraRig)>,
) {
    let Ok((camera, mut rig)) = rigs.single_mut() else {
        return;
    };
    if !rig.pan.enabled || !pointer.pressed {
        rig.pan.dragging = false;
        return;
    }

    let (Some(ndc), Some(aspect)) = (pointer.ndc, viewport.aspect()) else {
        return;
    };
    let ray = PointerRay::from_pose(camera, rig.fov_y, aspect, ndc);
    let Some(hit) = ray.intersect_height(rig.target_smoothed.y) else {
        return;
    };
    let hit = Vec2::new(hit.x, hit.z);

    if rig.pan.dragging {
        rig.pan.target_value = rig.pan.anchor - hit;
    } else {
        rig.pan.dragging = true;
        // The anchor absorbs the current offset so the grab point stays put.
        rig.pan.anchor = hit + rig.pan.target_value;
    }
}

/// System that advances the rig and writes the camera pose.
///
/// All smoothing and the transform write happen in one system so the pose
/// never mixes this-frame and last-frame values. Skipped entirely while
/// `bypass` is set; smoothed values freeze and resume on return.
pub fn compose_camera_pose(
    clock: Res<FrameClock>,
    mut rigs: Query<(&mut Transform, &mut CameraRig)>,
) {
    let delta = clock.delta;
    for (mut transform, mut rig) in &mut rigs {
        if rig.bypass {
            continue;
        }
        rig.advance(delta);

        let Some(direction) = rig.orientation.try_normalize() else {
            warn!("camera rig orientation is degenerate, pose skipped");
            continue;
        };

        let mut position = rig.target_smoothed + direction * rig.zoom.distance();
        position.x += rig.pan.value.x;
        position.z += rig.pan.value.y;

        *transform =
            Transform::from_translation(position).looking_at(rig.target_smoothed, Vec3::Y);
    }
}
