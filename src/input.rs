//! Pointer, viewport and actor state feeding arbitration and the camera rig.
//!
//! Device handlers only record state here; consumers read it on the next
//! schedule pass. Headless hosts (and tests) can skip the window adapters
//! entirely and write these resources directly.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

// ============================================================================
// Shared input state
// ============================================================================

/// Unified mouse/touch pointer. Mouse motion and the first active touch
/// collapse into one pointer so hover and drag logic never special-cases
/// the device.
#[derive(Resource, Reflect, Debug, Clone, Default)]
#[reflect(Resource)]
pub struct PointerState {
    /// Last known pointer position in window pixels, top-left origin
    pub position: Option<Vec2>,
    /// Normalized device coordinates, x and y in [-1, 1] with y up
    pub ndc: Option<Vec2>,
    /// Dirty flag: set on movement (and on zone churn), consumed by the
    /// pointer arbiter
    pub moved: bool,
    /// Left button held, or exactly one touch down
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
    /// Last sample came from a touch rather than the mouse
    pub touch: bool,
}

/// Current render surface size in logical pixels.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Resource)]
pub struct ViewportInfo {
    pub size: Vec2,
}

impl ViewportInfo {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    /// Converts a window-pixel position to normalized device coordinates.
    /// Returns `None` while the viewport has no area.
    pub fn ndc(&self, position: Vec2) -> Option<Vec2> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (position.x / self.size.x).mul_add(2.0, -1.0),
            (position.y / self.size.y).mul_add(-2.0, 1.0),
        ))
    }

    pub fn aspect(&self) -> Option<f32> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return None;
        }
        Some(self.size.x / self.size.y)
    }
}

/// Ground-plane position and speed of the followed actor, written by the
/// host each frame (typically from its vehicle or character controller).
#[derive(Resource, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Resource)]
pub struct TrackedActor {
    /// Position on the ground plane (x, z)
    pub position: Vec2,
    /// Planar speed in units per second, available to zone listeners
    pub speed: f32,
}

/// Cursor affordance requested by the zone layer. Hosts map this onto
/// their window cursor however they render it.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Resource)]
pub enum CursorHint {
    #[default]
    Neutral,
    Interactive,
}

/// Keyboard keys that trigger interaction with an occupied zone.
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct InteractKeys {
    pub keys: Vec<KeyCode>,
}

impl Default for InteractKeys {
    fn default() -> Self {
        Self {
            keys: vec![KeyCode::KeyE, KeyCode::KeyF, KeyCode::Enter],
        }
    }
}

/// Two-finger pinch tracking for touch zoom. Captures the starting span
/// and zoom target when the second touch lands.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Resource)]
pub struct PinchState {
    pub active: bool,
    pub start_distance: f32,
    pub start_value: f32,
}

// ============================================================================
// Pointer rays
// ============================================================================

/// Minimum ray travel before a hit counts, rejecting surfaces at or
/// behind the camera.
const RAY_MIN_TRAVEL: f32 = 0.001;

/// World-space ray from the camera through a pointer position.
#[derive(Debug, Clone, Copy)]
pub struct PointerRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PointerRay {
    /// Builds the ray from a camera pose and perspective parameters.
    ///
    /// At a given depth the visible half-extent is `depth * tan(fov / 2)`,
    /// so scaling the camera basis vectors by the NDC offset and the half
    /// tangents recovers the world direction for that pixel.
    pub fn from_pose(camera: &Transform, fov_y: f32, aspect: f32, ndc: Vec2) -> Self {
        let half_tan_vfov = (fov_y * 0.5).tan();
        let half_tan_hfov = half_tan_vfov * aspect;

        let forward = camera.rotation * Vec3::NEG_Z;
        let right = camera.rotation * Vec3::X;
        let up = camera.rotation * Vec3::Y;

        let direction =
            (forward + right * (ndc.x * half_tan_hfov) + up * (ndc.y * half_tan_vfov)).normalize();

        Self {
            origin: camera.translation,
            direction,
        }
    }

    /// Intersects the ray with the horizontal plane `y = height`.
    /// Returns `None` when the ray runs parallel to the plane or the
    /// plane lies behind the camera.
    pub fn intersect_height(&self, height: f32) -> Option<Vec3> {
        if self.direction.y.abs() < f32::EPSILON {
            return None;
        }
        let travel = (height - self.origin.y) / self.direction.y;
        if travel <= RAY_MIN_TRAVEL {
            return None;
        }
        Some(self.origin + self.direction * travel)
    }
}

// ============================================================================
// Window and touch adapters
// ============================================================================

/// System that mirrors the primary window size into [`ViewportInfo`]
pub fn sync_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportInfo>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    // Write only on change so downstream change detection stays meaningful.
    if viewport.size != size {
        viewport.size = size;
    }
}

/// System that folds mouse and touch input into the unified pointer
pub fn sync_pointer_state(
    windows: Query<&Window, With<PrimaryWindow>>,
    touches: Res<Touches>,
    buttons: Res<ButtonInput<MouseButton>>,
    viewport: Res<ViewportInfo>,
    mut pointer: ResMut<PointerState>,
    mut pinching: Local<bool>,
) {
    let window = windows.single().ok();
    let touch_points: Vec<Vec2> = touches.iter().map(|touch| touch.position()).collect();

    // A second touch converts the gesture to pinch zoom. The latch holds
    // until every touch lifts: no press edges and no position sampling
    // while a pinch is winding down on one finger.
    if touch_points.len() >= 2 {
        *pinching = true;
    } else if touch_points.is_empty() {
        *pinching = false;
    }

    if window.is_none() && touch_points.is_empty() {
        // Nothing feeds the pointer here; leave externally written state alone.
        return;
    }

    if *pinching {
        pointer.just_pressed = false;
        pointer.just_released = pointer.pressed;
        pointer.pressed = false;
        return;
    }

    let sample = if let Some(&first) = touch_points.first() {
        Some((first, true))
    } else {
        window
            .and_then(Window::cursor_position)
            .map(|position| (position, false))
    };

    // When the cursor leaves the window the last known position is kept.
    if let Some((position, from_touch)) = sample {
        if pointer.position != Some(position) {
            pointer.position = Some(position);
            pointer.moved = true;
        }
        pointer.touch = from_touch;
        pointer.ndc = viewport.ndc(position);
    }

    // Exactly one touch counts as a press alongside the mouse button.
    let pressed = touch_points.len() == 1 || buttons.pressed(MouseButton::Left);
    pointer.just_pressed = pressed && !pointer.pressed;
    pointer.just_released = !pressed && pointer.pressed;
    pointer.pressed = pressed;
}

/// System that clears edge-triggered pointer flags at the end of the
/// frame, after every consumer has run
pub fn reset_pointer_transients(mut pointer: ResMut<PointerState>) {
    pointer.just_pressed = false;
    pointer.just_released = false;
}
