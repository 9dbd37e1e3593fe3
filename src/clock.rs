//! Frame clock with clamped deltas for animation and smoothing systems

use bevy::prelude::*;

/// Upper bound applied to per-frame deltas, in seconds.
///
/// Tab switches and debugger pauses can produce multi-second deltas;
/// clamping keeps tweens and smoothing from jumping to their end state.
pub const MAX_FRAME_DELTA: f32 = 0.06;

/// Per-frame timing shared by every animation and smoothing system.
///
/// Reads from [`Time`] once per frame so all consumers see the same
/// clamped delta regardless of where they run in the schedule.
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct FrameClock {
    /// Clamped delta for the current frame, in seconds
    pub delta: f32,
    /// Sum of clamped deltas since startup, in seconds
    pub elapsed: f32,
    /// Number of frames advanced since startup
    pub frame: u64,
    /// Maximum delta a single frame may report
    pub max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            frame: 0,
            max_delta: MAX_FRAME_DELTA,
        }
    }
}

/// System that advances the frame clock from [`Time`]
pub fn advance_frame_clock(time: Res<Time>, mut clock: ResMut<FrameClock>) {
    clock.delta = time.delta_secs().min(clock.max_delta);
    clock.elapsed += clock.delta;
    clock.frame += 1;
}
