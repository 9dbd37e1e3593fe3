// bevy_overworld
// Overworld interaction library for bevy providing:
// - Walkable trigger zones with animated fence, prompt and flash presentation
// - Pointer hover arbitration across overlapping zones
// - A follow camera rig with smoothed zoom, pan and orientation presets

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

mod clock;
mod events;
mod input;
pub mod prelude;
mod registry;
mod rig;
mod tween;
mod zone;

// Public API - Command events
pub use events::ActivateZone;
pub use events::DeactivateZone;
pub use events::EnterZone;
pub use events::InteractZone;
pub use events::LeaveZone;

// Public API - Notification events
pub use events::EnterSource;
pub use events::ZoneEntered;
pub use events::ZoneExited;
pub use events::ZoneInteracted;

// Public API - Components (for querying)
pub use rig::CameraRig;
pub use zone::Zone;
pub use zone::ZoneVisual;

// Public API - Spawning
pub use zone::SpawnZoneExt;
pub use zone::ZoneConfig;

// Public API - Animation types (used by prelude and external code)
pub use tween::Tween;
pub use tween::TweenQueue;

// Public API - Configuration resources
pub use input::InteractKeys;
pub use zone::ZoneMotion;

// Public API - State resources (for reading)
pub use clock::FrameClock;
pub use input::CursorHint;
pub use input::PointerState;
pub use input::TrackedActor;
pub use input::ViewportInfo;
pub use registry::ZoneIndex;

// Public API - Rig types
pub use rig::RigPan;
pub use rig::RigZoom;

// Public API - Picking types
pub use input::PointerRay;
pub use zone::ZoneBounds;

// Internal - used by plugin, not for external use
use clock::advance_frame_clock;
use input::{PinchState, reset_pointer_transients, sync_pointer_state, sync_viewport};
use registry::{
    apply_interact_inputs, arbitrate_pointer, drive_zone_proximity, index_added_zone,
    unindex_removed_zone,
};
use rig::{apply_touch_pinch, apply_wheel_zoom, compose_camera_pose, follow_actor, update_pan_drag};
use zone::{
    animate_zone_visuals, on_activate_zone, on_deactivate_zone, on_enter_zone, on_interact_zone,
    on_leave_zone,
};

/// Frame phases, chained in declaration order inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverworldSet {
    /// Clamp and publish the frame delta
    Tick,
    /// Mirror windows, pointers and actor motion into resources
    Input,
    /// Resolve zone ownership and occupancy, fire zone events
    Arbitrate,
    /// Advance zone presentation tweens
    Animate,
    /// Write the camera transform
    Compose,
}

/// Plugin that adds all overworld interaction functionality
pub struct OverworldPlugin;

impl Plugin for OverworldPlugin {
    fn build(&self, app: &mut App) {
        app
            // Input-device state, present already when the host runs the
            // default plugins (init is a no-op then)
            .init_resource::<Time>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .add_message::<MouseWheel>()
            // Library state
            .init_resource::<FrameClock>()
            .init_resource::<PointerState>()
            .init_resource::<PinchState>()
            .init_resource::<ViewportInfo>()
            .init_resource::<TrackedActor>()
            .init_resource::<CursorHint>()
            .init_resource::<InteractKeys>()
            .init_resource::<ZoneMotion>()
            .init_resource::<ZoneIndex>()
            // Register observers for component lifecycle events
            .add_observer(index_added_zone)
            .add_observer(unindex_removed_zone)
            // Register observers for custom events
            .add_observer(on_activate_zone)
            .add_observer(on_deactivate_zone)
            .add_observer(on_enter_zone)
            .add_observer(on_leave_zone)
            .add_observer(on_interact_zone)
            // Order the frame phases
            .configure_sets(
                Update,
                (
                    OverworldSet::Tick,
                    OverworldSet::Input,
                    OverworldSet::Arbitrate,
                    OverworldSet::Animate,
                    OverworldSet::Compose,
                )
                    .chain(),
            )
            // Add systems
            .add_systems(Update, advance_frame_clock.in_set(OverworldSet::Tick))
            .add_systems(
                Update,
                (
                    sync_viewport,
                    sync_pointer_state,
                    apply_wheel_zoom,
                    apply_touch_pinch,
                    follow_actor,
                    update_pan_drag,
                )
                    .chain()
                    .in_set(OverworldSet::Input),
            )
            .add_systems(
                Update,
                (arbitrate_pointer, drive_zone_proximity, apply_interact_inputs)
                    .chain()
                    .in_set(OverworldSet::Arbitrate),
            )
            .add_systems(
                Update,
                animate_zone_visuals.in_set(OverworldSet::Animate),
            )
            .add_systems(
                Update,
                (compose_camera_pose, reset_pointer_transients)
                    .chain()
                    .in_set(OverworldSet::Compose),
            );
    }
}
