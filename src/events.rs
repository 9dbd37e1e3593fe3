//! Zone lifecycle events: commands into zones and notifications out of them.

use bevy::prelude::*;

/// How an actor came to be inside a zone.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterSource {
    /// The tracked actor crossed the zone boundary
    Proximity,
    /// The pointer acquired the zone as its hover owner
    Pointer,
    /// A collaborator drove the transition directly
    External,
}

// ============================================================================
// Commands (host -> zone)
// ============================================================================

/// Activates a zone. If an occupant is already inside, the entry visuals
/// replay and `ZoneEntered` fires again so listeners can re-arm.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct ActivateZone {
    #[event_target]
    pub zone: Entity,
}

/// Deactivates a zone. If an occupant is inside, the exit visuals play
/// but occupancy is kept and no `ZoneExited` fires.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct DeactivateZone {
    #[event_target]
    pub zone: Entity,
}

/// Drives the entry transition directly, bypassing the built-in detectors.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct EnterZone {
    #[event_target]
    pub zone:        Entity,
    /// Whether the interaction prompt should be shown on entry
    pub show_prompt: bool,
}

/// Drives the exit transition directly, bypassing the built-in detectors.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct LeaveZone {
    #[event_target]
    pub zone: Entity,
}

/// Requests the interaction strike on a zone.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct InteractZone {
    #[event_target]
    pub zone:        Entity,
    /// Whether the interaction prompt should be re-shown after the strike
    pub show_prompt: bool,
}

// ============================================================================
// Notifications (zone -> listeners)
// ============================================================================

/// Fired when an active zone gains an occupant (or replays entry on
/// reactivation).
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct ZoneEntered {
    #[event_target]
    pub zone: Entity,
    pub via:  EnterSource,
}

/// Fired when a zone loses its occupant.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct ZoneExited {
    #[event_target]
    pub zone: Entity,
}

/// Fired when an active zone is interacted with (click, tap or key).
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct ZoneInteracted {
    #[event_target]
    pub zone: Entity,
}
