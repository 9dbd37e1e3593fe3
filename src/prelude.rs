//! Convenient re-exports for common types and traits

pub use crate::OverworldPlugin;
pub use crate::OverworldSet;
pub use crate::clock::FrameClock;
pub use crate::events::ActivateZone;
pub use crate::events::DeactivateZone;
pub use crate::events::EnterSource;
pub use crate::events::EnterZone;
pub use crate::events::InteractZone;
pub use crate::events::LeaveZone;
pub use crate::events::ZoneEntered;
pub use crate::events::ZoneExited;
pub use crate::events::ZoneInteracted;
pub use crate::input::CursorHint;
pub use crate::input::InteractKeys;
pub use crate::input::PointerState;
pub use crate::input::TrackedActor;
pub use crate::registry::ZoneIndex;
pub use crate::rig::CameraRig;
pub use crate::zone::SpawnZoneExt;
pub use crate::zone::Zone;
pub use crate::zone::ZoneConfig;
pub use crate::zone::ZoneMotion;
pub use crate::zone::ZoneVisual;
