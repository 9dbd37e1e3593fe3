//! Interactive ground zones: footprint, occupancy state machine and
//! tween-driven presentation values.
//!
//! A zone is a pair of components: [`Zone`] carries the immutable footprint
//! and the activation/occupancy state, [`ZoneVisual`] carries the animated
//! values a renderer consumes (fence height, strike dip, prompt and
//! translucency alphas). All transitions funnel through this module so the
//! arbiter, the proximity driver and the event observers share one set of
//! rules.

use bevy::math::curve::easing::EaseFunction;
use bevy::prelude::*;

use crate::clock::FrameClock;
use crate::events::{
    ActivateZone, DeactivateZone, EnterSource, EnterZone, InteractZone, LeaveZone, ZoneEntered,
    ZoneExited, ZoneInteracted,
};
use crate::input::{CursorHint, PointerRay, PointerState};
use crate::tween::{self, Tween, TweenQueue};

/// Resting fill translucency after an interact flash decays
pub const FILL_REST_ALPHA: f32 = 0.2;
/// Resting border translucency after an interact flash decays
pub const BORDER_REST_ALPHA: f32 = 0.5;

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned zone footprint on the ground (XZ) plane.
///
/// `Vec2` values are (x, z). Containment is strict on both axes, so a point
/// exactly on the boundary is outside.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ZoneBounds {
    pub center:       Vec2,
    pub half_extents: Vec2,
    /// Y height of the invisible pointer pick plane
    pub pick_height:  f32,
}

impl ZoneBounds {
    pub const fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
            pick_height: 0.0,
        }
    }

    pub const fn with_pick_height(mut self, pick_height: f32) -> Self {
        self.pick_height = pick_height;
        self
    }

    /// Strict containment test for a ground-plane point
    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() < self.half_extents.x.abs()
            && (point.y - self.center.y).abs() < self.half_extents.y.abs()
    }

    /// Intersects a pointer ray with the pick plane and returns the ray
    /// travel to the hit when it lands inside the footprint.
    pub fn raycast(&self, ray: &PointerRay) -> Option<f32> {
        let hit = ray.intersect_height(self.pick_height)?;
        self.contains(Vec2::new(hit.x, hit.z))
            .then(|| hit.distance(ray.origin))
    }

    /// Evenly spaced perimeter anchors for decorative fence posts.
    ///
    /// Alternating anchors are nudged to opposite sides of the boundary
    /// line by `offset`, giving the fence a hand-placed look.
    pub fn post_anchors(&self, spacing: f32, offset: f32) -> Vec<Vec3> {
        let half = self.half_extents.abs();
        let width = 2.0 * half.x;
        let depth = 2.0 * half.y;
        let perimeter = 2.0 * (width + depth);
        if spacing <= 0.0 || perimeter <= 0.0 {
            return Vec::new();
        }

        let count = (perimeter / spacing).floor() as usize;
        let mut anchors = Vec::with_capacity(count);
        for index in 0..count {
            let along = index as f32 * spacing;
            let (local, normal) = perimeter_point(half, width, depth, along);
            let side = if index % 2 == 0 { offset } else { -offset };
            let point = local + normal * side;
            anchors.push(Vec3::new(
                self.center.x + point.x,
                0.0,
                self.center.y + point.y,
            ));
        }
        anchors
    }
}

/// Walks the rectangle perimeter (south, east, north, west sides in order)
/// and returns the local point plus its outward normal.
fn perimeter_point(half: Vec2, width: f32, depth: f32, along: f32) -> (Vec2, Vec2) {
    if along < width {
        (Vec2::new(-half.x + along, -half.y), Vec2::new(0.0, -1.0))
    } else if along < width + depth {
        (
            Vec2::new(half.x, -half.y + (along - width)),
            Vec2::new(1.0, 0.0),
        )
    } else if along < width + depth + width {
        (
            Vec2::new(half.x - (along - width - depth), half.y),
            Vec2::new(0.0, 1.0),
        )
    } else {
        (
            Vec2::new(-half.x, half.y - (along - width - depth - width)),
            Vec2::new(-1.0, 0.0),
        )
    }
}

// ============================================================================
// Components
// ============================================================================

/// Zone activation and occupancy state. Mutated only through the transition
/// functions in this module (observers, arbiter, proximity driver).
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Zone {
    pub bounds: ZoneBounds,
    /// Gates visuals and events; containment is tracked regardless
    pub active: bool,
    /// Whether an occupant (actor or pointer) is currently inside
    pub inside: bool,
    /// Whether the zone offers a discrete interaction affordance
    pub prompt: bool,
    /// Live flag for the actor-containment test
    pub proximity_enabled: bool,
    /// Configured value, restored when pointer ownership ends
    pub proximity_default: bool,
}

/// Animated presentation values for a zone, consumed by whatever renders
/// it. Each value has one tween slot; assigning a new tween replaces the
/// old one, which is the only cancellation rule.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ZoneVisual {
    /// Boundary fence height, 0 lowered to 1 raised (easing may overshoot)
    pub fence_height: f32,
    /// Strike displacement subtracted from the fence during an interact
    pub fence_dip: f32,
    /// Interaction prompt opacity
    pub prompt_alpha: f32,
    pub fill_alpha: f32,
    pub border_alpha: f32,
    fence_tween:  Option<Tween>,
    dip_strike:   Option<TweenQueue>,
    prompt_tween: Option<Tween>,
    fill_tween:   Option<Tween>,
    border_tween: Option<Tween>,
}

impl Default for ZoneVisual {
    fn default() -> Self {
        Self {
            fence_height: 0.0,
            fence_dip: 0.0,
            prompt_alpha: 0.0,
            fill_alpha: FILL_REST_ALPHA,
            border_alpha: BORDER_REST_ALPHA,
            fence_tween: None,
            dip_strike: None,
            prompt_tween: None,
            fill_tween: None,
            border_tween: None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Durations and easings for zone transitions.
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct ZoneMotion {
    pub raise_duration: f32,
    pub raise_ease: EaseFunction,
    pub lower_duration: f32,
    pub lower_ease: EaseFunction,
    pub prompt_duration: f32,
    pub prompt_ease: EaseFunction,
    /// Peak strike displacement
    pub strike_dip: f32,
    pub strike_dip_duration: f32,
    pub strike_dip_ease: EaseFunction,
    pub strike_recover_duration: f32,
    pub strike_recover_ease: EaseFunction,
    pub flash_decay_duration: f32,
    pub flash_decay_ease: EaseFunction,
    pub fill_rest: f32,
    pub border_rest: f32,
}

impl Default for ZoneMotion {
    fn default() -> Self {
        Self {
            raise_duration: 0.6,
            raise_ease: EaseFunction::BackOut,
            lower_duration: 0.35,
            lower_ease: EaseFunction::BackIn,
            prompt_duration: 0.25,
            prompt_ease: EaseFunction::QuadraticOut,
            strike_dip: 0.35,
            strike_dip_duration: 0.08,
            strike_dip_ease: EaseFunction::QuarticOut,
            strike_recover_duration: 0.5,
            strike_recover_ease: EaseFunction::ElasticOut,
            flash_decay_duration: 0.6,
            flash_decay_ease: EaseFunction::QuadraticOut,
            fill_rest: FILL_REST_ALPHA,
            border_rest: BORDER_REST_ALPHA,
        }
    }
}

/// Spawn-time description of a zone.
#[derive(Debug, Clone)]
pub struct ZoneConfig {
    pub center:       Vec2,
    pub half_extents: Vec2,
    pub pick_height:  f32,
    pub active:       bool,
    pub prompt:       bool,
    /// Whether the actor-containment test starts enabled
    pub proximity:    bool,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extents: Vec2::splat(2.0),
            pick_height: 0.0,
            active: true,
            prompt: true,
            proximity: true,
        }
    }
}

/// Extension trait for spawning a fully formed zone entity.
pub trait SpawnZoneExt {
    fn spawn_zone(&mut self, config: ZoneConfig) -> Entity;
}

impl SpawnZoneExt for Commands<'_, '_> {
    fn spawn_zone(&mut self, config: ZoneConfig) -> Entity {
        if config.half_extents.x <= 0.0 || config.half_extents.y <= 0.0 {
            warn!(
                "zone spawned with non-positive extents {:?}",
                config.half_extents
            );
        }
        let zone = Zone {
            bounds: ZoneBounds::new(config.center, config.half_extents)
                .with_pick_height(config.pick_height),
            active: config.active,
            inside: false,
            prompt: config.prompt,
            proximity_enabled: config.proximity,
            proximity_default: config.proximity,
        };
        self.spawn((zone, ZoneVisual::default())).id()
    }
}

// ============================================================================
// Transitions
// ============================================================================

fn raise_visuals(
    visual: &mut ZoneVisual,
    motion: &ZoneMotion,
    hint: &mut CursorHint,
    touch: bool,
    show_prompt: bool,
) {
    visual.fence_tween = Some(Tween::new(
        visual.fence_height,
        1.0,
        motion.raise_duration,
        motion.raise_ease,
    ));
    if show_prompt {
        visual.prompt_tween = Some(Tween::new(
            visual.prompt_alpha,
            1.0,
            motion.prompt_duration,
            motion.prompt_ease,
        ));
    }
    // Touch pointers have no hover cursor to hint.
    if !touch {
        *hint = CursorHint::Interactive;
    }
}

fn lower_visuals(visual: &mut ZoneVisual, motion: &ZoneMotion, hint: &mut CursorHint) {
    visual.fence_tween = Some(Tween::new(
        visual.fence_height,
        0.0,
        motion.lower_duration,
        motion.lower_ease,
    ));
    visual.prompt_tween = Some(Tween::new(
        visual.prompt_alpha,
        0.0,
        motion.prompt_duration,
        motion.prompt_ease,
    ));
    *hint = CursorHint::Neutral;
}

/// Entry transition. Occupancy is recorded unconditionally; visuals and the
/// `ZoneEntered` notification (signalled by the `true` return) only happen
/// while the zone is active.
pub(crate) fn apply_enter(
    zone: &mut Zone,
    visual: &mut ZoneVisual,
    motion: &ZoneMotion,
    hint: &mut CursorHint,
    touch: bool,
    show_prompt: bool,
) -> bool {
    zone.inside = true;
    if !zone.active {
        return false;
    }
    let prompt = show_prompt && zone.prompt;
    raise_visuals(visual, motion, hint, touch, prompt);
    true
}

/// Exit transition. Always runs the exit visuals so an inactive-but-entered
/// zone still cleans up; `ZoneExited` always follows.
pub(crate) fn apply_leave(
    zone: &mut Zone,
    visual: &mut ZoneVisual,
    motion: &ZoneMotion,
    hint: &mut CursorHint,
) {
    zone.inside = false;
    lower_visuals(visual, motion, hint);
}

/// Activation. Replays the entry sequence when an occupant is already
/// inside so listeners can re-arm; the `true` return signals the replay.
pub(crate) fn apply_activate(
    zone: &mut Zone,
    visual: &mut ZoneVisual,
    motion: &ZoneMotion,
    hint: &mut CursorHint,
    touch: bool,
) -> bool {
    zone.active = true;
    if !zone.inside {
        return false;
    }
    raise_visuals(visual, motion, hint, touch, zone.prompt);
    true
}

/// Deactivation. Occupancy survives; only the presentation winds down, and
/// no `ZoneExited` fires.
pub(crate) fn apply_deactivate(
    zone: &mut Zone,
    visual: &mut ZoneVisual,
    motion: &ZoneMotion,
    hint: &mut CursorHint,
) {
    zone.active = false;
    if zone.inside {
        lower_visuals(visual, motion, hint);
    }
}

/// Interaction strike. Replaces in-flight fence/prompt tweens, plays the
/// two-phase dip on `fence_dip` and flashes the translucency values; the
/// `true` return signals that `ZoneInteracted` should fire.
pub(crate) fn apply_interact(
    zone: &Zone,
    visual: &mut ZoneVisual,
    motion: &ZoneMotion,
    show_prompt: bool,
) -> bool {
    if !zone.active {
        return false;
    }

    // The strike owns the fence: finish any rise quickly, dip, recover.
    visual.fence_tween = Some(Tween::new(
        visual.fence_height,
        1.0,
        motion.strike_dip_duration,
        EaseFunction::QuadraticOut,
    ));
    visual.dip_strike = Some(TweenQueue::new([
        Tween::new(
            visual.fence_dip,
            motion.strike_dip,
            motion.strike_dip_duration,
            motion.strike_dip_ease,
        ),
        Tween::new(
            motion.strike_dip,
            0.0,
            motion.strike_recover_duration,
            motion.strike_recover_ease,
        ),
    ]));

    visual.fill_alpha = 1.0;
    visual.border_alpha = 1.0;
    visual.fill_tween = Some(Tween::new(
        1.0,
        motion.fill_rest,
        motion.flash_decay_duration,
        motion.flash_decay_ease,
    ));
    visual.border_tween = Some(Tween::new(
        1.0,
        motion.border_rest,
        motion.flash_decay_duration,
        motion.flash_decay_ease,
    ));

    let target = if show_prompt && zone.prompt { 1.0 } else { 0.0 };
    visual.prompt_tween = Some(Tween::new(
        visual.prompt_alpha,
        target,
        motion.prompt_duration,
        motion.prompt_ease,
    ));

    true
}

// ============================================================================
// Observers
// ============================================================================

pub fn on_activate_zone(
    activate: On<ActivateZone>,
    mut zones: Query<(&mut Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    pointer: Res<PointerState>,
    mut hint: ResMut<CursorHint>,
    mut commands: Commands,
) {
    let Ok((mut zone, mut visual)) = zones.get_mut(activate.zone) else {
        return;
    };
    debug!("zone {:?} activated", activate.zone);
    if apply_activate(&mut zone, &mut visual, &motion, &mut hint, pointer.touch) {
        commands.trigger(ZoneEntered {
            zone: activate.zone,
            via:  EnterSource::External,
        });
    }
}

pub fn on_deactivate_zone(
    deactivate: On<DeactivateZone>,
    mut zones: Query<(&mut Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    mut hint: ResMut<CursorHint>,
) {
    let Ok((mut zone, mut visual)) = zones.get_mut(deactivate.zone) else {
        return;
    };
    debug!("zone {:?} deactivated", deactivate.zone);
    apply_deactivate(&mut zone, &mut visual, &motion, &mut hint);
}

pub fn on_enter_zone(
    enter: On<EnterZone>,
    mut zones: Query<(&mut Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    mut pointer: ResMut<PointerState>,
    mut hint: ResMut<CursorHint>,
    mut commands: Commands,
) {
    let Ok((mut zone, mut visual)) = zones.get_mut(enter.zone) else {
        return;
    };
    let fired = apply_enter(
        &mut zone,
        &mut visual,
        &motion,
        &mut hint,
        pointer.touch,
        enter.show_prompt,
    );
    // Host-driven occupancy changes re-arm arbitration.
    pointer.moved = true;
    if fired {
        commands.trigger(ZoneEntered {
            zone: enter.zone,
            via:  EnterSource::External,
        });
    }
}

pub fn on_leave_zone(
    leave: On<LeaveZone>,
    mut zones: Query<(&mut Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    mut hint: ResMut<CursorHint>,
    mut pointer: ResMut<PointerState>,
    mut commands: Commands,
) {
    let Ok((mut zone, mut visual)) = zones.get_mut(leave.zone) else {
        return;
    };
    apply_leave(&mut zone, &mut visual, &motion, &mut hint);
    // Host-driven occupancy changes re-arm arbitration.
    pointer.moved = true;
    commands.trigger(ZoneExited { zone: leave.zone });
}

pub fn on_interact_zone(
    interact: On<InteractZone>,
    mut zones: Query<(&mut Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    mut commands: Commands,
) {
    let Ok((zone, mut visual)) = zones.get_mut(interact.zone) else {
        return;
    };
    if apply_interact(&zone, &mut visual, &motion, interact.show_prompt) {
        commands.trigger(ZoneInteracted {
            zone: interact.zone,
        });
    }
}

// ============================================================================
// Systems
// ============================================================================

/// System that advances every zone's tween slots by the clamped frame delta
pub fn animate_zone_visuals(clock: Res<FrameClock>, mut visuals: Query<&mut ZoneVisual>) {
    let delta = clock.delta;
    for mut visual in &mut visuals {
        let visual = visual.as_mut();
        tween::drive(&mut visual.fence_tween, &mut visual.fence_height, delta);
        tween::drive_queue(&mut visual.dip_strike, &mut visual.fence_dip, delta);
        tween::drive(&mut visual.prompt_tween, &mut visual.prompt_alpha, delta);
        tween::drive(&mut visual.fill_tween, &mut visual.fill_alpha, delta);
        tween::drive(&mut visual.border_tween, &mut visual.border_alpha, delta);
    }
}
