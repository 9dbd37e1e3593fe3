//! Zone registry and pointer arbitration.
//!
//! `ZoneIndex` tracks every zone in registration order plus the single
//! pointer-hover owner. Arbitration re-runs only when the pointer dirty
//! flag is set (movement, or zone churn), walks the index with a pointer
//! ray against each zone's pick plane and hands ownership to the nearest
//! hit. Ownership suppresses the owner's actor-containment test; release
//! restores it.

use bevy::prelude::*;

use crate::events::{EnterSource, ZoneEntered, ZoneExited, ZoneInteracted};
use crate::input::{
    CursorHint, InteractKeys, PointerRay, PointerState, TrackedActor, ViewportInfo,
};
use crate::rig::CameraRig;
use crate::zone::{self, Zone, ZoneMotion, ZoneVisual};

/// Registration-ordered zone list and the pointer-hover owner.
///
/// Maintained by component lifecycle observers, so entries never dangle:
/// a despawned zone is unindexed (and disowned) before the next frame.
#[derive(Resource, Reflect, Debug, Clone, Default)]
#[reflect(Resource)]
pub struct ZoneIndex {
    zones: Vec<Entity>,
    pointer_owner: Option<Entity>,
}

impl ZoneIndex {
    pub fn zones(&self) -> &[Entity] {
        &self.zones
    }

    pub const fn pointer_owner(&self) -> Option<Entity> {
        self.pointer_owner
    }
}

// ============================================================================
// Index maintenance
// ============================================================================

/// Observer that indexes a newly added zone
pub fn index_added_zone(
    add: On<Add, Zone>,
    mut index: ResMut<ZoneIndex>,
    mut pointer: ResMut<PointerState>,
) {
    index.zones.push(add.entity);
    // A new zone is hit-test eligible even under a motionless pointer.
    pointer.moved = true;
}

/// Observer that unindexes a removed zone and drops its ownership
pub fn unindex_removed_zone(
    remove: On<Remove, Zone>,
    mut index: ResMut<ZoneIndex>,
    mut pointer: ResMut<PointerState>,
    mut hint: ResMut<CursorHint>,
) {
    let entity = remove.entity;
    index.zones.retain(|&zone| zone != entity);
    if index.pointer_owner == Some(entity) {
        index.pointer_owner = None;
        // The owner vanished without a leave pass; drop its affordance.
        *hint = CursorHint::Neutral;
    }
    pointer.moved = true;
}

// ============================================================================
// Arbitration
// ============================================================================

/// System that re-evaluates pointer ownership when the dirty flag is set.
///
/// On an owner change, strictly in order: the old owner leaves and gets
/// its proximity flag restored, the owner handle moves, then the new
/// owner enters (without its prompt) and gets its proximity suppressed.
pub fn arbitrate_pointer(
    mut index: ResMut<ZoneIndex>,
    mut pointer: ResMut<PointerState>,
    viewport: Res<ViewportInfo>,
    cameras: Query<(&Transform, &CameraRig)>,
    mut zones: Query<(&mut Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    mut hint: ResMut<CursorHint>,
    mut commands: Commands,
) {
    if !pointer.moved {
        return;
    }
    let Ok((camera, rig)) = cameras.single() else {
        // Keep the flag set so ownership re-evaluates once a camera exists.
        return;
    };
    pointer.moved = false;

    // A host-driven leave can empty the owned zone between passes. Stale
    // ownership is released here so the candidate walk below re-acquires
    // or drops the zone through the normal transfer path.
    if let Some(owner) = index.pointer_owner {
        if let Ok((mut zone, _)) = zones.get_mut(owner) {
            if !zone.inside {
                zone.proximity_enabled = zone.proximity_default;
                index.pointer_owner = None;
            }
        }
    }

    let candidate = pointer.ndc.and_then(|ndc| {
        let aspect = viewport.aspect()?;
        let ray = PointerRay::from_pose(camera, rig.fov_y, aspect, ndc);
        let mut best: Option<(Entity, f32)> = None;
        for &entity in &index.zones {
            let Ok((zone, _)) = zones.get(entity) else {
                continue;
            };
            let Some(travel) = zone.bounds.raycast(&ray) else {
                continue;
            };
            // Strict comparison keeps the first-registered zone on ties.
            if best.is_none_or(|(_, best_travel)| travel < best_travel) {
                best = Some((entity, travel));
            }
        }
        best.map(|(entity, _)| entity)
    });

    if candidate == index.pointer_owner {
        return;
    }
    debug!(
        "pointer ownership {:?} -> {:?}",
        index.pointer_owner, candidate
    );

    if let Some(previous) = index.pointer_owner {
        if let Ok((mut zone, mut visual)) = zones.get_mut(previous) {
            zone::apply_leave(&mut zone, &mut visual, &motion, &mut hint);
            zone.proximity_enabled = zone.proximity_default;
            commands.trigger(ZoneExited { zone: previous });
        }
    }

    index.pointer_owner = candidate;

    if let Some(next) = candidate {
        if let Ok((mut zone, mut visual)) = zones.get_mut(next) {
            let fired = zone::apply_enter(
                &mut zone,
                &mut visual,
                &motion,
                &mut hint,
                pointer.touch,
                false,
            );
            zone.proximity_enabled = false;
            if fired {
                commands.trigger(ZoneEntered {
                    zone: next,
                    via:  EnterSource::Pointer,
                });
            }
        }
    }
}

/// System that tracks actor containment for every proximity-enabled zone
/// and drives the edge transitions
pub fn drive_zone_proximity(
    actor: Res<TrackedActor>,
    index: Res<ZoneIndex>,
    mut zones: Query<(&mut Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    pointer: Res<PointerState>,
    mut hint: ResMut<CursorHint>,
    mut commands: Commands,
) {
    for &entity in index.zones() {
        let Ok((mut zone, mut visual)) = zones.get_mut(entity) else {
            continue;
        };
        if !zone.proximity_enabled {
            continue;
        }
        let inside_now = zone.bounds.contains(actor.position);
        if inside_now == zone.inside {
            continue;
        }
        if inside_now {
            let fired = zone::apply_enter(
                &mut zone,
                &mut visual,
                &motion,
                &mut hint,
                pointer.touch,
                true,
            );
            if fired {
                commands.trigger(ZoneEntered {
                    zone: entity,
                    via:  EnterSource::Proximity,
                });
            }
        } else {
            zone::apply_leave(&mut zone, &mut visual, &motion, &mut hint);
            commands.trigger(ZoneExited { zone: entity });
        }
    }
}

/// System that turns pointer clicks/taps and interact keys into zone
/// strikes. Clicks strike the hovered owner without its prompt; keys
/// strike every occupied zone with the prompt re-shown.
pub fn apply_interact_inputs(
    keys: Res<ButtonInput<KeyCode>>,
    interact_keys: Res<InteractKeys>,
    pointer: Res<PointerState>,
    index: Res<ZoneIndex>,
    mut zones: Query<(&Zone, &mut ZoneVisual)>,
    motion: Res<ZoneMotion>,
    mut commands: Commands,
) {
    if pointer.just_pressed {
        if let Some(owner) = index.pointer_owner() {
            if let Ok((zone, mut visual)) = zones.get_mut(owner) {
                if zone::apply_interact(zone, &mut visual, &motion, false) {
                    commands.trigger(ZoneInteracted { zone: owner });
                }
            }
        }
    }

    let key_struck = interact_keys.keys.iter().any(|&key| keys.just_pressed(key));
    if !key_struck {
        return;
    }
    for &entity in index.zones() {
        let Ok((zone, mut visual)) = zones.get_mut(entity) else {
            continue;
        };
        if !zone.inside {
            continue;
        }
        if zone::apply_interact(zone, &mut visual, &motion, true) {
            commands.trigger(ZoneInteracted { zone: entity });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::events::{EnterZone, LeaveZone};
    use crate::input::reset_pointer_transients;
    use crate::zone::{ZoneBounds, ZoneVisual, on_enter_zone, on_leave_zone};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Logged {
        Entered(Entity, EnterSource),
        Exited(Entity),
        Interacted(Entity),
    }

    #[derive(Resource, Default)]
    struct EventLog(Vec<Logged>);

    fn registry_app() -> App {
        let mut app = App::new();
        app.init_resource::<ZoneIndex>()
            .init_resource::<PointerState>()
            // The actor parks far from every fixture zone; proximity tests
            // drive it in explicitly.
            .insert_resource(TrackedActor {
                position: Vec2::splat(100.0),
                speed: 0.0,
            })
            .init_resource::<CursorHint>()
            .init_resource::<ZoneMotion>()
            .init_resource::<InteractKeys>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<EventLog>()
            .insert_resource(ViewportInfo::new(1280.0, 720.0))
            .add_observer(index_added_zone)
            .add_observer(unindex_removed_zone)
            .add_observer(|entered: On<ZoneEntered>, mut log: ResMut<EventLog>| {
                log.0.push(Logged::Entered(entered.zone, entered.via));
            })
            .add_observer(|exited: On<ZoneExited>, mut log: ResMut<EventLog>| {
                log.0.push(Logged::Exited(exited.zone));
            })
            .add_observer(|interacted: On<ZoneInteracted>, mut log: ResMut<EventLog>| {
                log.0.push(Logged::Interacted(interacted.zone));
            })
            .add_systems(
                Update,
                (
                    arbitrate_pointer,
                    drive_zone_proximity,
                    apply_interact_inputs,
                    reset_pointer_transients,
                )
                    .chain(),
            );
        app
    }

    fn spawn_camera(app: &mut App) -> Entity {
        let mut rig = CameraRig::default();
        rig.bypass = true;
        app.world_mut()
            .spawn((
                Transform::from_xyz(20.0, 25.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
                rig,
            ))
            .id()
    }

    fn spawn_zone(app: &mut App, bounds: ZoneBounds, active: bool, proximity: bool) -> Entity {
        app.world_mut()
            .spawn((
                Zone {
                    bounds,
                    active,
                    inside: false,
                    prompt: true,
                    proximity_enabled: proximity,
                    proximity_default: proximity,
                },
                ZoneVisual::default(),
            ))
            .id()
    }

    /// Forward projection of a world point into pointer NDC, the inverse
    /// of the arbiter's ray construction.
    fn project_ndc(camera: &Transform, fov_y: f32, aspect: f32, point: Vec3) -> Vec2 {
        let relative = point - camera.translation;
        let forward = camera.rotation * Vec3::NEG_Z;
        let right = camera.rotation * Vec3::X;
        let up = camera.rotation * Vec3::Y;
        let depth = relative.dot(forward);
        let half_tan_vfov = (fov_y * 0.5).tan();
        let half_tan_hfov = half_tan_vfov * aspect;
        Vec2::new(
            relative.dot(right) / depth / half_tan_hfov,
            relative.dot(up) / depth / half_tan_vfov,
        )
    }

    fn point_at(app: &mut App, camera: Entity, point: Vec3) {
        let camera_pose = *app.world().get::<Transform>(camera).unwrap();
        let fov_y = app.world().get::<CameraRig>(camera).unwrap().fov_y;
        let aspect = app.world().resource::<ViewportInfo>().aspect().unwrap();
        let ndc = project_ndc(&camera_pose, fov_y, aspect, point);
        let mut pointer = app.world_mut().resource_mut::<PointerState>();
        pointer.ndc = Some(ndc);
        pointer.moved = true;
    }

    fn clear_pointer(app: &mut App) {
        let mut pointer = app.world_mut().resource_mut::<PointerState>();
        pointer.ndc = None;
        pointer.moved = true;
    }

    fn log(app: &App) -> Vec<Logged> {
        app.world().resource::<EventLog>().0.clone()
    }

    #[test]
    fn hover_acquires_and_release_restores() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(4.0)),
            true,
            true,
        );

        point_at(&mut app, camera, Vec3::ZERO);
        app.update();

        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(zone));
        let owned = app.world().get::<Zone>(zone).unwrap();
        assert!(owned.inside);
        assert!(!owned.proximity_enabled);
        assert_eq!(
            log(&app),
            vec![Logged::Entered(zone, EnterSource::Pointer)]
        );
        assert_eq!(
            *app.world().resource::<CursorHint>(),
            CursorHint::Interactive
        );

        clear_pointer(&mut app);
        app.update();

        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), None);
        let released = app.world().get::<Zone>(zone).unwrap();
        assert!(!released.inside);
        assert!(released.proximity_enabled);
        assert_eq!(
            log(&app),
            vec![
                Logged::Entered(zone, EnterSource::Pointer),
                Logged::Exited(zone),
            ]
        );
        assert_eq!(*app.world().resource::<CursorHint>(), CursorHint::Neutral);
    }

    #[test]
    fn nearest_pick_plane_wins_transfer_in_order() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);
        let wide = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(6.0)),
            true,
            true,
        );
        let platform = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::splat(2.0), Vec2::splat(2.0)).with_pick_height(0.5),
            true,
            true,
        );

        // Over the wide zone only.
        point_at(&mut app, camera, Vec3::new(-3.0, 0.0, -3.0));
        app.update();
        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(wide));

        // Over both: the raised pick plane is hit first.
        point_at(&mut app, camera, Vec3::new(2.0, 0.0, 2.0));
        app.update();
        assert_eq!(
            app.world().resource::<ZoneIndex>().pointer_owner(),
            Some(platform)
        );

        // Old owner left (flag restored) before the new owner entered.
        assert_eq!(
            log(&app),
            vec![
                Logged::Entered(wide, EnterSource::Pointer),
                Logged::Exited(wide),
                Logged::Entered(platform, EnterSource::Pointer),
            ]
        );
        let released = app.world().get::<Zone>(wide).unwrap();
        assert!(!released.inside);
        assert!(released.proximity_enabled);
        let owned = app.world().get::<Zone>(platform).unwrap();
        assert!(owned.inside);
        assert!(!owned.proximity_enabled);
    }

    #[test]
    fn exact_tie_keeps_first_registered_zone() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);
        let bounds = ZoneBounds::new(Vec2::ZERO, Vec2::splat(4.0));
        let first = spawn_zone(&mut app, bounds, true, true);
        let _second = spawn_zone(&mut app, bounds, true, true);

        point_at(&mut app, camera, Vec3::ZERO);
        app.update();

        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(first));
    }

    #[test]
    fn actor_drive_in_fires_once() {
        let mut app = registry_app();
        let _camera = spawn_camera(&mut app);
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(3.0)),
            true,
            true,
        );

        // Approach from outside, then sit inside for a while.
        for x in [-6.0, -4.0, -2.0, -1.0, 0.0, 1.0] {
            app.world_mut().resource_mut::<TrackedActor>().position = Vec2::new(x, 0.0);
            app.update();
        }
        assert_eq!(
            log(&app),
            vec![Logged::Entered(zone, EnterSource::Proximity)]
        );
        assert!(app.world().get::<Zone>(zone).unwrap().inside);

        // Drive out again.
        app.world_mut().resource_mut::<TrackedActor>().position = Vec2::new(8.0, 0.0);
        app.update();
        assert_eq!(
            log(&app),
            vec![
                Logged::Entered(zone, EnterSource::Proximity),
                Logged::Exited(zone),
            ]
        );
    }

    #[test]
    fn pointer_release_reenters_for_occupant() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(3.0)),
            true,
            true,
        );

        // Actor drives in first.
        app.world_mut().resource_mut::<TrackedActor>().position = Vec2::new(0.5, 0.5);
        app.update();

        // Pointer hovers the occupied zone: it takes ownership and announces
        // its own pointer-sourced entry.
        point_at(&mut app, camera, Vec3::ZERO);
        app.update();
        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(zone));
        assert_eq!(
            log(&app),
            vec![
                Logged::Entered(zone, EnterSource::Proximity),
                Logged::Entered(zone, EnterSource::Pointer),
            ]
        );

        // Pointer leaves: the proximity driver re-enters on the same frame
        // because the actor still occupies the zone.
        clear_pointer(&mut app);
        app.update();
        let occupied = app.world().get::<Zone>(zone).unwrap();
        assert!(occupied.inside);
        assert!(occupied.proximity_enabled);
        assert_eq!(
            log(&app)[2..],
            [
                Logged::Exited(zone),
                Logged::Entered(zone, EnterSource::Proximity),
            ]
        );
    }

    #[test]
    fn click_strikes_owner_once() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(4.0)),
            true,
            true,
        );

        point_at(&mut app, camera, Vec3::ZERO);
        app.update();

        {
            let mut pointer = app.world_mut().resource_mut::<PointerState>();
            pointer.just_pressed = true;
            pointer.pressed = true;
        }
        app.update();
        assert_eq!(
            log(&app).last(),
            Some(&Logged::Interacted(zone))
        );
        let strikes = log(&app)
            .iter()
            .filter(|entry| matches!(entry, Logged::Interacted(_)))
            .count();
        assert_eq!(strikes, 1);

        // The edge was consumed; holding the button adds nothing.
        app.update();
        let strikes = log(&app)
            .iter()
            .filter(|entry| matches!(entry, Logged::Interacted(_)))
            .count();
        assert_eq!(strikes, 1);
    }

    #[test]
    fn inactive_zone_still_owns_pointer_silently() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(4.0)),
            false,
            true,
        );

        point_at(&mut app, camera, Vec3::ZERO);
        app.update();

        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(zone));
        assert!(app.world().get::<Zone>(zone).unwrap().inside);
        assert!(log(&app).is_empty());

        // Clicking an inactive owner strikes nothing.
        app.world_mut().resource_mut::<PointerState>().just_pressed = true;
        app.update();
        assert!(log(&app).is_empty());
    }

    #[test]
    fn interact_key_strikes_occupied_zones() {
        let mut app = registry_app();
        let _camera = spawn_camera(&mut app);
        let occupied = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(3.0)),
            true,
            true,
        );
        let _elsewhere = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::new(20.0, 20.0), Vec2::splat(3.0)),
            true,
            true,
        );

        app.world_mut().resource_mut::<TrackedActor>().position = Vec2::new(0.5, 0.0);
        app.update();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyE);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        app.update();

        let strikes: Vec<_> = log(&app)
            .into_iter()
            .filter(|entry| matches!(entry, Logged::Interacted(_)))
            .collect();
        assert_eq!(strikes, vec![Logged::Interacted(occupied)]);
    }

    #[test]
    fn despawned_owner_clears_index() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(4.0)),
            true,
            true,
        );

        point_at(&mut app, camera, Vec3::ZERO);
        app.update();
        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(zone));
        assert_eq!(
            *app.world().resource::<CursorHint>(),
            CursorHint::Interactive
        );

        app.world_mut().despawn(zone);
        let index = app.world().resource::<ZoneIndex>();
        assert_eq!(index.pointer_owner(), None);
        assert!(index.zones().is_empty());
        // A despawned owner gets no leave pass; the unindex observer drops
        // the affordance itself.
        assert_eq!(*app.world().resource::<CursorHint>(), CursorHint::Neutral);

        app.update();
        assert_eq!(*app.world().resource::<CursorHint>(), CursorHint::Neutral);
    }

    #[test]
    fn zone_added_under_motionless_pointer_is_acquired() {
        let mut app = registry_app();
        let camera = spawn_camera(&mut app);

        point_at(&mut app, camera, Vec3::ZERO);
        app.update();
        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), None);
        assert!(!app.world().resource::<PointerState>().moved);

        // The pointer has not moved, but a new zone under it must still be
        // picked up on the next pass.
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(4.0)),
            true,
            true,
        );
        app.update();
        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(zone));
    }

    #[test]
    fn host_leave_of_hovered_zone_reconciles_ownership() {
        let mut app = registry_app();
        app.add_observer(on_leave_zone);
        let camera = spawn_camera(&mut app);
        let zone = spawn_zone(
            &mut app,
            ZoneBounds::new(Vec2::ZERO, Vec2::splat(4.0)),
            true,
            true,
        );

        point_at(&mut app, camera, Vec3::ZERO);
        app.update();
        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(zone));

        // The host empties the zone while the pointer still hovers it.
        app.world_mut().trigger(LeaveZone { zone });
        app.world_mut().flush();
        assert!(!app.world().get::<Zone>(zone).unwrap().inside);

        // The motionless pointer must not keep owning an emptied zone; the
        // re-armed arbiter re-acquires it.
        app.update();
        assert_eq!(app.world().resource::<ZoneIndex>().pointer_owner(), Some(zone));
        let owned = app.world().get::<Zone>(zone).unwrap();
        assert!(owned.inside);
        assert!(!owned.proximity_enabled);

        // Stable from then on: the owner is occupied on every later frame.
        for _ in 0..3 {
            app.update();
            assert!(app.world().get::<Zone>(zone).unwrap().inside);
        }

        assert_eq!(
            log(&app),
            vec![
                Logged::Entered(zone, EnterSource::Pointer),
                Logged::Exited(zone),
                Logged::Entered(zone, EnterSource::Pointer),
            ]
        );
    }

    #[test]
    fn arbitration_invariants_hold_under_fuzz() {
        let mut app = registry_app();
        app.add_observer(on_enter_zone);
        app.add_observer(on_leave_zone);
        let camera = spawn_camera(&mut app);

        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut zones = Vec::new();
        for i in 0..6 {
            let center = Vec2::new(rng.gen_range(-9.0..9.0), rng.gen_range(-9.0..9.0));
            let half = Vec2::new(rng.gen_range(1.0..4.0), rng.gen_range(1.0..4.0));
            let pick = if i % 2 == 0 { 0.0 } else { rng.gen_range(0.0..1.5) };
            zones.push(spawn_zone(
                &mut app,
                ZoneBounds::new(center, half).with_pick_height(pick),
                rng.gen_bool(0.8),
                rng.gen_bool(0.8),
            ));
        }

        let mut actor = Vec2::ZERO;
        for _ in 0..1000 {
            if rng.gen_bool(0.7) {
                let target = Vec3::new(
                    rng.gen_range(-12.0..12.0),
                    0.0,
                    rng.gen_range(-12.0..12.0),
                );
                point_at(&mut app, camera, target);
            }
            if rng.gen_bool(0.1) {
                clear_pointer(&mut app);
            }
            if rng.gen_bool(0.05) {
                app.world_mut().resource_mut::<PointerState>().just_pressed = true;
            }
            // Host-driven transitions race the built-in detectors.
            if rng.gen_bool(0.05) {
                let picked = zones[rng.gen_range(0..zones.len())];
                app.world_mut().trigger(EnterZone {
                    zone: picked,
                    show_prompt: rng.gen_bool(0.5),
                });
            }
            if rng.gen_bool(0.05) {
                let picked = zones[rng.gen_range(0..zones.len())];
                app.world_mut().trigger(LeaveZone { zone: picked });
            }
            actor += Vec2::new(rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5));
            actor = actor.clamp(Vec2::splat(-12.0), Vec2::splat(12.0));
            app.world_mut().resource_mut::<TrackedActor>().position = actor;

            app.update();

            let owner = app.world().resource::<ZoneIndex>().pointer_owner();
            if let Some(owner) = owner {
                let zone = app.world().get::<Zone>(owner).unwrap();
                assert!(zone.inside, "pointer owner must be occupied");
                assert!(
                    !zone.proximity_enabled,
                    "ownership must suppress the proximity test"
                );
            }
            for &entity in &zones {
                if Some(entity) == owner {
                    continue;
                }
                let zone = app.world().get::<Zone>(entity).unwrap();
                assert_eq!(
                    zone.proximity_enabled, zone.proximity_default,
                    "non-owners must keep their configured proximity flag"
                );
            }
        }
    }
}
