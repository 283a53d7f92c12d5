//! ECS-level integration: WeaponsPlugin в headless App, FixedUpdate вручную

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use gunline_simulation::collision_layers::{COLLISION_LAYER_ACTORS, COLLISION_LAYER_ENVIRONMENT};
use gunline_simulation::weapon::CueKind;
use gunline_simulation::{
    create_headless_app, run_fixed_tick, AttachWeaponIntent, ColliderShape, DetachWeaponIntent,
    InputFrame, ProjectileExpired, ProjectileHit, ProjectilePool, SceneColliders, ScriptedInput,
    SimulationClock, SimulationConfig, WeaponArchetype, WeaponCatalog, WeaponCue, WeaponInput,
    WeaponMount,
};

fn drain<E: Event + Clone>(app: &App, cursor: &mut EventCursor<E>) -> Vec<E> {
    cursor
        .read(app.world().resource::<Events<E>>())
        .cloned()
        .collect()
}

fn spawn_shooter(app: &mut App, script: ScriptedInput) -> Entity {
    let shooter = app
        .world_mut()
        .spawn((
            Transform::default(),
            WeaponMount::new(Vec3::new(0.0, 1.5, 0.0)),
            WeaponInput::default(),
            script,
        ))
        .id();
    app.world_mut().send_event(AttachWeaponIntent {
        entity: shooter,
        archetype: "rifle".to_string(),
    });
    shooter
}

#[test]
fn test_clock_advances_fixed_step() {
    let mut app = create_headless_app(SimulationConfig::default());

    for _ in 0..60 {
        run_fixed_tick(&mut app);
    }

    let clock = app.world().resource::<SimulationClock>();
    assert_eq!(clock.tick, 60);
    assert!((clock.now() - 1.0).abs() < 1e-12);
}

#[test]
fn test_full_auto_burst_hits_target() {
    let mut app = create_headless_app(SimulationConfig::default());

    let target = app.world_mut().spawn_empty().id();
    app.insert_resource(SceneColliders::new().with(
        target,
        COLLISION_LAYER_ACTORS,
        ColliderShape::Cuboid {
            center: Vec3::new(0.0, 1.5, -20.0),
            half_extents: Vec3::splat(0.5),
        },
    ));

    // 30 тиков trigger'а при 600 RPM / 60 Hz → выстрел каждые 6 тиков
    let shooter = spawn_shooter(
        &mut app,
        ScriptedInput::default().repeat(InputFrame::fire(), 30),
    );

    let mut cues = EventCursor::<WeaponCue>::default();
    let mut hits = EventCursor::<ProjectileHit>::default();
    let mut fired = 0;
    let mut hit_events = Vec::new();

    for _ in 0..60 {
        run_fixed_tick(&mut app);
        fired += drain(&app, &mut cues)
            .iter()
            .filter(|cue| cue.kind == CueKind::Fire)
            .count();
        hit_events.extend(drain(&app, &mut hits));
    }

    assert_eq!(fired, 5);
    assert_eq!(hit_events.len(), 5);
    assert!(hit_events
        .iter()
        .all(|hit| hit.target == target && hit.shooter == Some(shooter) && hit.damage == 25.0));

    let mount = app.world().get::<WeaponMount>(shooter).unwrap();
    assert_eq!(mount.weapon().unwrap().current_ammo(), 25);

    // Все снаряды вернулись в pool
    let pool = app.world().resource::<ProjectilePool>();
    assert_eq!(pool.active_count(), 0);
    assert!(pool.is_consistent());
}

#[test]
fn test_full_auto_cadence_matches_rpm() {
    let mut app = create_headless_app(SimulationConfig::default());
    spawn_shooter(
        &mut app,
        ScriptedInput::default().repeat(InputFrame::fire(), 120),
    );

    let mut cues = EventCursor::<WeaponCue>::default();
    let mut fire_ticks = Vec::new();

    for tick in 1..=120u64 {
        run_fixed_tick(&mut app);
        let fired = drain(&app, &mut cues)
            .iter()
            .any(|cue| cue.kind == CueKind::Fire);
        if fired {
            fire_ticks.push(tick);
        }
    }

    // 600 RPM при 60 Hz: ровно каждые 6 тиков, без дрейфа
    assert_eq!(fire_ticks.len(), 20, "fire ticks: {:?}", fire_ticks);
    assert!(fire_ticks.windows(2).all(|pair| pair[1] - pair[0] == 6));
}

#[test]
fn test_event_buffers_stay_bounded() {
    let mut app = create_headless_app(SimulationConfig::default());
    let target = app.world_mut().spawn_empty().id();
    app.insert_resource(SceneColliders::new().with(
        target,
        COLLISION_LAYER_ACTORS,
        ColliderShape::Cuboid {
            center: Vec3::new(0.0, 1.5, -20.0),
            half_extents: Vec3::splat(0.5),
        },
    ));
    spawn_shooter(
        &mut app,
        ScriptedInput::default().repeat(InputFrame::fire(), 2000),
    );

    for _ in 0..2000 {
        run_fixed_tick(&mut app);
    }

    // Двойной буфер: максимум два tick'а событий (Fire + Recoil или Empty за tick)
    let world = app.world();
    assert!(world.resource::<Events<WeaponCue>>().len() <= 4);
    assert!(world.resource::<Events<ProjectileHit>>().len() <= 2);
    assert!(world.resource::<Events<ProjectileExpired>>().len() <= 2);
    assert!(world.resource::<Events<AttachWeaponIntent>>().is_empty());
}

#[test]
fn test_semi_auto_fires_once_per_press() {
    let mut catalog = WeaponCatalog::builtin();
    catalog.insert(
        WeaponArchetype::new(
            gunline_simulation::WeaponProfile {
                name: "Marksman".to_string(),
                ..Default::default()
            },
            gunline_simulation::WeaponBehavior::Rifle {
                full_auto: false,
                recoil_amount: 0.2,
            },
        )
        .with_fire_point(Vec3::new(0.0, 0.0, -1.0)),
    );

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(SimulationConfig::default())
        .insert_resource(catalog)
        .add_plugins(gunline_simulation::WeaponsPlugin);

    // Зажат 20 тиков, отпущен, снова нажат
    let script = ScriptedInput::default()
        .repeat(InputFrame::fire(), 20)
        .repeat(InputFrame::default(), 2)
        .repeat(InputFrame::fire(), 20);
    let shooter = app
        .world_mut()
        .spawn((
            Transform::default(),
            WeaponMount::default(),
            WeaponInput::default(),
            script,
        ))
        .id();
    app.world_mut().send_event(AttachWeaponIntent {
        entity: shooter,
        archetype: "marksman".to_string(),
    });

    let mut cues = EventCursor::<WeaponCue>::default();
    let mut all_cues = Vec::new();
    for _ in 0..50 {
        run_fixed_tick(&mut app);
        all_cues.extend(drain(&app, &mut cues));
    }

    let fired = all_cues.iter().filter(|cue| cue.kind == CueKind::Fire).count();
    let recoils = all_cues
        .iter()
        .filter(|cue| matches!(cue.kind, CueKind::Recoil { .. }))
        .count();
    assert_eq!(fired, 2);
    assert_eq!(recoils, 2);
}

#[test]
fn test_reload_via_input_and_deadline() {
    let mut app = create_headless_app(SimulationConfig::default());

    let wall = app.world_mut().spawn_empty().id();
    app.insert_resource(SceneColliders::new().with(
        wall,
        COLLISION_LAYER_ENVIRONMENT,
        ColliderShape::Plane {
            point: Vec3::new(0.0, 0.0, -30.0),
            normal: Vec3::Z,
        },
    ));

    let script = ScriptedInput::default()
        .repeat(InputFrame::fire(), 1)
        .repeat(InputFrame::reload(), 1);
    let shooter = spawn_shooter(&mut app, script);

    let mut cues = EventCursor::<WeaponCue>::default();
    let mut all_cues = Vec::new();

    // Rifle reload 2.5s = 150 тиков
    for _ in 0..10 {
        run_fixed_tick(&mut app);
        all_cues.extend(drain(&app, &mut cues));
    }
    {
        let mount = app.world().get::<WeaponMount>(shooter).unwrap();
        assert!(mount.weapon().unwrap().is_reloading());
    }

    for _ in 0..150 {
        run_fixed_tick(&mut app);
        all_cues.extend(drain(&app, &mut cues));
    }

    let kinds: Vec<CueKind> = all_cues
        .iter()
        .map(|cue| cue.kind)
        .filter(|kind| !matches!(kind, CueKind::Recoil { .. }))
        .collect();
    assert_eq!(
        kinds,
        vec![CueKind::Fire, CueKind::ReloadStart, CueKind::ReloadComplete]
    );

    let mount = app.world().get::<WeaponMount>(shooter).unwrap();
    let weapon = mount.weapon().unwrap();
    assert!(!weapon.is_reloading());
    assert_eq!(weapon.current_ammo(), 30);
}

#[test]
fn test_projectile_expires_in_empty_scene() {
    let mut app = create_headless_app(SimulationConfig::default());
    let _shooter = spawn_shooter(
        &mut app,
        ScriptedInput::default().repeat(InputFrame::fire(), 1),
    );

    let mut expiries = EventCursor::<ProjectileExpired>::default();
    let mut expired = Vec::new();

    // Lifetime 5s = 300 тиков
    for _ in 0..299 {
        run_fixed_tick(&mut app);
        expired.extend(drain(&app, &mut expiries));
    }
    assert!(expired.is_empty());

    for _ in 0..3 {
        run_fixed_tick(&mut app);
        expired.extend(drain(&app, &mut expiries));
    }
    assert_eq!(expired.len(), 1);
    assert_eq!(app.world().resource::<ProjectilePool>().active_count(), 0);
}

#[test]
fn test_unknown_archetype_and_detach() {
    let mut app = create_headless_app(SimulationConfig::default());
    let shooter = spawn_shooter(&mut app, ScriptedInput::default());
    run_fixed_tick(&mut app);
    assert!(app.world().get::<WeaponMount>(shooter).unwrap().has_weapon());

    // Неизвестное имя — mount не меняется
    app.world_mut().send_event(AttachWeaponIntent {
        entity: shooter,
        archetype: "railgun".to_string(),
    });
    run_fixed_tick(&mut app);
    let mount = app.world().get::<WeaponMount>(shooter).unwrap();
    assert_eq!(mount.weapon().unwrap().name(), "Rifle");

    app.world_mut().send_event(DetachWeaponIntent { entity: shooter });
    run_fixed_tick(&mut app);
    assert!(!app.world().get::<WeaponMount>(shooter).unwrap().has_weapon());
}

#[test]
fn test_detach_applies_before_attach_within_tick() {
    let mut app = create_headless_app(SimulationConfig::default());
    let shooter = spawn_shooter(&mut app, ScriptedInput::default());
    run_fixed_tick(&mut app);

    // Смена оружия в одном tick'е: detach rifle, attach pistol
    app.world_mut().send_event(AttachWeaponIntent {
        entity: shooter,
        archetype: "pistol".to_string(),
    });
    app.world_mut().send_event(DetachWeaponIntent { entity: shooter });
    run_fixed_tick(&mut app);

    let mount = app.world().get::<WeaponMount>(shooter).unwrap();
    assert_eq!(mount.weapon().unwrap().name(), "Pistol");
    assert!(mount.weapon().unwrap().is_initialized());
}
