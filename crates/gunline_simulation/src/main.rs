//! Headless симуляция Gunline
//!
//! Стрелок с винтовкой, стена и мишень; scripted trigger pattern,
//! в конце — сводка (выстрелы, попадания, истечения, pool status).

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use gunline_simulation::collision_layers::{COLLISION_LAYER_ACTORS, COLLISION_LAYER_ENVIRONMENT};
use gunline_simulation::weapon::CueKind;
use gunline_simulation::{
    create_headless_app, run_fixed_tick, set_log_level, AttachWeaponIntent, ColliderShape,
    InputFrame, LogLevel, ProjectileExpired, ProjectileHit, ProjectilePool, SceneColliders,
    ScriptedInput, SimulationClock, SimulationConfig, WeaponCue, WeaponInput, WeaponMount,
};

const TICKS: usize = 600;

fn main() {
    set_log_level(LogLevel::Info);
    println!("Starting Gunline headless simulation ({} ticks)", TICKS);

    let mut app = create_headless_app(SimulationConfig::default());

    // Мишень в 20м перед стрелком, стена за ней
    let target = app.world_mut().spawn_empty().id();
    let wall = app.world_mut().spawn_empty().id();
    app.insert_resource(
        SceneColliders::new()
            .with(
                target,
                COLLISION_LAYER_ACTORS,
                ColliderShape::Cuboid {
                    center: Vec3::new(0.0, 1.5, -20.0),
                    half_extents: Vec3::new(0.5, 1.0, 0.5),
                },
            )
            .with(
                wall,
                COLLISION_LAYER_ENVIRONMENT,
                ColliderShape::Plane {
                    point: Vec3::new(0.0, 0.0, -40.0),
                    normal: Vec3::Z,
                },
            ),
    );

    // Trigger pattern: очередь, пауза, reload, длинная очередь до пустого магазина
    let script = ScriptedInput::default()
        .repeat(InputFrame::fire(), 30)
        .repeat(InputFrame::default(), 30)
        .repeat(InputFrame::reload(), 1)
        .repeat(InputFrame::default(), 180)
        .repeat(InputFrame::fire(), 240);

    let shooter = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 0.0, 0.0),
            WeaponMount::new(Vec3::new(0.0, 1.5, 0.0)),
            WeaponInput::default(),
            script,
        ))
        .id();
    app.world_mut().send_event(AttachWeaponIntent {
        entity: shooter,
        archetype: "rifle".to_string(),
    });

    let mut cue_cursor = EventCursor::<WeaponCue>::default();
    let mut hit_cursor = EventCursor::<ProjectileHit>::default();
    let mut expiry_cursor = EventCursor::<ProjectileExpired>::default();

    let (mut shots, mut dry_fires, mut hits, mut expiries) = (0usize, 0usize, 0usize, 0usize);

    for tick in 0..TICKS {
        run_fixed_tick(&mut app);

        let world = app.world();
        for cue in cue_cursor.read(world.resource::<Events<WeaponCue>>()) {
            match cue.kind {
                CueKind::Fire => shots += 1,
                CueKind::Empty => dry_fires += 1,
                _ => {}
            }
        }
        hits += hit_cursor.read(world.resource::<Events<ProjectileHit>>()).count();
        expiries += expiry_cursor
            .read(world.resource::<Events<ProjectileExpired>>())
            .count();

        if tick % 100 == 0 {
            let pool = world.resource::<ProjectilePool>();
            println!(
                "Tick {}: {} projectiles in flight, {} pooled",
                tick,
                pool.active_count(),
                pool.inactive_count()
            );
        }
    }

    let world = app.world();
    let now = world.resource::<SimulationClock>().now();
    if let Some(status) = world
        .get::<WeaponMount>(shooter)
        .and_then(|mount| mount.status(now))
    {
        println!(
            "Weapon {}: {}/{} rounds",
            status.name, status.current_ammo, status.magazine_size
        );
    }
    world.resource::<ProjectilePool>().log_status();

    println!(
        "Simulation complete: {} shots, {} dry fires, {} hits, {} expired",
        shots, dry_fires, hits, expiries
    );
}
