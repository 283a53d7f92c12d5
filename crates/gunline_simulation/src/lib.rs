//! Gunline Simulation Core
//!
//! Weapon fire + projectile lifecycle для FPS, ECS-симуляция на Bevy 0.16.
//!
//! Core типы (`ProjectilePool`, `Weapon`, `WeaponMount`) — обычные Rust структуры:
//! время и collaborators передаются явно, тестируются без World.
//! `WeaponsPlugin` подключает их к FixedUpdate:
//! clock → intents/aim → input → reloads → projectiles.

use bevy::app::FixedMain;
use bevy::ecs::event::event_update_system;
use bevy::prelude::*;

// Публичные модули
pub mod collision_layers;
pub mod config;
pub mod input;
pub mod logger;
pub mod physics;
pub mod projectile;
pub mod weapon;

// Re-export для удобства
pub use config::{advance_simulation_clock, SimulationClock, SimulationConfig};
pub use input::{InputFrame, InputSource, ScriptedInput, WeaponInput};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use physics::{CollisionQuery, ColliderShape, SceneColliders};
pub use projectile::{
    ProjectileExpired, ProjectileHandle, ProjectileHit, ProjectileKind, ProjectilePool,
    ProjectileTypeId,
};
pub use weapon::{
    AttachWeaponIntent, DetachWeaponIntent, FireOutcome, FireRejection, Weapon, WeaponArchetype,
    WeaponBehavior, WeaponCatalog, WeaponCue, WeaponMount, WeaponProfile, WeaponStatus,
};

/// Порядок weapon/projectile систем внутри FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponSet {
    Clock,
    /// Input sampling, attach/detach intents, aim
    Prepare,
    Input,
    Reload,
    Projectiles,
}

/// Weapon + projectile подсистема.
///
/// Resources, которые уже вставлены в App до plugin'а (SimulationConfig,
/// WeaponCatalog, ProjectilePool, SceneColliders), не перезаписываются.
pub struct WeaponsPlugin;

impl Plugin for WeaponsPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<WeaponCatalog>() {
            app.insert_resource(WeaponCatalog::builtin());
        }

        if !app.world().contains_resource::<ProjectilePool>() {
            let mut pool = ProjectilePool::new(config.pool_prewarm);
            if let Some(catalog) = app.world().get_resource::<WeaponCatalog>() {
                catalog.register_projectile_kinds(&mut pool);
            }
            app.insert_resource(pool);
        }

        app.insert_resource(config)
            .init_resource::<SimulationClock>()
            .init_resource::<SceneColliders>()
            .add_event::<WeaponCue>()
            .add_event::<ProjectileHit>()
            .add_event::<ProjectileExpired>()
            .add_event::<AttachWeaponIntent>()
            .add_event::<DetachWeaponIntent>()
            .configure_sets(
                FixedUpdate,
                (
                    WeaponSet::Clock,
                    WeaponSet::Prepare,
                    WeaponSet::Input,
                    WeaponSet::Reload,
                    WeaponSet::Projectiles,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    advance_simulation_clock.in_set(WeaponSet::Clock),
                    (
                        input::sample_scripted_input,
                        weapon::process_weapon_intents,
                        weapon::aim_weapon_mounts,
                    )
                        .chain()
                        .in_set(WeaponSet::Prepare),
                    weapon::handle_weapon_input.in_set(WeaponSet::Input),
                    weapon::complete_weapon_reloads.in_set(WeaponSet::Reload),
                ),
            );

        #[cfg(not(feature = "rapier"))]
        app.add_systems(
            FixedUpdate,
            projectile::simulate_projectiles::<SceneColliders>.in_set(WeaponSet::Projectiles),
        );

        #[cfg(feature = "rapier")]
        app.add_systems(
            FixedUpdate,
            physics::rapier::step_projectiles_rapier.in_set(WeaponSet::Projectiles),
        );
    }
}

/// Главный plugin симуляции (fixed timestep + подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let tick_hz = app
            .world()
            .get_resource::<SimulationConfig>()
            .map(|config| config.tick_hz)
            .unwrap_or(SimulationConfig::default().tick_hz);

        app.insert_resource(Time::<Fixed>::from_hz(tick_hz))
            .add_plugins(WeaponsPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Ticks гоняются явно через `run_fixed_tick`, так что их число
/// не зависит от wall time.
pub fn create_headless_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    app
}

/// Один fixed tick симуляции: FixedMain (FixedFirst..FixedLast), затем swap
/// event буферов.
///
/// `First` (где Bevy обычно делает event update) здесь не запускается, поэтому
/// update делается вручную: events живут два tick'а, потом выбрасываются.
pub fn run_fixed_tick(app: &mut App) {
    let world = app.world_mut();
    world.run_schedule(FixedMain);

    if let Err(err) = world.run_system_cached(event_update_system) {
        log_error(&format!("❌ run_fixed_tick: event update failed: {}", err));
    }
}
