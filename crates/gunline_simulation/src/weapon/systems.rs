//! Weapon systems (FixedUpdate)
//!
//! Порядок (см. `WeaponSet`): attach intents → aim → input → reload completion.

use bevy::prelude::*;

use super::catalog::WeaponCatalog;
use super::cues::WeaponCue;
use super::mount::WeaponMount;
use crate::config::SimulationClock;
use crate::input::WeaponInput;
use crate::logger::log_error;
use crate::projectile::ProjectilePool;

/// Intent: attach archetype из каталога на mount entity
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttachWeaponIntent {
    pub entity: Entity,
    /// Имя archetype в `WeaponCatalog`
    pub archetype: String,
}

/// Intent: уничтожить weapon на mount entity
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DetachWeaponIntent {
    pub entity: Entity,
}

/// System: attach/detach intents → WeaponMount
///
/// Внутри tick'а сначала все detach, потом все attach (порядок отправки между
/// двумя типами intent'ов не сохраняется). Detach + Attach в одном tick'е —
/// смена оружия; Attach + Detach в одном tick'е тоже оставляет weapon
/// attach'енным. Чтобы снять только что выданное оружие, Detach шлётся
/// следующим tick'ом.
///
/// Неизвестное имя archetype = null archetype (error log, mount не меняется).
pub fn process_weapon_intents(
    catalog: Res<WeaponCatalog>,
    mut attach_events: EventReader<AttachWeaponIntent>,
    mut detach_events: EventReader<DetachWeaponIntent>,
    mut mounts: Query<&mut WeaponMount>,
) {
    for intent in detach_events.read() {
        if let Ok(mut mount) = mounts.get_mut(intent.entity) {
            mount.detach();
        }
    }

    for intent in attach_events.read() {
        let Ok(mut mount) = mounts.get_mut(intent.entity) else {
            log_error(&format!(
                "❌ AttachWeaponIntent: entity {:?} has no WeaponMount",
                intent.entity
            ));
            continue;
        };

        mount.bind_owner(intent.entity);
        let archetype = catalog.get(&intent.archetype);
        if archetype.is_none() {
            log_error(&format!(
                "❌ AttachWeaponIntent: unknown archetype '{}'",
                intent.archetype
            ));
        }
        mount.attach(archetype);
    }
}

/// System: owner Transform → muzzle position/forward
pub fn aim_weapon_mounts(mut mounts: Query<(Entity, &Transform, &mut WeaponMount)>) {
    for (entity, transform, mut mount) in mounts.iter_mut() {
        mount.bind_owner(entity);
        mount.aim(transform);
    }
}

/// System: WeaponInput → fire/reload.
///
/// Full-auto — level-triggered (каждый tick пока trigger зажат, cooldown
/// ограничивает темп), semi-auto — только rising edge.
pub fn handle_weapon_input(
    clock: Res<SimulationClock>,
    mut pool: ResMut<ProjectilePool>,
    mut mounts: Query<(&mut WeaponMount, &mut WeaponInput)>,
    mut cues: EventWriter<WeaponCue>,
) {
    let now = clock.now();

    for (mut mount, mut input) in mounts.iter_mut() {
        let full_auto = mount
            .weapon()
            .map(|weapon| weapon.archetype().behavior.is_full_auto())
            .unwrap_or(true);

        if input.wants_fire(full_auto) {
            mount.handle_fire_input(now, &mut pool, &mut cues);
        }

        if input.take_reload() {
            mount.handle_reload_input(now, &mut cues);
        }

        input.end_tick();
    }
}

/// System: reload deadlines
pub fn complete_weapon_reloads(
    clock: Res<SimulationClock>,
    mut mounts: Query<&mut WeaponMount>,
    mut cues: EventWriter<WeaponCue>,
) {
    let now = clock.now();

    for mut mount in mounts.iter_mut() {
        mount.update(now, &mut cues);
    }
}
