//! Tests for WeaponMount.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use crate::projectile::ProjectilePool;
    use crate::weapon::*;

    #[test]
    fn test_attach_null_archetype_leaves_mount_unchanged() {
        let mut mount = WeaponMount::new(Vec3::ZERO);
        assert!(!mount.attach(None));
        assert!(!mount.has_weapon());

        let pistol = WeaponArchetype::pistol();
        assert!(mount.attach(Some(&pistol)));
        assert!(!mount.attach(None));
        assert_eq!(mount.weapon().unwrap().name(), "Pistol");
    }

    #[test]
    fn test_attach_replaces_previous_weapon() {
        let mut mount = WeaponMount::new(Vec3::ZERO);
        let mut pool = ProjectilePool::new(2);
        let mut cues: Vec<WeaponCue> = Vec::new();

        mount.attach(Some(&WeaponArchetype::rifle()));
        mount.handle_fire_input(0.0, &mut pool, &mut cues);
        assert_eq!(mount.weapon().unwrap().current_ammo(), 29);

        // Новый instance — полный магазин
        mount.attach(Some(&WeaponArchetype::pistol()));
        let weapon = mount.weapon().unwrap();
        assert_eq!(weapon.name(), "Pistol");
        assert_eq!(weapon.current_ammo(), 12);
    }

    #[test]
    fn test_detach() {
        let mut mount = WeaponMount::new(Vec3::ZERO);
        assert!(!mount.detach());

        mount.attach(Some(&WeaponArchetype::rifle()));
        assert!(mount.detach());
        assert!(!mount.has_weapon());
        assert!(mount.status(0.0).is_none());
    }

    #[test]
    fn test_input_without_weapon_is_noop() {
        let mut mount = WeaponMount::new(Vec3::ZERO);
        let mut pool = ProjectilePool::new(2);
        let mut cues: Vec<WeaponCue> = Vec::new();

        assert!(mount.handle_fire_input(0.0, &mut pool, &mut cues).is_none());
        assert!(!mount.handle_reload_input(0.0, &mut cues));
        assert!(!mount.update(0.0, &mut cues));
        assert!(cues.is_empty());
        assert_eq!(pool.total_instances(), 0);
    }

    #[test]
    fn test_aim_follows_owner_transform() {
        let mut mount = WeaponMount::new(Vec3::new(0.3, 1.5, 0.0));
        let archetype = WeaponArchetype::new(WeaponProfile::default(), WeaponBehavior::Standard)
            .with_fire_point(Vec3::new(0.0, 0.0, -1.0));
        mount.attach(Some(&archetype));

        // Owner в (10, 0, 0), повёрнут на 90° вокруг Y (forward = -X)
        let transform = Transform::from_xyz(10.0, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        mount.aim(&transform);

        let muzzle = mount.weapon().unwrap().muzzle();
        assert!((muzzle.forward - Vec3::NEG_X).length() < 1e-5);
        assert!((muzzle.position - Vec3::new(9.0, 1.5, -0.3)).length() < 1e-5);
    }

    #[test]
    fn test_owner_propagates_to_cues() {
        let owner = Entity::from_raw(42);
        let mut mount = WeaponMount::new(Vec3::ZERO).with_owner(owner);
        let mut pool = ProjectilePool::new(2);
        let mut cues: Vec<WeaponCue> = Vec::new();

        mount.attach(Some(&WeaponArchetype::pistol()));
        let handle = mount
            .handle_fire_input(0.0, &mut pool, &mut cues)
            .and_then(|outcome| outcome.handle())
            .unwrap();

        assert_eq!(cues[0].shooter, Some(owner));
        assert_eq!(pool.get(handle).unwrap().shooter(), Some(owner));
    }

    #[test]
    fn test_status_snapshot() {
        let mut mount = WeaponMount::new(Vec3::ZERO);
        let mut pool = ProjectilePool::new(2);
        let mut cues: Vec<WeaponCue> = Vec::new();
        mount.attach(Some(&WeaponArchetype::pistol()));

        mount.handle_fire_input(0.0, &mut pool, &mut cues);
        let status = mount.status(0.1).unwrap();
        assert_eq!(status.name, "Pistol");
        assert_eq!(status.current_ammo, 11);
        assert_eq!(status.magazine_size, 12);
        assert!(!status.can_fire);
        assert!(status.cooldown_remaining > 0.0);

        mount.handle_reload_input(0.5, &mut cues);
        let status = mount.status(0.5).unwrap();
        assert!(status.is_reloading);
        assert_eq!(status.reload_progress, Some(0.0));
    }

    #[test]
    fn test_disabled_weapon_status() {
        let mut mount = WeaponMount::new(Vec3::ZERO);
        mount.attach(Some(&WeaponArchetype::rifle().without_fire_point()));

        let weapon = mount.weapon().unwrap();
        assert!(!weapon.is_initialized());
        assert!(!mount.status(0.0).unwrap().can_fire);
    }
}
