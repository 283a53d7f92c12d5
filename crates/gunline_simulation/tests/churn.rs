//! Seeded randomized churn: ammo bounds + pool partition invariant
//!
//! Фиксированные seeds (ChaCha8) — прогоны воспроизводимы.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use gunline_simulation::weapon::DiscardCues;
use gunline_simulation::{
    ProjectileHandle, ProjectilePool, ProjectileTypeId, Weapon, WeaponArchetype, WeaponBehavior,
    WeaponProfile,
};

#[test]
fn test_ammo_never_exceeds_magazine_or_underflows() {
    for seed in [1u64, 7, 42, 1337] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pool = ProjectilePool::new(8);
        let mut weapon = Weapon::new(WeaponArchetype::new(
            WeaponProfile {
                magazine_size: 7,
                fire_rate_rpm: 900.0,
                reload_duration: 0.4,
                ..WeaponProfile::default()
            },
            WeaponBehavior::Standard,
        ));
        weapon.initialize();

        let mut now = 0.0f64;
        for _ in 0..2000 {
            now += rng.gen_range(0.0..0.1);
            match rng.gen_range(0..10) {
                0 => {
                    weapon.reload(now, &mut DiscardCues);
                }
                1 => {
                    weapon.initialize();
                }
                _ => {
                    weapon.fire(now, &mut pool, &mut DiscardCues);
                }
            }
            weapon.update(now, &mut DiscardCues);

            assert!(
                weapon.current_ammo() <= weapon.magazine_size(),
                "seed {}: ammo {} > magazine",
                seed,
                weapon.current_ammo()
            );
        }
    }
}

#[test]
fn test_pool_partition_under_random_acquire_release() {
    let kinds = [
        ProjectileTypeId::RIFLE_ROUND,
        ProjectileTypeId::PISTOL_ROUND,
        ProjectileTypeId(9),
    ];

    for seed in [3u64, 99, 2024] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pool = ProjectilePool::new(4);
        let mut live: Vec<ProjectileHandle> = Vec::new();
        let mut released: Vec<ProjectileHandle> = Vec::new();

        for _ in 0..3000 {
            match rng.gen_range(0..4) {
                0 | 1 => {
                    let kind = kinds[rng.gen_range(0..kinds.len())];
                    live.push(pool.acquire(kind));
                }
                2 if !live.is_empty() => {
                    let handle = live.swap_remove(rng.gen_range(0..live.len()));
                    assert!(pool.release(handle));
                    released.push(handle);
                }
                _ if !released.is_empty() => {
                    // Stale / double release — всегда no-op
                    let stale = released[rng.gen_range(0..released.len())];
                    assert!(!pool.release(stale));
                }
                _ => {}
            }

            assert!(pool.is_consistent(), "seed {}: partition broken", seed);
            assert_eq!(pool.active_count(), live.len());
        }

        assert_eq!(
            pool.active_count() + pool.inactive_count(),
            pool.total_instances()
        );
    }
}
