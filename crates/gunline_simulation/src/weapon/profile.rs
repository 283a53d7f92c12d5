//! WeaponProfile — immutable parameter bundle одного weapon archetype
//!
//! Загружается один раз (preset или catalog file), clamp'ится к минимумам,
//! дальше только читается (shared через `Arc`).

use serde::{Deserialize, Serialize};

use crate::projectile::ProjectileTypeId;

/// Opaque token для audio/VFX collaborator'а (имя клипа, id события и т.п.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueToken(pub String);

impl CueToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

/// Tokens для четырёх weapon cues (None = у оружия нет такого звука)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueTokens {
    pub fire: Option<CueToken>,
    pub reload_start: Option<CueToken>,
    pub reload_complete: Option<CueToken>,
    pub empty: Option<CueToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponProfile {
    pub name: String,

    /// Из какого pool bucket'а брать снаряды
    pub projectile_type: ProjectileTypeId,

    /// Начальная скорость (м/с), ≥ 0
    pub muzzle_velocity: f32,

    /// Урон за попадание, ≥ 0
    pub damage: f32,

    /// Rounds per minute, ≥ 1
    pub fire_rate_rpm: f32,

    /// Ёмкость магазина, ≥ 1
    pub magazine_size: u32,

    /// Длительность перезарядки (секунды), ≥ 0.1
    pub reload_duration: f32,

    pub cues: CueTokens,
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self {
            name: "New Weapon".to_string(),
            projectile_type: ProjectileTypeId::RIFLE_ROUND,
            muzzle_velocity: 400.0,
            damage: 25.0,
            fire_rate_rpm: 600.0,
            magazine_size: 30,
            reload_duration: 2.5,
            cues: CueTokens::default(),
        }
    }
}

impl WeaponProfile {
    pub const MIN_FIRE_RATE_RPM: f32 = 1.0;
    pub const MIN_MAGAZINE_SIZE: u32 = 1;
    pub const MIN_RELOAD_DURATION: f32 = 0.1;

    /// Clamp всех числовых полей к минимумам (NaN → минимум)
    pub fn sanitized(mut self) -> Self {
        self.muzzle_velocity = clamp_min(self.muzzle_velocity, 0.0);
        self.damage = clamp_min(self.damage, 0.0);
        self.fire_rate_rpm = clamp_min(self.fire_rate_rpm, Self::MIN_FIRE_RATE_RPM);
        self.magazine_size = self.magazine_size.max(Self::MIN_MAGAZINE_SIZE);
        self.reload_duration = clamp_min(self.reload_duration, Self::MIN_RELOAD_DURATION);
        self
    }

    /// Минимальный интервал между выстрелами (секунды)
    pub fn fire_interval(&self) -> f64 {
        60.0 / self.fire_rate_rpm as f64
    }

    /// Автомат (defaults совпадают с `Default`)
    pub fn rifle() -> Self {
        Self {
            name: "Rifle".to_string(),
            projectile_type: ProjectileTypeId::RIFLE_ROUND,
            cues: CueTokens {
                fire: Some(CueToken::new("rifle_fire")),
                reload_start: Some(CueToken::new("rifle_reload_start")),
                reload_complete: Some(CueToken::new("rifle_reload_complete")),
                empty: Some(CueToken::new("dry_fire")),
            },
            ..Self::default()
        }
    }

    pub fn pistol() -> Self {
        Self {
            name: "Pistol".to_string(),
            projectile_type: ProjectileTypeId::PISTOL_ROUND,
            muzzle_velocity: 300.0,
            damage: 15.0,
            fire_rate_rpm: 300.0,
            magazine_size: 12,
            reload_duration: 1.5,
            cues: CueTokens {
                fire: Some(CueToken::new("pistol_fire")),
                reload_start: Some(CueToken::new("pistol_reload_start")),
                reload_complete: Some(CueToken::new("pistol_reload_complete")),
                empty: Some(CueToken::new("dry_fire")),
            },
        }
    }
}

fn clamp_min(value: f32, min: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.max(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_clamps_minimums() {
        let profile = WeaponProfile {
            muzzle_velocity: -5.0,
            damage: f32::NAN,
            fire_rate_rpm: 0.0,
            magazine_size: 0,
            reload_duration: 0.0,
            ..WeaponProfile::default()
        }
        .sanitized();

        assert_eq!(profile.muzzle_velocity, 0.0);
        assert_eq!(profile.damage, 0.0);
        assert_eq!(profile.fire_rate_rpm, 1.0);
        assert_eq!(profile.magazine_size, 1);
        assert_eq!(profile.reload_duration, 0.1);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let rifle = WeaponProfile::rifle();
        assert_eq!(rifle.clone().sanitized(), rifle);
    }

    #[test]
    fn test_fire_interval_from_rpm() {
        let profile = WeaponProfile {
            fire_rate_rpm: 600.0,
            ..WeaponProfile::default()
        };
        assert!((profile.fire_interval() - 0.1).abs() < 1e-12);
    }
}
