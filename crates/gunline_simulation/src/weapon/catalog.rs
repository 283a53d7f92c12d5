//! WeaponCatalog — archetypes по имени (builtin presets или RON файл)
//!
//! Формат файла:
//! ```text
//! (
//!     projectiles: [
//!         (id: 3, lifetime: 2.0, collision_mask: 6, radius: 0.05, gravity_scale: 0.0),
//!     ],
//!     weapons: [
//!         (
//!             profile: (name: "Carbine", projectile_type: 3, fire_rate_rpm: 450.0),
//!             behavior: Rifle(full_auto: false, recoil_amount: 0.5),
//!             fire_point: Some((0.0, 0.05, -0.6)),
//!         ),
//!     ],
//! )
//! ```

use anyhow::{Context, Result};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::archetype::{WeaponArchetype, WeaponBehavior};
use super::profile::WeaponProfile;
use crate::logger::log_info;
use crate::projectile::{ProjectileKind, ProjectilePool};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogFile {
    projectiles: Vec<ProjectileKind>,
    weapons: Vec<WeaponEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeaponEntry {
    profile: WeaponProfile,
    #[serde(default)]
    behavior: WeaponBehavior,
    #[serde(default)]
    fire_point: Option<[f32; 3]>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponCatalog {
    archetypes: HashMap<String, WeaponArchetype>,
    projectile_kinds: Vec<ProjectileKind>,
}

impl WeaponCatalog {
    /// Rifle + pistol presets
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.insert(WeaponArchetype::rifle());
        catalog.insert(WeaponArchetype::pistol());
        catalog
    }

    pub fn from_ron_str(source: &str) -> Result<Self> {
        let file: CatalogFile =
            ron::from_str(source).context("failed to parse weapon catalog RON")?;

        let mut catalog = Self {
            archetypes: HashMap::new(),
            projectile_kinds: file
                .projectiles
                .into_iter()
                .map(ProjectileKind::sanitized)
                .collect(),
        };
        for entry in file.weapons {
            // WeaponArchetype::new clamp'ит profile к минимумам
            let mut archetype = WeaponArchetype::new(entry.profile, entry.behavior);
            archetype.fire_point = entry.fire_point.map(Vec3::from_array);
            catalog.insert(archetype);
        }

        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read weapon catalog {}", path.display()))?;
        let catalog = Self::from_ron_str(&source)
            .with_context(|| format!("invalid weapon catalog {}", path.display()))?;

        log_info(&format!(
            "📦 [WeaponCatalog] loaded {} weapons from {}",
            catalog.len(),
            path.display()
        ));
        Ok(catalog)
    }

    /// Ключ — имя профиля в lowercase (предыдущий archetype с тем же именем заменяется)
    pub fn insert(&mut self, archetype: WeaponArchetype) {
        self.archetypes
            .insert(archetype.name().to_lowercase(), archetype);
    }

    pub fn get(&self, name: &str) -> Option<&WeaponArchetype> {
        self.archetypes.get(&name.to_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.archetypes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn projectile_kinds(&self) -> &[ProjectileKind] {
        &self.projectile_kinds
    }

    /// Зарегистрировать projectile kinds каталога в pool (до первого acquire)
    pub fn register_projectile_kinds(&self, pool: &mut ProjectilePool) {
        for kind in &self.projectile_kinds {
            pool.register_kind(*kind);
        }
    }
}
