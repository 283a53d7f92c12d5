//! Weapon domain — profile, fire control, mount
//!
//! Содержит:
//! - WeaponProfile (immutable параметры archetype'а)
//! - WeaponArchetype + WeaponBehavior (variant hooks: Standard / Rifle)
//! - Weapon (ammo, cooldown, reload state machine)
//! - WeaponMount (component: владеет weapon, forward'ит input)
//! - WeaponCue + CueSink (audio/VFX/camera collaborators)
//! - WeaponCatalog (builtin presets / RON)

pub mod archetype;
pub mod catalog;
pub mod cues;
pub mod mount;
pub mod profile;
pub mod state;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod mount_tests;

pub use archetype::*;
pub use catalog::*;
pub use cues::*;
pub use mount::*;
pub use profile::*;
pub use state::*;
pub use systems::*;
