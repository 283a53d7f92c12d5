//! Projectile domain — pool + flight + hit detection
//!
//! Содержит:
//! - ProjectilePool (buckets по ProjectileTypeId, acquire/release)
//! - Projectile (один полёт: motion, swept + overlap hit detection, lifetime)
//! - ProjectileHit / ProjectileExpired events
//! - step_projectiles (FixedUpdate)

pub mod events;
pub mod flight;
pub mod pool;
pub mod systems;


pub use events::*;
pub use flight::*;
pub use pool::*;
pub use systems::*;
