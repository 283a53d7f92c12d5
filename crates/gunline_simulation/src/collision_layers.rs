//! Collision Layers Constants
//!
//! Centralised layer bits для projectile queries.
//!
//! ## Архитектура:
//! - **Layer (битовая маска):** на каком слое находится collider
//! - **Mask (битовая маска):** какие слои projectile проверяет при sweep/overlap
//!
//! ## Layers:
//! - Layer 1 (0b1 = 1): Reserved
//! - Layer 2 (0b10 = 2): Actors (players, NPCs, targets)
//! - Layer 3 (0b100 = 4): Environment (walls, obstacles, terrain)
//! - Layer 4 (0b1000 = 8): Projectiles
//!
//! ```rust
//! use gunline_simulation::collision_layers::*;
//!
//! let mask = COLLISION_MASK_PROJECTILES;
//! assert!(layer_in_mask(COLLISION_LAYER_ENVIRONMENT, mask));
//! assert!(!layer_in_mask(COLLISION_LAYER_PROJECTILES, mask));
//! ```

/// Layer 2: Actors
pub const COLLISION_LAYER_ACTORS: u32 = 0b10; // 2

/// Layer 3: Environment
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100; // 4

/// Layer 4: Projectiles
pub const COLLISION_LAYER_PROJECTILES: u32 = 0b1000; // 8

/// Mask: Projectiles collide with Actors + Environment
///
/// НЕ коллидируют с другими projectiles (слой 4 отсутствует в маске).
pub const COLLISION_MASK_PROJECTILES: u32 = COLLISION_LAYER_ACTORS | COLLISION_LAYER_ENVIRONMENT;

/// Collider на слое `layer` попадает под `mask`?
pub fn layer_in_mask(layer: u32, mask: u32) -> bool {
    layer & mask != 0
}

/// Получить название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_ACTORS => "Actors",
        COLLISION_LAYER_ENVIRONMENT => "Environment",
        COLLISION_LAYER_PROJECTILES => "Projectiles",
        _ => "Unknown",
    }
}
