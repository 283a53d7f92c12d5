//! Simulation config + fixed-step clock
//!
//! `SimulationConfig` — tuning, читается один раз при старте.
//! `SimulationClock` — монотонное simulation time; все таймеры
//! (cooldown, reload, projectile lifetime) считаются от него, не от wall time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default pre-warm размер bucket'а (первый Acquire для нового типа)
pub const DEFAULT_POOL_PREWARM: usize = 50;

/// Segment короче этого не sweep'ается (projectile почти не сдвинулся)
pub const MIN_SWEEP_DISTANCE: f32 = 0.01;

/// Допуск сравнения deadline'ов (секунды). Длительности в профилях — f32,
/// после перевода в f64 `60/rpm` и `reload_duration` могут отличаться от
/// кратного tick'у времени на ~1e-7.
pub const TIME_EPSILON: f64 = 1e-6;

/// Наступил ли deadline (с допуском `TIME_EPSILON`)
pub fn deadline_reached(now: f64, deadline: f64) -> bool {
    now + TIME_EPSILON >= deadline
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed tick rate (Hz)
    pub tick_hz: f64,

    /// Ускорение свободного падения (м/с²), умножается на `ProjectileKind::gravity_scale`
    pub gravity: [f32; 3],

    /// Сколько инстансов создаётся при первом обращении к bucket'у
    pub pool_prewarm: usize,

    /// Минимальная длина segment'а для swept test (метры)
    pub min_sweep_distance: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            gravity: [0.0, -9.81, 0.0],
            pool_prewarm: DEFAULT_POOL_PREWARM,
            min_sweep_distance: MIN_SWEEP_DISTANCE,
        }
    }
}

impl SimulationConfig {
    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    /// Длина одного fixed tick (секунды)
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_hz.max(1.0)
    }
}

/// Simulation time: `tick * tick_seconds` в f64.
///
/// Время не накапливается суммой delta'ов: `now()` на tick N всегда
/// равен N/tick_hz, без дрейфа на длинных сессиях.
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct SimulationClock {
    pub tick: u64,
    /// Длина tick'а (секунды); 0 до первого advance
    pub tick_seconds: f64,
}

impl SimulationClock {
    pub fn advance(&mut self, tick_seconds: f64) {
        self.tick = self.tick.wrapping_add(1);
        self.tick_seconds = tick_seconds;
    }

    pub fn now(&self) -> f64 {
        self.tick as f64 * self.tick_seconds
    }

    /// dt для integration (f32, как вся геометрия)
    pub fn delta(&self) -> f32 {
        self.tick_seconds as f32
    }
}

/// System: advance clock (FixedUpdate, запускается ПЕРВЫМ)
pub fn advance_simulation_clock(
    mut clock: ResMut<SimulationClock>,
    config: Res<SimulationConfig>,
) {
    clock.advance(config.tick_seconds());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.pool_prewarm, 50);
        assert_eq!(config.gravity(), Vec3::new(0.0, -9.81, 0.0));
        assert!((config.tick_seconds() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_clock_advance() {
        let mut clock = SimulationClock::default();
        clock.advance(0.5);
        clock.advance(0.5);

        assert_eq!(clock.tick, 2);
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.delta(), 0.5);
    }

    #[test]
    fn test_clock_no_drift_over_long_session() {
        let config = SimulationConfig::default();
        let mut clock = SimulationClock::default();

        // 20 часов при 60 Hz
        for _ in 0..(20 * 3600 * 60) {
            clock.advance(config.tick_seconds());
        }

        assert!((clock.now() - 72_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_deadline_reached_tolerates_f32_durations() {
        // 1.7f32 в f64 = 1.70000004768…, tick 102 при 60 Hz = 1.7
        let deadline = 1.7f32 as f64;
        assert!(deadline_reached(102.0 / 60.0, deadline));
        assert!(!deadline_reached(101.0 / 60.0, deadline));
    }
}
