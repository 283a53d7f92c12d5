//! Weapon — fire-control state machine одного оружия
//!
//! Состояния: uninitialized → Idle ⇄ Reloading.
//! Cooldown и перезарядка — polled deadlines от simulation clock
//! (никаких таймеров/корутин: `update(now)` завершает reload когда пора).

use bevy::prelude::*;

use super::archetype::{HookContext, WeaponArchetype, WeaponHooks};
use super::cues::{CueKind, CueSink, WeaponCue};
use super::profile::{CueToken, WeaponProfile};
use crate::config::deadline_reached;
use crate::logger::{log, log_error, log_info};
use crate::projectile::{ProjectileHandle, ProjectilePool};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponState {
    Idle,
    Reloading { started_at: f64, completes_at: f64 },
}

/// Почему выстрел не состоялся (в порядке приоритета проверки)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRejection {
    /// Weapon не инициализирован (например нет fire point)
    NotInitialized,
    Reloading,
    /// Магазин пуст (эмитит Empty cue)
    Empty,
    /// Не прошло 60/rpm секунд с прошлого выстрела
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired(ProjectileHandle),
    Rejected(FireRejection),
}

impl FireOutcome {
    pub fn is_fired(&self) -> bool {
        matches!(self, FireOutcome::Fired(_))
    }

    pub fn handle(&self) -> Option<ProjectileHandle> {
        match self {
            FireOutcome::Fired(handle) => Some(*handle),
            FireOutcome::Rejected(_) => None,
        }
    }
}

/// World-space muzzle (обновляется mount'ом каждый tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub position: Vec3,
    /// Unit vector
    pub forward: Vec3,
}

impl Default for Muzzle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Weapon {
    archetype: WeaponArchetype,
    owner: Option<Entity>,
    current_ammo: u32,
    state: WeaponState,
    last_fire_at: Option<f64>,
    muzzle: Muzzle,
    initialized: bool,
}

impl Weapon {
    /// Новый weapon (ещё не инициализирован — `initialize()` перед стрельбой)
    pub fn new(archetype: WeaponArchetype) -> Self {
        Self {
            archetype,
            owner: None,
            current_ammo: 0,
            state: WeaponState::Idle,
            last_fire_at: None,
            muzzle: Muzzle::default(),
            initialized: false,
        }
    }

    pub fn with_owner(mut self, owner: Option<Entity>) -> Self {
        self.owner = owner;
        self
    }

    /// Полный магазин, Idle, cooldown сброшен.
    ///
    /// Вызывается при attach и может вызываться повторно: pending reload
    /// отменяется (deadline просто перезаписывается), события о нём не будет.
    /// Без fire point weapon остаётся disabled (возвращает false).
    pub fn initialize(&mut self) -> bool {
        if self.archetype.fire_point.is_none() {
            log_error(&format!(
                "❌ [Weapon] {}: fire point not assigned, weapon disabled",
                self.name()
            ));
            self.initialized = false;
            return false;
        }

        self.current_ammo = self.archetype.profile.magazine_size;
        self.state = WeaponState::Idle;
        self.last_fire_at = None;
        self.initialized = true;

        log_info(&format!(
            "🔫 [Weapon] {} initialized: {}/{} rounds",
            self.name(),
            self.current_ammo,
            self.magazine_size()
        ));
        true
    }

    pub fn archetype(&self) -> &WeaponArchetype {
        &self.archetype
    }

    pub fn profile(&self) -> &WeaponProfile {
        &self.archetype.profile
    }

    pub fn name(&self) -> &str {
        &self.archetype.profile.name
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<Entity>) {
        self.owner = owner;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn magazine_size(&self) -> u32 {
        self.archetype.profile.magazine_size
    }

    pub fn state(&self) -> WeaponState {
        self.state
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.state, WeaponState::Reloading { .. })
    }

    pub fn last_fire_at(&self) -> Option<f64> {
        self.last_fire_at
    }

    pub fn muzzle(&self) -> Muzzle {
        self.muzzle
    }

    /// Forward нормализуется; нулевой forward игнорируется (остаётся прежний)
    pub fn set_muzzle(&mut self, position: Vec3, forward: Vec3) {
        self.muzzle.position = position;
        let forward = forward.normalize_or_zero();
        if forward != Vec3::ZERO {
            self.muzzle.forward = forward;
        }
    }

    /// Секунды до конца cooldown (0 = можно стрелять)
    pub fn cooldown_remaining(&self, now: f64) -> f32 {
        match self.last_fire_at {
            Some(last) if !self.cooldown_elapsed(now) => {
                (last + self.profile().fire_interval() - now) as f32
            }
            _ => 0.0,
        }
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        match self.last_fire_at {
            Some(last) => deadline_reached(now, last + self.profile().fire_interval()),
            None => true,
        }
    }

    /// Прогресс перезарядки 0..1 (None — не перезаряжается)
    pub fn reload_progress(&self, now: f64) -> Option<f32> {
        match self.state {
            WeaponState::Reloading {
                started_at,
                completes_at,
            } => {
                let duration = (completes_at - started_at).max(f64::EPSILON);
                Some(((now - started_at) / duration).clamp(0.0, 1.0) as f32)
            }
            WeaponState::Idle => None,
        }
    }

    /// Все четыре условия выстрела сразу (без side effects)
    pub fn can_fire(&self, now: f64) -> bool {
        self.check_fire(now).is_none()
    }

    fn check_fire(&self, now: f64) -> Option<FireRejection> {
        if !self.initialized {
            Some(FireRejection::NotInitialized)
        } else if self.is_reloading() {
            Some(FireRejection::Reloading)
        } else if self.current_ammo == 0 {
            Some(FireRejection::Empty)
        } else if !self.cooldown_elapsed(now) {
            Some(FireRejection::Cooldown)
        } else {
            None
        }
    }

    /// Попытка выстрела.
    ///
    /// Порядок при успехе: before-fire hook → Fire cue → acquire из pool →
    /// place + initialize снаряда → ammo -1 → last fire time → after-fire hook.
    /// Empty cue эмитится при любом reject с пустым магазином вне перезарядки.
    pub fn fire(
        &mut self,
        now: f64,
        pool: &mut ProjectilePool,
        cues: &mut dyn CueSink,
    ) -> FireOutcome {
        if let Some(rejection) = self.check_fire(now) {
            if self.initialized && !self.is_reloading() && self.current_ammo == 0 {
                let token = self.profile().cues.empty.clone();
                cues.emit(self.cue(CueKind::Empty, token));
            }
            log(&format!(
                "[Weapon] {} fire rejected: {:?}",
                self.name(),
                rejection
            ));
            return FireOutcome::Rejected(rejection);
        }

        let behavior = self.archetype.behavior;
        behavior.on_before_fire(&mut self.hook_context(cues));

        let token = self.profile().cues.fire.clone();
        cues.emit(self.cue(CueKind::Fire, token));

        let profile = self.archetype.profile.clone();
        let handle = pool.acquire(profile.projectile_type);
        if let Some(projectile) = pool.get_mut(handle) {
            projectile.place(self.muzzle.position, self.owner);
            projectile.initialize(
                profile.damage,
                self.muzzle.forward * profile.muzzle_velocity,
                now,
            );
        }

        self.current_ammo -= 1;
        self.last_fire_at = Some(now);

        behavior.on_after_fire(&mut self.hook_context(cues));

        log(&format!(
            "💥 [Weapon] {} fired ({}/{})",
            self.name(),
            self.current_ammo,
            self.magazine_size()
        ));
        FireOutcome::Fired(handle)
    }

    /// Начать перезарядку. No-op (false) если уже перезаряжается или магазин полон.
    pub fn reload(&mut self, now: f64, cues: &mut dyn CueSink) -> bool {
        if !self.initialized || self.is_reloading() || self.current_ammo >= self.magazine_size() {
            return false;
        }

        self.state = WeaponState::Reloading {
            started_at: now,
            completes_at: now + self.profile().reload_duration as f64,
        };

        let token = self.profile().cues.reload_start.clone();
        cues.emit(self.cue(CueKind::ReloadStart, token));

        let behavior = self.archetype.behavior;
        behavior.on_reload_start(&mut self.hook_context(cues));

        log_info(&format!(
            "🔄 [Weapon] {} reloading ({:.1}s)",
            self.name(),
            self.profile().reload_duration
        ));
        true
    }

    /// Проверка reload deadline (каждый tick). true — перезарядка завершилась сейчас.
    pub fn update(&mut self, now: f64, cues: &mut dyn CueSink) -> bool {
        let WeaponState::Reloading { completes_at, .. } = self.state else {
            return false;
        };
        if !deadline_reached(now, completes_at) {
            return false;
        }

        self.current_ammo = self.magazine_size();
        self.state = WeaponState::Idle;

        let token = self.profile().cues.reload_complete.clone();
        cues.emit(self.cue(CueKind::ReloadComplete, token));

        let behavior = self.archetype.behavior;
        behavior.on_reload_complete(&mut self.hook_context(cues));

        log_info(&format!(
            "✅ [Weapon] {} reloaded: {}/{}",
            self.name(),
            self.current_ammo,
            self.magazine_size()
        ));
        true
    }

    fn cue(&self, kind: CueKind, token: Option<CueToken>) -> WeaponCue {
        WeaponCue {
            shooter: self.owner,
            kind,
            token,
            position: self.muzzle.position,
        }
    }

    fn hook_context<'a>(&'a self, cues: &'a mut dyn CueSink) -> HookContext<'a> {
        HookContext {
            weapon_name: &self.archetype.profile.name,
            shooter: self.owner,
            muzzle_position: self.muzzle.position,
            cues,
        }
    }
}
