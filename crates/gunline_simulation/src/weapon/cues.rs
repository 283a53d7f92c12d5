//! Weapon cues — события для audio/VFX/camera collaborator'ов
//!
//! Core никогда не играет звук и не рендерит эффект сам: он только
//! сообщает *что* произошло (best-effort, ошибки sink'а не возвращаются).

use bevy::prelude::*;

use super::profile::CueToken;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueKind {
    Fire,
    /// Попытка выстрела с пустым магазином (отдельно от silent cooldown reject)
    Empty,
    ReloadStart,
    ReloadComplete,
    /// Отдача после выстрела (camera collaborator)
    Recoil { amount: f32 },
}

/// Event: weapon cue (ECS → audio/VFX)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponCue {
    /// Владелец оружия (None — weapon без mount'а)
    pub shooter: Option<Entity>,

    pub kind: CueKind,

    /// Opaque token из WeaponProfile (None — для этого cue нет ассета)
    pub token: Option<CueToken>,

    /// Позиция muzzle на момент cue (3D audio)
    pub position: Vec3,
}

/// Куда weapon отправляет cues
pub trait CueSink {
    fn emit(&mut self, cue: WeaponCue);
}

impl CueSink for Vec<WeaponCue> {
    fn emit(&mut self, cue: WeaponCue) {
        self.push(cue);
    }
}

impl CueSink for EventWriter<'_, WeaponCue> {
    fn emit(&mut self, cue: WeaponCue) {
        self.write(cue);
    }
}

/// Sink, который всё выбрасывает (weapon без audio collaborator'а)
pub struct DiscardCues;

impl CueSink for DiscardCues {
    fn emit(&mut self, _cue: WeaponCue) {}
}
