//! Input capability — откуда weapon systems берут trigger/reload
//!
//! Core не читает устройства сам: host (клиент, AI, replay) реализует
//! `InputSource`, а `WeaponInput` компонент хранит sampled состояние тика.

use bevy::prelude::*;

/// Queries, которые предоставляет input provider
pub trait InputSource {
    fn horizontal(&self) -> f32;
    fn vertical(&self) -> f32;
    fn jump_pressed(&self) -> bool;
    fn mouse_x(&self) -> f32;
    fn mouse_y(&self) -> f32;
    /// Level: trigger зажат
    fn fire_held(&self) -> bool;
    /// Edge: reload нажат в этом tick'е
    fn reload_pressed(&self) -> bool;
}

/// Sampled weapon input одного shooter'а
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponInput {
    pub fire_held: bool,
    pub reload_pressed: bool,
    fire_was_held: bool,
}

impl WeaponInput {
    /// Прочитать source (reload edge накапливается до `end_tick`)
    pub fn sample(&mut self, source: &dyn InputSource) {
        self.fire_held = source.fire_held();
        self.reload_pressed |= source.reload_pressed();
    }

    pub fn press_reload(&mut self) {
        self.reload_pressed = true;
    }

    /// Rising edge trigger'а (для semi-auto)
    pub fn fire_just_pressed(&self) -> bool {
        self.fire_held && !self.fire_was_held
    }

    /// Стрелять ли в этом tick'е при данном trigger mode
    pub fn wants_fire(&self, full_auto: bool) -> bool {
        if full_auto {
            self.fire_held
        } else {
            self.fire_just_pressed()
        }
    }

    /// Reload edge (consume — не повторяется в следующих tick'ах)
    pub fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_pressed)
    }

    /// Конец tick'а: запомнить fire level, сбросить reload edge
    pub fn end_tick(&mut self) {
        self.fire_was_held = self.fire_held;
        self.reload_pressed = false;
    }
}

/// Один кадр scripted input'а
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub horizontal: f32,
    pub vertical: f32,
    pub jump: bool,
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub fire: bool,
    pub reload: bool,
}

impl InputFrame {
    pub fn fire() -> Self {
        Self {
            fire: true,
            ..Self::default()
        }
    }

    pub fn reload() -> Self {
        Self {
            reload: true,
            ..Self::default()
        }
    }
}

/// Replay фиксированного списка кадров (headless driver, тесты).
/// После последнего кадра — пустой input.
#[derive(Component, Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<InputFrame>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(frames: Vec<InputFrame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Добавить `count` одинаковых кадров
    pub fn repeat(mut self, frame: InputFrame, count: usize) -> Self {
        self.frames
            .extend(std::iter::repeat(frame).take(count));
        self
    }

    pub fn current(&self) -> InputFrame {
        self.frames.get(self.cursor).copied().unwrap_or_default()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.frames.len() {
            self.cursor += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn horizontal(&self) -> f32 {
        self.current().horizontal
    }

    fn vertical(&self) -> f32 {
        self.current().vertical
    }

    fn jump_pressed(&self) -> bool {
        self.current().jump
    }

    fn mouse_x(&self) -> f32 {
        self.current().mouse_x
    }

    fn mouse_y(&self) -> f32 {
        self.current().mouse_y
    }

    fn fire_held(&self) -> bool {
        self.current().fire
    }

    fn reload_pressed(&self) -> bool {
        self.current().reload
    }
}

/// System: scripted input → WeaponInput (один кадр за tick)
pub fn sample_scripted_input(mut query: Query<(&mut ScriptedInput, &mut WeaponInput)>) {
    for (mut script, mut input) in query.iter_mut() {
        input.sample(&*script);
        script.advance();
    }
}
