//! Pointer drag with inertia.
//!
//! A drag steers rotation about X (vertical movement) and Y (horizontal
//! movement). After release the last drag delta keeps spinning the object,
//! decaying every frame until it reaches the idle spin, which is then held
//! so the object never comes to rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Radians of rotation per pixel of pointer travel.
    pub sensitivity: f32,
    /// Per-frame velocity multiplier while coasting, in `(0, 1)`.
    pub damping: f32,
    /// Spin about X and Y in radians per frame once coasting has settled.
    pub idle_spin: [f32; 2],
}

impl DragConfig {
    pub fn idle_velocity(&self) -> Vec2 {
        Vec2::from_array(self.idle_spin)
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.01,
            damping: 0.98,
            idle_spin: [0.2 / 60.0, 0.3 / 60.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Never dragged; rotation follows the clock.
    Untouched,
    Dragging,
    /// Released, residual velocity decaying.
    Coasting,
    /// Settled on the idle spin.
    Idle,
}

/// Pointer interaction state of one mounted scene.
#[derive(Debug, Clone)]
pub struct DragState {
    config: DragConfig,
    phase: DragPhase,
    last_position: Vec2,
    /// Rotation about (X, Y) in radians per frame.
    velocity: Vec2,
}

impl DragState {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: DragPhase::Untouched,
            last_position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Magnitude the residual velocity settles at.
    pub fn idle_floor(&self) -> f32 {
        self.config.idle_velocity().length()
    }

    pub fn press(&mut self, position: Vec2) {
        self.phase = DragPhase::Dragging;
        self.last_position = position;
        self.velocity = Vec2::ZERO;
    }

    /// Rotation to apply for a pointer move, `None` unless dragging.
    pub fn move_to(&mut self, position: Vec2) -> Option<Vec2> {
        if !self.is_dragging() {
            return None;
        }

        let delta = position - self.last_position;
        let rotation = Vec2::new(delta.y, delta.x) * self.config.sensitivity;

        self.velocity = rotation;
        self.last_position = position;
        Some(rotation)
    }

    /// End of drag by release or by the pointer leaving the surface.
    pub fn release(&mut self) {
        if !self.is_dragging() {
            return;
        }

        self.phase = DragPhase::Coasting;
        if self.velocity.length() <= self.idle_floor() {
            self.settle();
        }
    }

    /// Rotation increment for the next frame. `None` while the clock or the
    /// drag handlers own the rotation.
    pub fn step(&mut self) -> Option<Vec2> {
        match self.phase {
            DragPhase::Untouched | DragPhase::Dragging => None,
            DragPhase::Coasting => {
                self.velocity *= self.config.damping;
                if self.velocity.length() <= self.idle_floor() {
                    self.settle();
                }
                Some(self.velocity)
            }
            DragPhase::Idle => Some(self.velocity),
        }
    }

    fn settle(&mut self) {
        self.phase = DragPhase::Idle;
        self.velocity = self.config.idle_velocity();
    }
}

impl Default for DragState {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}
