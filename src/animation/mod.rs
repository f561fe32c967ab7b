//! Time-driven animation of the scene's transform array.
//!
//! Every rotation and oscillating coordinate is a pure function of elapsed
//! time, so pausing, skipping frames or varying the refresh rate never
//! accumulates drift.

pub mod drag;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::{ObjectId, Scene};

pub use drag::{DragConfig, DragPhase, DragState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    pub fn eval(self, phase: f32) -> f32 {
        match self {
            Wave::Sin => phase.sin(),
            Wave::Cos => phase.cos(),
        }
    }
}

/// One coordinate swinging around `offset`. Positions are overwritten by it,
/// rotations have it added to their spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub axis: Axis,
    pub wave: Wave,
    pub amplitude: f32,
    /// Angular frequency in rad/s.
    pub frequency: f32,
    #[serde(default)]
    pub offset: f32,
}

impl Oscillation {
    pub fn sample(&self, time: f32) -> f32 {
        self.offset + self.amplitude * self.wave.eval(self.frequency * time)
    }
}

/// Per-object animation parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationTrack {
    /// Rotation rate per Euler axis in rad/s.
    pub spin: Vec3,
    pub oscillations: Vec<Oscillation>,
    /// Rotation sway, in radians, on top of `spin`.
    pub wobble: Vec<Oscillation>,
}

impl AnimationTrack {
    pub fn spinning(spin: Vec3) -> Self {
        Self {
            spin,
            ..Self::default()
        }
    }

    pub fn with_oscillation(mut self, oscillation: Oscillation) -> Self {
        self.oscillations.push(oscillation);
        self
    }

    pub fn with_wobble(mut self, wobble: Oscillation) -> Self {
        self.wobble.push(wobble);
        self
    }

    pub fn is_static(&self) -> bool {
        self.spin == Vec3::ZERO && self.oscillations.is_empty() && self.wobble.is_empty()
    }

    /// Euler rotation for elapsed time `time`, before the object's base rotation.
    pub fn rotation_at(&self, time: f32) -> Vec3 {
        let mut rotation = self.spin * time;
        for wobble in &self.wobble {
            rotation[wobble.axis.index()] += wobble.sample(time);
        }
        rotation
    }
}

/// Rotation axes of one object that the clock must leave alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationHold {
    pub object: ObjectId,
    pub axes: [bool; 3],
}

impl RotationHold {
    /// Hold X and Y, the axes a pointer drag steers.
    pub fn drag(object: ObjectId) -> Self {
        Self {
            object,
            axes: [true, true, false],
        }
    }
}

/// Advances the scene's transforms from elapsed time. Tracks are indexed by [`ObjectId`].
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    tracks: Vec<AnimationTrack>,
}

impl AnimationDriver {
    pub fn new(tracks: Vec<AnimationTrack>) -> Self {
        Self { tracks }
    }

    pub fn push(&mut self, track: AnimationTrack) {
        self.tracks.push(track);
    }

    pub fn track(&self, id: ObjectId) -> Option<&AnimationTrack> {
        self.tracks.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Write every animated transform for elapsed time `time` (seconds since mount).
    pub fn apply(&self, scene: &mut Scene, time: f32, hold: Option<RotationHold>) {
        let objects = scene.objects.iter();
        let transforms = scene.transforms.iter_mut();

        for (index, ((object, transform), track)) in
            objects.zip(transforms).zip(&self.tracks).enumerate()
        {
            if track.is_static() {
                continue;
            }

            let held = hold
                .filter(|h| h.object.index() == index)
                .map_or([false; 3], |h| h.axes);

            let rotation = object.base.rotation + track.rotation_at(time);
            for axis in 0..3 {
                if !held[axis] {
                    transform.rotation[axis] = rotation[axis];
                }
            }

            transform.position = object.base.position;
            for oscillation in &track.oscillations {
                transform.position[oscillation.axis.index()] = oscillation.sample(time);
            }
        }
    }
}
