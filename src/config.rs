//! Literal scene configuration.
//!
//! Shapes, materials, lights and animation rates are static data, not
//! computed. Two variants ship built in ([`SceneConfig::hero`] and
//! [`SceneConfig::starfield`]); any other arrangement can be supplied as a
//! JSON file with the same shape.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationTrack, Axis, DragConfig, Oscillation, Wave};
use crate::errors::SceneError;
use crate::scene::{Distortion, Emissive, Light, Material, SceneObject, Shape, Transform};
use crate::theme::{Color, Palette};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub background: Palette,
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub particles: Option<ParticleConfig>,
    #[serde(default)]
    pub drag: DragConfig,
    /// Name of the object steered by pointer drag.
    #[serde(default)]
    pub drag_target: Option<String>,
    #[serde(default)]
    pub model: Option<ModelConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit speed in the orbit-controls convention: 1.0 is one turn per minute.
    pub auto_rotate_speed: f32,
}

impl CameraConfig {
    /// Orbit rate in rad/s.
    pub fn orbit_rate(&self) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 8.0],
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            auto_rotate_speed: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
}

impl ShapeConfig {
    pub fn to_shape(self) -> Shape {
        match self {
            ShapeConfig::Sphere {
                radius,
                width_segments,
                height_segments,
            } => Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            },
            ShapeConfig::Box {
                width,
                height,
                depth,
            } => Shape::Box {
                width,
                height,
                depth,
            },
            ShapeConfig::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => Shape::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistortionConfig {
    pub amount: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    pub color: Color,
    /// Colour under the light theme; defaults to `color`.
    #[serde(default)]
    pub light_color: Option<Color>,
    pub metalness: f32,
    pub roughness: f32,
    #[serde(default)]
    pub emissive_intensity: Option<f32>,
    #[serde(default)]
    pub distortion: Option<DistortionConfig>,
    #[serde(default = "opaque")]
    pub opacity: f32,
}

fn opaque() -> f32 {
    1.0
}

fn unit_scale() -> f32 {
    1.0
}

impl MaterialConfig {
    pub fn new(color: Color, light_color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            light_color: Some(light_color),
            metalness,
            roughness,
            emissive_intensity: None,
            distortion: None,
            opacity: 1.0,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::new(self.color, self.light_color.unwrap_or(self.color))
    }

    pub fn to_material(&self) -> Material {
        let mut material = Material::new(self.palette(), self.metalness, self.roughness);
        material.emissive = self.emissive_intensity.map(|intensity| Emissive { intensity });
        material.distortion = self.distortion.map(|d| Distortion {
            amount: d.amount,
            speed: d.speed,
        });
        material.opacity = self.opacity;
        material
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    pub shape: ShapeConfig,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: f32,
    pub material: MaterialConfig,
    /// Rotation rate per axis in rad/s.
    #[serde(default)]
    pub spin: [f32; 3],
    #[serde(default)]
    pub oscillations: Vec<Oscillation>,
    /// Rotation sway added to `spin`.
    #[serde(default)]
    pub wobble: Vec<Oscillation>,
}

impl ObjectConfig {
    pub fn to_object(&self) -> (SceneObject, AnimationTrack) {
        let base = Transform {
            position: Vec3::from_array(self.position),
            rotation: Vec3::from_array(self.rotation),
            scale: self.scale,
        };
        let object = SceneObject {
            name: self.name.clone(),
            shape: self.shape.to_shape(),
            material: self.material.to_material(),
            base,
        };
        let track = AnimationTrack {
            spin: Vec3::from_array(self.spin),
            oscillations: self.oscillations.clone(),
            wobble: self.wobble.clone(),
        };
        (object, track)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightConfig {
    Ambient {
        #[serde(default = "white")]
        color: Color,
        intensity: f32,
    },
    Directional {
        position: [f32; 3],
        #[serde(default = "white")]
        color: Color,
        intensity: f32,
    },
    Point {
        position: [f32; 3],
        #[serde(default = "white")]
        color: Color,
        intensity: f32,
    },
    Spot {
        position: [f32; 3],
        #[serde(default = "white")]
        color: Color,
        intensity: f32,
        angle: f32,
    },
}

fn white() -> Color {
    Color::WHITE
}

impl LightConfig {
    pub fn to_light(self) -> Light {
        match self {
            LightConfig::Ambient { color, intensity } => Light::Ambient { color, intensity },
            LightConfig::Directional {
                position,
                color,
                intensity,
            } => Light::Directional {
                position: Vec3::from_array(position),
                color,
                intensity,
            },
            LightConfig::Point {
                position,
                color,
                intensity,
            } => Light::Point {
                position: Vec3::from_array(position),
                color,
                intensity,
            },
            LightConfig::Spot {
                position,
                color,
                intensity,
                angle,
            } => Light::Spot {
                position: Vec3::from_array(position),
                color,
                intensity,
                angle,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub count: usize,
    /// Edge length of the cube the points are scattered in.
    pub extent: f32,
    pub color: Color,
    #[serde(default)]
    pub light_color: Option<Color>,
    pub size: f32,
    pub opacity: f32,
}

impl ParticleConfig {
    pub const MAX_COUNT: usize = 1_000_000;

    pub fn palette(&self) -> Palette {
        Palette::new(self.color, self.light_color.unwrap_or(self.color))
    }
}

/// Optional model loaded after mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub position: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub spin: [f32; 3],
    pub material: MaterialConfig,
}

impl ModelConfig {
    pub fn transform(&self) -> Transform {
        Transform::at(Vec3::from_array(self.position)).with_scale(self.scale)
    }

    pub fn track(&self) -> AnimationTrack {
        AnimationTrack::spinning(Vec3::from_array(self.spin))
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            position: [0.0, -2.5, 3.0],
            scale: 1.0,
            spin: [0.0, 0.3, 0.0],
            material: MaterialConfig::new(hex(0xCBD5E1), hex(0x475569), 0.6, 0.35),
        }
    }
}

fn hex(rgb: u32) -> Color {
    Color([
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
    ])
}

fn bob(axis: Axis, wave: Wave, amplitude: f32, frequency: f32, offset: f32) -> Oscillation {
    Oscillation {
        axis,
        wave,
        amplitude,
        frequency,
        offset,
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> ShapeConfig {
    ShapeConfig::Sphere {
        radius,
        width_segments,
        height_segments,
    }
}

fn cube(edge: f32) -> ShapeConfig {
    ShapeConfig::Box {
        width: edge,
        height: edge,
        depth: edge,
    }
}

fn torus(radius: f32, tube: f32) -> ShapeConfig {
    ShapeConfig::Torus {
        radius,
        tube,
        radial_segments: 16,
        tubular_segments: 100,
    }
}

/// Gentle sway of a floating object: `speed` scales its frequency and
/// `intensity` its amplitude.
fn float_sway(speed: f32, intensity: f32) -> Vec<Oscillation> {
    let frequency = speed / 4.0;
    vec![
        bob(Axis::X, Wave::Cos, intensity / 8.0, frequency, 0.0),
        bob(Axis::Y, Wave::Sin, intensity / 8.0, frequency, 0.0),
        bob(Axis::Z, Wave::Sin, intensity / 20.0, frequency, 0.0),
    ]
}

fn glowing(mut material: MaterialConfig) -> MaterialConfig {
    material.emissive_intensity = Some(0.2);
    material
}

impl SceneConfig {
    /// The hero background: a distorted core sphere ringed by boxes, tori
    /// and small glowing orbs in a faint particle haze.
    pub fn hero() -> Self {
        let core = ObjectConfig {
            name: "core".into(),
            shape: sphere(1.0, 100, 200),
            position: [0.0, 0.0, 0.0],
            rotation: [0.0; 3],
            scale: 2.5,
            material: MaterialConfig {
                distortion: Some(DistortionConfig {
                    amount: 0.5,
                    speed: 2.0,
                }),
                ..MaterialConfig::new(hex(0x5B8ADF), hex(0x3B5FC0), 0.8, 0.1)
            },
            spin: [0.2, 0.3, 0.0],
            wobble: float_sway(2.0, 0.5),
            oscillations: vec![bob(Axis::Y, Wave::Sin, 0.05, 0.5, 0.0)],
        };

        let objects = vec![
            core,
            ObjectConfig {
                name: "box-1".into(),
                shape: cube(0.8),
                position: [-4.0, 0.0, -2.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: MaterialConfig::new(hex(0x8B9CE8), hex(0x5A6BD8), 0.8, 0.2),
                spin: [0.5, 0.3, 0.0],
                wobble: Vec::new(),
                oscillations: vec![bob(Axis::Y, Wave::Sin, 0.5, 0.5, 0.0)],
            },
            ObjectConfig {
                name: "box-2".into(),
                shape: cube(0.6),
                position: [4.0, 1.0, -1.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: MaterialConfig::new(hex(0xA78BFA), hex(0x7C3AED), 0.7, 0.3),
                spin: [0.3, 0.0, 0.4],
                wobble: Vec::new(),
                oscillations: vec![bob(Axis::Y, Wave::Cos, 0.5, 0.6, 0.0)],
            },
            ObjectConfig {
                name: "box-3".into(),
                shape: cube(0.5),
                position: [-3.0, -2.0, 0.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: MaterialConfig::new(hex(0x60A5FA), hex(0x2563EB), 0.9, 0.1),
                spin: [0.0, 0.4, 0.2],
                wobble: Vec::new(),
                oscillations: vec![bob(Axis::Y, Wave::Sin, 0.5, 0.7, 0.0)],
            },
            ObjectConfig {
                name: "torus-1".into(),
                shape: torus(0.6, 0.2),
                position: [3.0, -1.0, -3.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: MaterialConfig::new(hex(0xC084FC), hex(0x9333EA), 0.8, 0.2),
                spin: [0.6, 0.4, 0.0],
                wobble: Vec::new(),
                oscillations: vec![bob(Axis::X, Wave::Sin, 2.0, 0.3, 0.0)],
            },
            ObjectConfig {
                name: "torus-2".into(),
                shape: torus(0.5, 0.15),
                position: [-3.0, 2.0, -2.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: MaterialConfig::new(hex(0x818CF8), hex(0x4F46E5), 0.7, 0.3),
                spin: [0.4, 0.0, 0.5],
                wobble: Vec::new(),
                oscillations: vec![bob(Axis::X, Wave::Cos, 2.0, 0.4, 0.0)],
            },
            ObjectConfig {
                name: "orb-1".into(),
                shape: sphere(0.3, 32, 32),
                position: [2.0, 2.0, -4.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: glowing(MaterialConfig::new(hex(0x7DD3FC), hex(0x0EA5E9), 0.9, 0.1)),
                spin: [0.0; 3],
                wobble: Vec::new(),
                oscillations: vec![
                    bob(Axis::Y, Wave::Sin, 1.5, 0.8, 2.0),
                    bob(Axis::X, Wave::Cos, 3.0, 0.5, 0.0),
                ],
            },
            ObjectConfig {
                name: "orb-2".into(),
                shape: sphere(0.25, 32, 32),
                position: [-2.0, -1.0, -3.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: glowing(MaterialConfig::new(hex(0xF0ABFC), hex(0xD946EF), 0.9, 0.1)),
                spin: [0.0; 3],
                wobble: Vec::new(),
                oscillations: vec![
                    bob(Axis::Y, Wave::Cos, 1.5, 0.6, -1.0),
                    bob(Axis::X, Wave::Sin, 3.0, 0.7, 0.0),
                ],
            },
            ObjectConfig {
                name: "orb-3".into(),
                shape: sphere(0.35, 32, 32),
                position: [0.0, 1.0, -5.0],
                rotation: [0.0; 3],
                scale: 1.0,
                material: glowing(MaterialConfig::new(hex(0xA5B4FC), hex(0x6366F1), 0.9, 0.1)),
                spin: [0.0; 3],
                wobble: Vec::new(),
                oscillations: vec![
                    bob(Axis::Y, Wave::Sin, 1.5, 0.9, 0.0),
                    bob(Axis::Z, Wave::Cos, 2.0, 0.6, 0.0),
                ],
            },
        ];

        let lights = vec![
            LightConfig::Ambient {
                color: Color::WHITE,
                intensity: 0.5,
            },
            LightConfig::Directional {
                position: [10.0, 10.0, 5.0],
                color: Color::WHITE,
                intensity: 1.0,
            },
            LightConfig::Point {
                position: [-10.0, -10.0, -5.0],
                color: hex(0x8B9CE8),
                intensity: 0.8,
            },
            LightConfig::Point {
                position: [10.0, -10.0, -5.0],
                color: hex(0xA78BFA),
                intensity: 0.6,
            },
            LightConfig::Spot {
                position: [0.0, 10.0, 0.0],
                color: hex(0x60A5FA),
                intensity: 0.5,
                angle: 0.3,
            },
        ];

        Self {
            camera: CameraConfig::default(),
            background: Palette::new(hex(0x0B0F1A), hex(0xF8FAFC)),
            objects,
            lights,
            particles: Some(ParticleConfig {
                count: 150,
                extent: 15.0,
                color: hex(0x8B9CE8),
                light_color: Some(hex(0x6366F1)),
                size: 0.05,
                opacity: 0.6,
            }),
            drag: DragConfig::default(),
            drag_target: Some("core".into()),
            model: None,
        }
    }

    /// A dense starfield around a single slowly turning sphere.
    pub fn starfield() -> Self {
        Self {
            camera: CameraConfig {
                far: 5000.0,
                auto_rotate_speed: 0.1,
                ..CameraConfig::default()
            },
            background: Palette::new(hex(0x000000), hex(0xE2E8F0)),
            objects: vec![ObjectConfig {
                name: "planet".into(),
                shape: sphere(1.0, 64, 64),
                position: [0.0, 0.0, 0.0],
                rotation: [0.0; 3],
                scale: 2.0,
                material: MaterialConfig::new(hex(0x5B8ADF), hex(0x1E3A8A), 0.4, 0.6),
                spin: [0.0, 0.1, 0.0],
                wobble: Vec::new(),
                oscillations: Vec::new(),
            }],
            lights: vec![
                LightConfig::Ambient {
                    color: Color::WHITE,
                    intensity: 0.3,
                },
                LightConfig::Directional {
                    position: [5.0, 3.0, 5.0],
                    color: Color::WHITE,
                    intensity: 1.2,
                },
            ],
            particles: Some(ParticleConfig {
                count: 20_000,
                extent: 4000.0,
                color: Color::WHITE,
                light_color: Some(hex(0x334155)),
                size: 1.0,
                opacity: 0.9,
            }),
            drag: DragConfig::default(),
            drag_target: Some("planet".into()),
            model: None,
        }
    }

    /// Read a JSON configuration file and validate it.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene config {path:?}"))?;
        let config: SceneConfig = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scene config {path:?}"))?;
        config.validate()?;
        log::info!("loaded scene config {path:?} ({} objects)", config.objects.len());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |msg: String| Err(SceneError::InvalidConfig(msg));

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid(format!("camera fov {} out of (0, 180)", camera.fov_degrees));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return invalid(format!("camera clip range {}..{}", camera.near, camera.far));
        }

        if let Some(target) = &self.drag_target {
            if !self.objects.iter().any(|o| &o.name == target) {
                return invalid(format!("drag target {target:?} names no object"));
            }
        }
        if !(self.drag.damping > 0.0 && self.drag.damping < 1.0) {
            return invalid(format!("drag damping {} out of (0, 1)", self.drag.damping));
        }
        if !(self.drag.sensitivity > 0.0 && self.drag.sensitivity.is_finite()) {
            return invalid(format!("drag sensitivity {} must be positive", self.drag.sensitivity));
        }
        // A zero idle spin would let coasting decay to a standstill.
        let idle = self.drag.idle_velocity().length();
        if !(idle > 0.0 && idle.is_finite()) {
            return invalid(format!("drag idle spin {:?} must be non-zero", self.drag.idle_spin));
        }

        for object in &self.objects {
            if !(object.scale > 0.0 && object.scale.is_finite()) {
                return invalid(format!("object {:?} has scale {}", object.name, object.scale));
            }
        }

        if let Some(particles) = &self.particles {
            if particles.count > ParticleConfig::MAX_COUNT {
                return invalid(format!("{} particles exceeds the limit", particles.count));
            }
            if !(particles.extent > 0.0 && particles.extent.is_finite()) {
                return invalid(format!("particle extent {}", particles.extent));
            }
        }

        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::hero()
    }
}
