use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use super::geometry::MeshData;
use crate::theme::{Color, Palette, Theme};

/// Index of an object in [`Scene::objects`](super::Scene) and in the transform array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Plain transform record, rewritten in place every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

/// Geometry parameters of a decorative shape.
#[derive(Debug, Clone)]
pub enum Shape {
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
    /// Triangles from a loaded model.
    Mesh(Arc<MeshData>),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "sphere",
            Shape::Box { .. } => "box",
            Shape::Torus { .. } => "torus",
            Shape::Mesh(_) => "mesh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emissive {
    pub intensity: f32,
}

/// Animated vertex displacement along the surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    pub amount: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub palette: Palette,
    /// Colour for the theme most recently applied.
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    /// Glow in the material's own colour.
    pub emissive: Option<Emissive>,
    pub distortion: Option<Distortion>,
    pub opacity: f32,
}

impl Material {
    pub fn new(palette: Palette, metalness: f32, roughness: f32) -> Self {
        Self {
            palette,
            color: palette.resolve(Theme::default()),
            metalness,
            roughness,
            emissive: None,
            distortion: None,
            opacity: 1.0,
        }
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.color = self.palette.resolve(theme);
    }

    pub fn emissive_color(&self) -> Color {
        match self.emissive {
            Some(glow) => self.color.scaled(glow.intensity),
            None => Color::BLACK,
        }
    }
}

/// One decorative shape owned by the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub material: Material,
    /// Transform at construction; animation writes into the scene's transform array.
    pub base: Transform,
}
