//! Scene graph: decorative objects, their transform array, lights and the
//! particle cloud.
//!
//! Objects are addressed by [`ObjectId`], their index into both
//! [`Scene::objects`] and [`Scene::transforms`]. The transform array is the
//! only state animation mutates.

pub mod geometry;
pub mod light;
pub mod object;
pub mod particles;

pub use geometry::{MeshData, Vertex};
pub use light::Light;
pub use object::{Distortion, Emissive, Material, ObjectId, SceneObject, Shape, Transform};
pub use particles::ParticleCloud;

use crate::animation::{AnimationDriver, AnimationTrack};
use crate::config::SceneConfig;
use crate::errors::SceneError;
use crate::theme::{Color, Palette, Theme};

#[derive(Debug, Clone)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    /// Current transform of each object, indexed by [`ObjectId`].
    pub transforms: Vec<Transform>,
    pub lights: Vec<Light>,
    pub particles: Option<ParticleCloud>,
    pub background: Palette,
    theme: Theme,
}

impl Scene {
    pub fn new(background: Palette) -> Self {
        Self {
            objects: Vec::new(),
            transforms: Vec::new(),
            lights: Vec::new(),
            particles: None,
            background,
            theme: Theme::default(),
        }
    }

    /// Build the scene and its animation tracks from a configuration.
    pub fn build(config: &SceneConfig) -> Result<(Scene, AnimationDriver), SceneError> {
        config.validate()?;

        let mut scene = Scene::new(config.background);
        let mut driver = AnimationDriver::default();

        for object_config in &config.objects {
            let (object, track) = object_config.to_object();
            scene.push(object);
            driver.push(track);
        }

        scene.lights = config.lights.iter().map(|l| l.to_light()).collect();

        scene.particles = config.particles.as_ref().map(|p| {
            ParticleCloud::scatter(p.count, p.extent, p.palette(), p.size, p.opacity)
        });

        log::info!(
            "built scene: {} objects, {} lights, {} particles",
            scene.objects.len(),
            scene.lights.len(),
            scene.particles.as_ref().map_or(0, ParticleCloud::len)
        );

        Ok((scene, driver))
    }

    /// Add an object at its base transform. The object takes the current theme.
    pub fn push(&mut self, mut object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        object.material.apply_theme(self.theme);
        self.transforms.push(object.base);
        self.objects.push(object);
        id
    }

    /// Add an object together with its animation track.
    pub fn push_animated(
        &mut self,
        object: SceneObject,
        track: AnimationTrack,
        driver: &mut AnimationDriver,
    ) -> ObjectId {
        // Keep track indices aligned with object indices.
        while driver.len() < self.objects.len() {
            driver.push(AnimationTrack::default());
        }
        let id = self.push(object);
        driver.push(track);
        id
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects.iter().position(|o| o.name == name).map(ObjectId)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.index())
    }

    pub fn transform(&self, id: ObjectId) -> Option<&Transform> {
        self.transforms.get(id.index())
    }

    pub fn transform_mut(&mut self, id: ObjectId) -> Option<&mut Transform> {
        self.transforms.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Recolour every material and the particles for `theme`.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        for object in &mut self.objects {
            object.material.apply_theme(theme);
        }
        if let Some(particles) = &mut self.particles {
            particles.apply_theme(theme);
        }
    }

    pub fn clear_color(&self) -> Color {
        self.background.resolve(self.theme)
    }
}
