use glam::Vec3;

use crate::camera::Camera;
use crate::scene::{Light, ParticleCloud, Scene, SceneObject, Transform};
use crate::theme::Color;

/// Upper bound on non-ambient lights uploaded per frame
pub const MAX_LIGHTS: usize = 8;

const KIND_DIRECTIONAL: f32 = 0.0;
const KIND_POINT: f32 = 1.0;
const KIND_SPOT: f32 = 2.0;

/// One light for the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// xyz position, w kind (0 directional, 1 point, 2 spot)
    pub position: [f32; 4],
    /// rgb linear colour, w intensity
    pub color: [f32; 4],
    /// x cosine of the spot cone half-angle
    pub params: [f32; 4],
}

impl LightUniform {
    /// `None` for ambient light, which is folded into [`FrameUniform::ambient`]
    pub fn from_light(light: &Light) -> Option<Self> {
        let (position, kind, color, intensity, cutoff) = match *light {
            Light::Ambient { .. } => return None,
            Light::Directional {
                position,
                color,
                intensity,
            } => (position, KIND_DIRECTIONAL, color, intensity, 0.0),
            Light::Point {
                position,
                color,
                intensity,
            } => (position, KIND_POINT, color, intensity, 0.0),
            Light::Spot {
                position,
                color,
                intensity,
                angle,
            } => (position, KIND_SPOT, color, intensity, angle.cos()),
        };

        Some(Self {
            position: position.extend(kind).to_array(),
            color: rgba(color, intensity),
            params: [cutoff, 0.0, 0.0, 0.0],
        })
    }
}

/// Per-frame uniform shared by every draw
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// xyz camera position, w elapsed time
    pub eye: [f32; 4],
    /// rgb summed ambient light, w number of entries used in `lights`
    pub ambient: [f32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
}

impl FrameUniform {
    pub fn new(camera: &Camera, scene: &Scene, time: f32) -> Self {
        let mut ambient = Vec3::ZERO;
        let mut lights = [LightUniform::default(); MAX_LIGHTS];
        let mut count = 0;

        for light in &scene.lights {
            if let Light::Ambient { color, intensity } = *light {
                ambient += Vec3::from_array(color.linear()) * intensity;
                continue;
            }
            if count == MAX_LIGHTS {
                log::warn!("scene has more than {MAX_LIGHTS} lights, extra lights ignored");
                break;
            }
            if let Some(uniform) = LightUniform::from_light(light) {
                lights[count] = uniform;
                count += 1;
            }
        }

        Self {
            view: camera.view().to_cols_array_2d(),
            proj: camera.projection().to_cols_array_2d(),
            eye: camera.position.extend(time).to_array(),
            ambient: ambient.extend(count as f32).to_array(),
            lights,
        }
    }
}

/// Per-object uniform
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// rgb linear colour, a opacity
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    /// metalness, roughness, distortion amount, distortion speed
    pub surface: [f32; 4],
}

impl ObjectUniform {
    pub fn new(object: &SceneObject, transform: &Transform) -> Self {
        let material = &object.material;
        let (amount, speed) = material
            .distortion
            .map_or((0.0, 0.0), |d| (d.amount, d.speed));

        Self {
            model: transform.matrix().to_cols_array_2d(),
            color: rgba(material.color, material.opacity),
            emissive: rgba(material.emissive_color(), 0.0),
            surface: [material.metalness, material.roughness, amount, speed],
        }
    }
}

/// Particle cloud uniform
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointsUniform {
    /// rgb linear colour, a opacity
    pub color: [f32; 4],
    /// x point size in world units
    pub params: [f32; 4],
}

impl PointsUniform {
    pub fn new(cloud: &ParticleCloud) -> Self {
        Self {
            color: rgba(cloud.color, cloud.opacity),
            params: [cloud.size, 0.0, 0.0, 0.0],
        }
    }
}

fn rgba(color: Color, w: f32) -> [f32; 4] {
    let [r, g, b] = color.linear();
    [r, g, b, w]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::core::window::SurfaceSize;

    #[test]
    fn uniform_sizes_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 64 * 2 + 32 + 48 * MAX_LIGHTS);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 112);
        assert_eq!(std::mem::size_of::<PointsUniform>(), 32);
    }

    #[test]
    fn hero_lights_pack_with_ambient_folded() {
        let config = SceneConfig::hero();
        let (scene, _) = Scene::build(&config).unwrap();
        let camera = Camera::from_config(&config.camera, SurfaceSize::new(800, 600));

        let frame = FrameUniform::new(&camera, &scene, 1.5);

        assert_eq!(frame.ambient[3], 4.0);
        assert!((frame.ambient[0] - 0.5).abs() < 1e-6);
        assert_eq!(frame.eye[3], 1.5);
        assert_eq!(frame.lights[0].position, [10.0, 10.0, 5.0, KIND_DIRECTIONAL]);
        assert_eq!(frame.lights[3].position[3], KIND_SPOT);
        assert!((frame.lights[3].params[0] - 0.3f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn ambient_has_no_light_uniform() {
        let light = Light::Ambient {
            color: Color::WHITE,
            intensity: 1.0,
        };
        assert_eq!(LightUniform::from_light(&light), None);
    }
}
