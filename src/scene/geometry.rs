//! Procedural primitive meshes.
//!
//! Conventions follow the usual three.js primitives: Y up, counter-clockwise
//! front faces, spheres generated ring by ring from the south pole, tori lying
//! in the XY plane.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use glam::Vec3;

use super::object::Shape;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, offsetting its indices.
    pub fn extend(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Largest distance of any vertex from the origin.
    pub fn radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).length())
            .fold(0.0, f32::max)
    }
}

/// Mesh for a shape. Loaded meshes are shared, primitives are generated.
pub fn build(shape: &Shape) -> Arc<MeshData> {
    match shape {
        Shape::Sphere {
            radius,
            width_segments,
            height_segments,
        } => Arc::new(sphere(*radius, *width_segments, *height_segments)),
        Shape::Box {
            width,
            height,
            depth,
        } => Arc::new(cuboid(*width, *height, *depth)),
        Shape::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => Arc::new(torus(*radius, *tube, *radial_segments, *tubular_segments)),
        Shape::Mesh(mesh) => Arc::clone(mesh),
    }
}

pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut mesh = MeshData::default();

    for y in 0..=height_segments {
        let theta = y as f32 / height_segments as f32 * PI;
        let ring_radius = radius * theta.sin();
        let py = -radius * theta.cos();

        for x in 0..=width_segments {
            let phi = x as f32 / width_segments as f32 * TAU;
            let position = Vec3::new(-ring_radius * phi.cos(), py, ring_radius * phi.sin());
            // Poles have a zero-length ring; fall back to the axis direction.
            let normal = position.try_normalize().unwrap_or(Vec3::new(0.0, py.signum(), 0.0));

            mesh.vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    let stride = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let v0 = y * stride + x;
            let v1 = v0 + 1;
            let v2 = v0 + stride;
            let v3 = v2 + 1;

            mesh.indices.extend_from_slice(&[v0, v1, v2, v1, v3, v2]);
        }
    }

    mesh
}

pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vec3::new(width, height, depth) * 0.5;

    // (normal, u axis, v axis) per face; u × v == normal keeps the winding CCW.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    ];

    let mut mesh = MeshData::default();

    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + u * su + v * sv) * half;
            mesh.vertices.push(Vertex {
                position: corner.to_array(),
                normal: normal.to_array(),
            });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial_segments = radial_segments.max(3);
    let tubular_segments = tubular_segments.max(3);

    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;

            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize_or_zero();

            mesh.vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    let stride = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;

            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}
