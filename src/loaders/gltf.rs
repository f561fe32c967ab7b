use std::path::Path;
use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3};

use crate::errors::AssetError;
use crate::scene::{MeshData, Vertex};

/// Triangles of a loaded model, centred on the origin with unit radius
#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub name: String,
    pub mesh: Arc<MeshData>,
}

/// Outcome of loading the optional model. Failure leaves the scene without it.
pub type AssetLoad = Result<ModelAsset, AssetError>;

/// Loads a glTF file and flattens every mesh of its default scene into one
/// normalised triangle mesh
pub fn load_model(path: impl AsRef<Path>) -> AssetLoad {
    let path = path.as_ref();
    log::info!("loading model {path:?}");

    let (document, buffers, _images) = gltf::import(path).map_err(|source| AssetError::Import {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "glTF: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut mesh = MeshData::default();
    let scenes: Vec<gltf::Scene> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };
    for scene in &scenes {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut mesh)?;
        }
    }

    if mesh.is_empty() {
        return Err(AssetError::NoGeometry(path.to_path_buf()));
    }

    normalize(&mut mesh);

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    log::info!("model {name:?} loaded: {} triangles", mesh.triangle_count());

    Ok(ModelAsset {
        name,
        mesh: Arc::new(mesh),
    })
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    out: &mut MeshData,
) -> Result<(), AssetError> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, out)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, out)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    out: &mut MeshData,
) -> Result<(), AssetError> {
    let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("skipping {:?} primitive in mesh {:?}", primitive.mode(), mesh.name());
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| AssetError::MissingPositions {
                mesh: mesh.name().map(str::to_string),
            })?
            .map(|p| transform.transform_point3(Vec3::from_array(p)))
            .collect();

        let count = positions.len() as u32;
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..count).collect(),
        };
        let indices: Vec<u32> = indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| i < count))
            .flatten()
            .copied()
            .collect();

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals
                .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
                .collect(),
            None => face_normals(&positions, &indices),
        };

        let part = MeshData {
            vertices: positions
                .iter()
                .zip(normals.iter().chain(std::iter::repeat(&Vec3::Y)))
                .map(|(p, n)| Vertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                })
                .collect(),
            indices,
        };
        out.extend(&part);
    }

    Ok(())
}

/// Area-weighted vertex normals for primitives that ship none
fn face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.into_iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}

/// Centre the bounding box on the origin and scale to unit radius
fn normalize(mesh: &mut MeshData) {
    let (min, max) = mesh.vertices.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(min, max), v| {
            let p = Vec3::from_array(v.position);
            (min.min(p), max.max(p))
        },
    );
    let center = (min + max) * 0.5;

    for vertex in &mut mesh.vertices {
        vertex.position = (Vec3::from_array(vertex.position) - center).to_array();
    }

    let radius = mesh.radius();
    if radius > f32::EPSILON {
        for vertex in &mut mesh.vertices {
            vertex.position = (Vec3::from_array(vertex.position) / radius).to_array();
        }
    }
}
