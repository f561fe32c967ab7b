use glam::Vec3;
use hero_scene::scene::geometry::{cuboid, sphere, torus};
use hero_scene::scene::{MeshData, ParticleCloud};
use hero_scene::theme::{Color, Palette};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn assert_unit_normals(mesh: &MeshData) {
    for vertex in &mesh.vertices {
        let length = Vec3::from_array(vertex.normal).length();
        assert!((length - 1.0).abs() < 1e-4, "normal length {length}");
    }
}

fn assert_indices_in_range(mesh: &MeshData) {
    let count = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < count));
    assert_eq!(mesh.indices.len() % 3, 0);
}

/// Sum of (centroid · face normal) sign over all faces; positive when faces point outward.
fn outward_faces(mesh: &MeshData) -> usize {
    mesh.indices
        .chunks_exact(3)
        .filter(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            normal.length() > 1e-9 && normal.dot((a + b + c) / 3.0) > 0.0
        })
        .count()
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    #[test]
    fn test_core_sphere_resolution() {
        let mesh = sphere(1.0, 100, 200);
        assert_eq!(mesh.vertices.len(), 101 * 201);
        assert_eq!(mesh.triangle_count(), 100 * 200 * 2);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = sphere(0.35, 32, 32);
        for vertex in &mesh.vertices {
            assert!((Vec3::from_array(vertex.position).length() - 0.35).abs() < 1e-5);
        }
        assert_unit_normals(&mesh);
    }

    #[test]
    fn test_sphere_faces_point_outward() {
        let mesh = sphere(1.0, 16, 8);
        let non_degenerate = mesh
            .indices
            .chunks_exact(3)
            .filter(|tri| {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
                (b - a).cross(c - a).length() > 1e-9
            })
            .count();
        assert_eq!(outward_faces(&mesh), non_degenerate);
    }

    #[test]
    fn test_cuboid_layout() {
        let mesh = cuboid(0.8, 0.8, 0.8);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(outward_faces(&mesh), 12);
        assert_unit_normals(&mesh);

        for vertex in &mesh.vertices {
            let p = Vec3::from_array(vertex.position);
            assert!((p.abs() - Vec3::splat(0.4)).length() < 1e-6);
        }
    }

    #[test]
    fn test_torus_extent() {
        let mesh = torus(0.6, 0.2, 16, 100);
        assert_eq!(mesh.vertices.len(), 17 * 101);
        assert_eq!(mesh.triangle_count(), 16 * 100 * 2);
        assert_indices_in_range(&mesh);
        assert_unit_normals(&mesh);

        assert!((mesh.radius() - 0.8).abs() < 1e-4);
        for vertex in &mesh.vertices {
            assert!(vertex.position[2].abs() <= 0.2 + 1e-6);
        }
    }

    #[test]
    fn test_particles_fill_cube() {
        let mut rng = StdRng::seed_from_u64(7);
        let cloud = ParticleCloud::scatter_with(&mut rng, 150, 15.0, Palette::fixed(Color::WHITE), 0.05, 0.6);

        assert_eq!(cloud.len(), 150);
        assert!(cloud.positions.iter().all(|p| cloud.contains(Vec3::from_array(*p))));

        let mean = cloud.positions.iter().map(|p| Vec3::from_array(*p)).sum::<Vec3>() / 150.0;
        assert!(mean.length() < 2.0);
    }

    #[test]
    fn test_particles_differ_per_construction() {
        let palette = Palette::fixed(Color::WHITE);
        let a = ParticleCloud::scatter(20, 10.0, palette, 0.05, 0.6);
        let b = ParticleCloud::scatter(20, 10.0, palette, 0.05, 0.6);
        assert_ne!(a.positions, b.positions);
    }
}
