use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use super::layout::{Structure, StructureKind};

// (normal, u, v) per face, u x v = normal so every face winds counter-clockwise
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Collects child geometry at child transforms into one parent mesh,
/// so a whole borough renders as a single draw.
#[derive(Default)]
pub struct MeshAggregator {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned (min, max) of everything merged so far
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    fn push_vertex(&mut self, transform: &Transform, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        let normal = (transform.rotation * (normal / transform.scale)).normalize_or_zero();

        self.positions.push(transform.transform_point(position).to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv);
        index
    }

    /// Center anchored box of `size`
    pub fn merge_box(&mut self, size: Vec3, transform: &Transform) {
        let half = size / 2.0;

        for (normal, u, v) in BOX_FACES {
            let center = normal * half;
            let (u, v) = (u * half, v * half);

            let base = self.push_vertex(transform, center - u - v, normal, [0.0, 0.0]);
            self.push_vertex(transform, center + u - v, normal, [1.0, 0.0]);
            self.push_vertex(transform, center + u + v, normal, [1.0, 1.0]);
            self.push_vertex(transform, center - u + v, normal, [0.0, 1.0]);

            self.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    /// Center anchored truncated cone with flat caps
    pub fn merge_frustum(
        &mut self,
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
        transform: &Transform,
    ) {
        let segments = segments.max(3);
        let half_height = height / 2.0;
        let ring = |k: u32| {
            let angle = k as f32 / segments as f32 * TAU;
            (angle.cos(), angle.sin())
        };

        // sides, the seam vertex is duplicated so uvs wrap cleanly
        let side_base = self.vertex_count() as u32;
        for k in 0..=segments {
            let (cos, sin) = ring(k);
            let u = k as f32 / segments as f32;
            let normal = Vec3::new(cos * height, radius_bottom - radius_top, sin * height);

            self.push_vertex(
                transform,
                Vec3::new(cos * radius_bottom, -half_height, sin * radius_bottom),
                normal,
                [u, 0.0],
            );
            self.push_vertex(
                transform,
                Vec3::new(cos * radius_top, half_height, sin * radius_top),
                normal,
                [u, 1.0],
            );
        }
        for k in 0..segments {
            let b0 = side_base + 2 * k;
            let (t0, b1, t1) = (b0 + 1, b0 + 2, b0 + 3);
            self.indices.extend([b0, t0, t1, b0, t1, b1]);
        }

        // caps
        for (y, radius, normal) in [
            (half_height, radius_top, Vec3::Y),
            (-half_height, radius_bottom, Vec3::NEG_Y),
        ] {
            let center = self.push_vertex(transform, Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]);
            for k in 0..segments {
                let (cos, sin) = ring(k);
                self.push_vertex(
                    transform,
                    Vec3::new(cos * radius, y, sin * radius),
                    normal,
                    [0.5 + cos * 0.5, 0.5 + sin * 0.5],
                );
            }

            for k in 0..segments {
                let current = center + 1 + k;
                let next = center + 1 + (k + 1) % segments;
                if normal.y > 0.0 {
                    self.indices.extend([center, next, current]);
                } else {
                    self.indices.extend([center, current, next]);
                }
            }
        }
    }

    /// Flat quad on the XZ plane facing up
    pub fn merge_plane(&mut self, size: Vec2, transform: &Transform) {
        let half = size / 2.0;
        let base = self.push_vertex(transform, Vec3::new(-half.x, 0.0, -half.y), Vec3::Y, [0.0, 0.0]);
        self.push_vertex(transform, Vec3::new(-half.x, 0.0, half.y), Vec3::Y, [0.0, 1.0]);
        self.push_vertex(transform, Vec3::new(half.x, 0.0, half.y), Vec3::Y, [1.0, 1.0]);
        self.push_vertex(transform, Vec3::new(half.x, 0.0, -half.y), Vec3::Y, [1.0, 0.0]);

        self.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Merges a structure with its pivot moved to the base, so `transform` places the footprint on the ground
    pub fn merge_structure(&mut self, structure: &Structure, transform: &Transform) {
        let transform = transform.mul_transform(Transform::from_xyz(0.0, structure.height() / 2.0, 0.0));

        match structure.kind() {
            StructureKind::Box => self.merge_box(
                Vec3::new(structure.width(), structure.height(), structure.depth()),
                &transform,
            ),
            StructureKind::Cylinder {
                radius_top,
                radius_bottom,
                segments,
            } => {
                // the bottom radius spans the whole footprint square, so draw the ring at half of it
                let fit = structure.width() / (2.0 * radius_bottom);
                self.merge_frustum(radius_top * fit, radius_bottom * fit, structure.height(), segments, &transform)
            }
        }
    }

    pub fn merge_points(&mut self, points: &[Vec3], transform: &Transform) {
        for point in points {
            self.push_vertex(transform, *point, Vec3::Y, [0.0, 0.0]);
        }
    }

    pub fn build(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));

        mesh
    }

    /// Vertices only, rendered as a point cloud
    pub fn build_points(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::PointList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::layout::{StructureBounds, StructureFactory};
    use crate::test::ScriptedSource;

    fn structure(draws: Vec<f32>) -> Structure {
        let mut source = ScriptedSource::new(draws);
        StructureFactory::default().generate(&mut source, &StructureBounds::new(10.0, 20.0, 10.0))
    }

    #[test]
    fn box_has_four_vertices_per_face() {
        let mut aggregator = MeshAggregator::new();
        aggregator.merge_box(Vec3::new(2.0, 4.0, 6.0), &Transform::IDENTITY);

        assert_eq!(aggregator.vertex_count(), 24);
        assert_eq!(aggregator.index_count(), 36);
        assert_eq!(
            aggregator.bounds(),
            Some((Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn box_faces_wind_outward() {
        let mut aggregator = MeshAggregator::new();
        aggregator.merge_box(Vec3::ONE, &Transform::IDENTITY);

        for (triangle, face) in aggregator.indices.chunks(3).zip((0..6).flat_map(|f| [f, f])) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| Vec3::from_array(aggregator.positions[i as usize]));
            let winding = (b - a).cross(c - a).normalize();
            assert!(winding.abs_diff_eq(BOX_FACES[face].0, 1e-5));
        }
    }

    #[test]
    fn frustum_vertex_layout() {
        let mut aggregator = MeshAggregator::new();
        aggregator.merge_frustum(1.0, 2.0, 4.0, 4, &Transform::IDENTITY);

        // (segments + 1) * 2 side vertices, (segments + 1) per cap
        assert_eq!(aggregator.vertex_count(), 10 + 5 + 5);
        assert_eq!(aggregator.index_count(), 4 * 6 + 4 * 3 * 2);

        let (min, max) = aggregator.bounds().unwrap();
        assert_eq!(min.y, -2.0);
        assert_eq!(max.y, 2.0);
        assert!((max.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn structures_rest_on_the_ground() {
        let tall_box = structure(vec![0.5, 0.5, 0.5, 0.0]);
        let mut aggregator = MeshAggregator::new();
        aggregator.merge_structure(&tall_box, &Transform::from_xyz(10.0, 0.0, 10.0));

        let (min, max) = aggregator.bounds().unwrap();
        assert_eq!(min.y, 0.0);
        assert_eq!(max.y, tall_box.height());
        assert_eq!(min.x, 10.0 - tall_box.width() / 2.0);
    }

    #[test]
    fn footprint_scale_shrinks_xz_only() {
        let block = structure(vec![0.5, 0.5, 0.5, 0.0]);
        let mut aggregator = MeshAggregator::new();
        aggregator.merge_structure(&block, &Transform::from_scale(Vec3::new(0.5, 1.0, 0.5)));

        let (min, max) = aggregator.bounds().unwrap();
        assert_eq!(max.x - min.x, block.width() * 0.5);
        assert_eq!(max.y - min.y, block.height());
    }

    #[test]
    fn cylinders_stay_inside_their_footprint() {
        // width, depth, height, kind, segments
        let cylinder = structure(vec![0.375, 0.875, 0.5, 0.75, 0.99]);
        assert!(cylinder.is_cylinder());

        for scale in [0.5, 0.9, 1.0] {
            let mut aggregator = MeshAggregator::new();
            aggregator.merge_structure(&cylinder, &Transform::from_scale(Vec3::new(scale, 1.0, scale)));

            let (min, max) = aggregator.bounds().unwrap();
            assert!(max.x - min.x <= cylinder.width() * scale + 1e-4);
            assert!(max.z - min.z <= cylinder.depth() * scale + 1e-4);
            assert!((max.x - cylinder.width() * scale / 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn merged_children_share_one_mesh() {
        let mut aggregator = MeshAggregator::new();
        aggregator.merge_box(Vec3::ONE, &Transform::IDENTITY);
        aggregator.merge_box(Vec3::ONE, &Transform::from_xyz(5.0, 0.0, 0.0));
        aggregator.merge_plane(Vec2::splat(10.0), &Transform::IDENTITY);

        let mesh = aggregator.build();
        assert_eq!(mesh.count_vertices(), 52);
        assert_eq!(mesh.indices().map(|indices| indices.len()), Some(78));
    }

    #[test]
    fn point_clouds_have_no_indices() {
        let mut aggregator = MeshAggregator::new();
        aggregator.merge_points(&[Vec3::ZERO, Vec3::X, Vec3::Y], &Transform::IDENTITY);

        let mesh = aggregator.build_points();
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
        assert_eq!(mesh.count_vertices(), 3);
        assert!(mesh.indices().is_none());
    }
}
