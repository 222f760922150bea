//! Procedural geometry.
//!
//! Everything here is generated on the CPU once and uploaded by the backend;
//! no asset files are involved.

use glam::Vec3;
use lego_common::Color;

/// Indexed triangle geometry with per-vertex normals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Counter-clockwise triangles.
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Axis-aligned box centered on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        Self::box_between(-half, half)
    }

    /// A flat rectangle of `width` x `depth` extruded downward by `thickness`.
    ///
    /// The top face sits at y = 0 so objects placed at y = 0 rest on it.
    pub fn extruded_rect(width: f32, depth: f32, thickness: f32) -> Self {
        let (w, d) = (width * 0.5, depth * 0.5);
        Self::box_between(Vec3::new(-w, -thickness, -d), Vec3::new(w, 0.0, d))
    }

    /// Box spanning `min`..`max`, four vertices per face so normals stay flat.
    pub fn box_between(min: Vec3, max: Vec3) -> Self {
        let (a, b) = (min, max);
        #[rustfmt::skip]
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // +Z
            ([0.0, 0.0, 1.0], [[a.x, a.y, b.z], [b.x, a.y, b.z], [b.x, b.y, b.z], [a.x, b.y, b.z]]),
            // -Z
            ([0.0, 0.0, -1.0], [[b.x, a.y, a.z], [a.x, a.y, a.z], [a.x, b.y, a.z], [b.x, b.y, a.z]]),
            // +X
            ([1.0, 0.0, 0.0], [[b.x, a.y, b.z], [b.x, a.y, a.z], [b.x, b.y, a.z], [b.x, b.y, b.z]]),
            // -X
            ([-1.0, 0.0, 0.0], [[a.x, a.y, a.z], [a.x, a.y, b.z], [a.x, b.y, b.z], [a.x, b.y, a.z]]),
            // +Y
            ([0.0, 1.0, 0.0], [[a.x, b.y, b.z], [b.x, b.y, b.z], [b.x, b.y, a.z], [a.x, b.y, a.z]]),
            // -Y
            ([0.0, -1.0, 0.0], [[a.x, a.y, a.z], [b.x, a.y, a.z], [b.x, a.y, b.z], [a.x, a.y, b.z]]),
        ];

        let mut geometry = Self::default();
        for (normal, corners) in faces {
            let base = geometry.positions.len() as u32;
            for corner in corners {
                geometry.positions.push(corner);
                geometry.normals.push(normal);
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        geometry
    }

    /// Single-sided plane in the XZ plane facing +Y.
    pub fn plane(width: f32, depth: f32) -> Self {
        let (w, d) = (width * 0.5, depth * 0.5);
        Self {
            positions: vec![[-w, 0.0, d], [w, 0.0, d], [w, 0.0, -d], [-w, 0.0, -d]],
            normals: vec![[0.0, 1.0, 0.0]; 4],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Geometry plus a flat material color.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub color: Color,
}

impl Mesh {
    pub fn new(geometry: Geometry, color: Color) -> Self {
        Self { geometry, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_counts() {
        let g = Geometry::cuboid(1.0, 1.0, 1.0);
        assert_eq!(g.vertex_count(), 24);
        assert_eq!(g.triangle_count(), 12);
        assert_eq!(g.normals.len(), g.positions.len());
    }

    #[test]
    fn cuboid_is_centered() {
        let (lo, hi) = Geometry::cuboid(2.0, 4.0, 6.0).bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(hi, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn extruded_rect_top_at_zero() {
        let (lo, hi) = Geometry::extruded_rect(20.0, 10.0, 0.5).bounds().unwrap();
        assert_eq!(hi.y, 0.0);
        assert_eq!(lo.y, -0.5);
        assert_eq!(hi.x - lo.x, 20.0);
        assert_eq!(hi.z - lo.z, 10.0);
    }

    #[test]
    fn face_winding_matches_normal() {
        let g = Geometry::cuboid(1.0, 1.0, 1.0);
        for tri in g.indices.chunks(3) {
            let [p0, p1, p2] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(g.positions[i as usize]));
            let n = Vec3::from_array(g.normals[tri[0] as usize]);
            let face = (p1 - p0).cross(p2 - p0).normalize();
            assert!(face.dot(n) > 0.99, "triangle {tri:?} winds against its normal");
        }
    }

    #[test]
    fn empty_geometry_has_no_bounds() {
        assert!(Geometry::default().bounds().is_none());
    }

    #[test]
    fn plane_faces_up() {
        let g = Geometry::plane(2.0, 2.0);
        assert_eq!(g.triangle_count(), 2);
        assert!(g.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }
}
