//! Fixed polygon mesh for the object effect

use crate::fixed::Q16;
use crate::math3d::Vec3;

/// Vertex in object space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObjectVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Up to four corners; triangles leave the fourth slot empty
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub indices: [Option<usize>; 4],
    /// Static texture coordinates per corner (16.16, texel units)
    pub tex: [(Q16, Q16); 4],
    pub normal: Vec3,
    pub centroid: Vec3,
}

impl Polygon {
    fn new(indices: [Option<usize>; 4], tex: [(i32, i32); 4]) -> Self {
        Self {
            indices,
            tex: tex.map(|(s, t)| (Q16::from_int(s), Q16::from_int(t))),
            normal: Vec3::zero(),
            centroid: Vec3::zero(),
        }
    }

    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self::new(
            [Some(a), Some(b), Some(c), None],
            [(128, 0), (255, 255), (0, 255), (0, 0)],
        )
    }

    pub fn quad(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self::new(
            [Some(a), Some(b), Some(c), Some(d)],
            [(0, 0), (255, 0), (255, 255), (0, 255)],
        )
    }

    /// Corner count (3 or 4)
    pub fn len(&self) -> usize {
        self.indices.iter().flatten().count()
    }

    /// Present corners paired with their texture coordinates, in order
    pub fn corners(&self) -> impl Iterator<Item = (usize, (Q16, Q16))> + '_ {
        self.indices
            .iter()
            .zip(self.tex.iter())
            .filter_map(|(idx, &tex)| idx.map(|i| (i, tex)))
    }
}

/// Object-space vertices and polygons. Normals and centroids are derived once
/// at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<ObjectVertex>,
    pub polygons: Vec<Polygon>,
}

impl Mesh {
    /// Build a mesh and derive outward face normals, centroids and smoothed
    /// vertex normals
    pub fn new(positions: &[Vec3], mut polygons: Vec<Polygon>) -> Self {
        let center = positions
            .iter()
            .fold(Vec3::zero(), |acc, &p| acc + p)
            * (1.0 / positions.len().max(1) as f32);

        let mut normal_sums = vec![Vec3::zero(); positions.len()];
        for poly in &mut polygons {
            let corners: Vec<Vec3> = poly.corners().map(|(i, _)| positions[i]).collect();
            let centroid = corners.iter().fold(Vec3::zero(), |acc, &p| acc + p)
                * (1.0 / corners.len() as f32);
            let mut normal = (corners[1] - corners[0])
                .cross(&(corners[2] - corners[0]))
                .normalize();
            // winding is arbitrary; point away from the body
            if normal.dot(&(centroid - center)) < 0.0 {
                normal = -normal;
            }
            poly.normal = normal;
            poly.centroid = centroid;
            for (i, _) in poly.corners() {
                normal_sums[i] = normal_sums[i] + normal;
            }
        }

        let vertices = positions
            .iter()
            .zip(normal_sums)
            .map(|(&position, sum)| ObjectVertex {
                position,
                normal: sum.normalize(),
            })
            .collect();

        Self { vertices, polygons }
    }

    /// Square pyramid: one quad base and four triangular sides.
    /// Screen y grows downward, so the apex has negative y.
    pub fn pyramid(size: f32) -> Self {
        let base_y = size * 0.6;
        let positions = [
            Vec3::new(-size, base_y, -size),
            Vec3::new(size, base_y, -size),
            Vec3::new(size, base_y, size),
            Vec3::new(-size, base_y, size),
            Vec3::new(0.0, -size, 0.0),
        ];
        let polygons = vec![
            Polygon::quad(0, 1, 2, 3),
            Polygon::triangle(4, 0, 1),
            Polygon::triangle(4, 1, 2),
            Polygon::triangle(4, 2, 3),
            Polygon::triangle(4, 3, 0),
        ];
        Self::new(&positions, polygons)
    }
}
