//! Textured, lit, depth-buffered polygon rasterizer
//!
//! Pipeline per frame: [`transform`] the mesh into screen space, then
//! [`draw_polygon`] every face. Faces pointing away from the camera are
//! culled; the rest are scan converted through an [`EdgeTable`] and filled
//! row by row with [`draw_span`].

mod edge;
mod mesh;
mod span;

pub use edge::{EdgeTable, EdgeVertex};
pub use mesh::{Mesh, Polygon};
pub use span::draw_span;

use crate::display::FrameLock;
use crate::fixed::{Q16, Q4};
use crate::math3d::{project, Mat3, Vec3};
use crate::texture::{LightMap, Texture};

/// Closest view depth a vertex is projected at
pub const NEAR_PLANE: f32 = 1.0;

/// Object orientation and position in view space (camera at the origin,
/// looking down +z, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub rotation: Mat3,
    pub position: Vec3,
}

impl Default for ObjectPose {
    fn default() -> Self {
        Self {
            rotation: Mat3::identity(),
            position: Vec3::zero(),
        }
    }
}

/// Per-frame vertex state: projected position, view depth and rotated normal
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub normal: Vec3,
}

impl ScreenVertex {
    /// Edge table corner. The rotated normal picks the light map texel.
    fn corner(&self, (s, t): (Q16, Q16)) -> EdgeVertex {
        EdgeVertex {
            x: self.x,
            y: self.y,
            u: Q16::from_f32(128.0 + 127.0 * self.normal.x),
            v: Q16::from_f32(128.0 + 127.0 * self.normal.y),
            s,
            t,
            z: Q4::from_f32(self.depth),
        }
    }
}

/// Rotate, translate and project every mesh vertex into `out`
pub fn transform(mesh: &Mesh, pose: &ObjectPose, width: u32, height: u32, out: &mut [ScreenVertex]) {
    for (vertex, screen) in mesh.vertices.iter().zip(out.iter_mut()) {
        let view = pose.rotation * vertex.position + pose.position;
        let depth = view.z.max(NEAR_PLANE);
        let (x, y) = project(view, depth, width, height);
        *screen = ScreenVertex {
            x,
            y,
            depth,
            normal: pose.rotation * vertex.normal,
        };
    }
}

/// A face is visible when its rotated normal points back at the camera
pub fn is_front_facing(polygon: &Polygon, pose: &ObjectPose) -> bool {
    let centroid = pose.rotation * polygon.centroid + pose.position;
    let normal = pose.rotation * polygon.normal;
    centroid.dot(&normal) < 0.0
}

/// Scan convert a convex outline and fill every covered row
pub fn fill_polygon(
    lock: &mut FrameLock<'_>,
    table: &mut EdgeTable,
    corners: &[EdgeVertex],
    texture: &Texture,
    light: &LightMap,
) {
    table.reset();
    for (i, a) in corners.iter().enumerate() {
        let b = &corners[(i + 1) % corners.len()];
        table.scan_edge(a, b);
    }

    let Some((top, bottom)) = table.clipped_rows() else {
        return;
    };
    let bottom = bottom.min(lock.height() as i32 - 1);
    for y in top..=bottom {
        if let Some((a, b)) = table.row(y) {
            draw_span(lock, y as u32, &a, &b, texture, light);
        }
    }
}

/// Cull, then rasterize one face using this frame's transformed vertices.
/// Returns false if the face was culled.
pub fn draw_polygon(
    lock: &mut FrameLock<'_>,
    table: &mut EdgeTable,
    polygon: &Polygon,
    pose: &ObjectPose,
    vertices: &[ScreenVertex],
    texture: &Texture,
    light: &LightMap,
) -> bool {
    if !is_front_facing(polygon, pose) {
        return false;
    }

    let mut corners = [EdgeVertex::default(); 4];
    let mut count = 0;
    for (index, tex) in polygon.corners() {
        corners[count] = vertices[index].corner(tex);
        count += 1;
    }
    fill_polygon(lock, table, &corners[..count], texture, light);
    true
}
