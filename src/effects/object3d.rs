//! Rotating textured pyramid
//!
//! The mesh is lit through a radial light map indexed by the rotated vertex
//! normals and hidden surfaces are resolved with the pixel buffer's depth
//! attachment.

use std::f64::consts::TAU;

use tracing::debug;

use super::{Effect, FrameTime};
use crate::display::PixelBuffer;
use crate::math3d::{Mat3, Vec3};
use crate::raster::{draw_polygon, transform, EdgeTable, Mesh, ObjectPose, ScreenVertex};
use crate::texture::{LightMap, Texture};
use crate::util::Rng;

/// Pyramid half-width in object units
pub const OBJECT_SIZE: f32 = 100.0;

/// Angular speed around X, Y and Z in radians per millisecond
const SPIN: [f64; 3] = [0.0011, 0.0007, 0.0005];

pub struct Object3d {
    mesh: Mesh,
    texture: Texture,
    light: LightMap,
    /// This frame's transformed vertices, one per mesh vertex
    cur: Vec<ScreenVertex>,
    pose: ObjectPose,
    /// Random rotation offsets picked on every entry
    phase: [f32; 3],
    width: u32,
    height: u32,
}

impl Object3d {
    pub fn new(width: u32, height: u32, texture: Texture) -> Self {
        let mesh = Mesh::pyramid(OBJECT_SIZE);
        let cur = vec![ScreenVertex::default(); mesh.vertices.len()];
        let mut object = Self {
            mesh,
            texture,
            light: LightMap::radial(),
            cur,
            pose: ObjectPose::default(),
            phase: [0.0; 3],
            width,
            height,
        };
        object.animate(0);
        object
    }

    fn animate(&mut self, now_ms: u64) {
        self.pose = pose_at(now_ms, self.phase);
        transform(&self.mesh, &self.pose, self.width, self.height, &mut self.cur);
    }

    pub fn pose(&self) -> &ObjectPose {
        &self.pose
    }

    pub fn vertices(&self) -> &[ScreenVertex] {
        &self.cur
    }
}

/// Orientation and position at demo time `now_ms`
pub fn pose_at(now_ms: u64, phase: [f32; 3]) -> ObjectPose {
    let t = now_ms as f64;
    // wrap before narrowing so long runs keep full angular precision
    let angle = |axis: usize| ((t * SPIN[axis]) % TAU) as f32 + phase[axis];

    ObjectPose {
        rotation: Mat3::rotation_xyz(angle(0), angle(1), angle(2)),
        position: Vec3::new(
            (90.0 * (t / 1300.0).sin()) as f32,
            (60.0 * (t / 1700.0).cos()) as f32,
            (420.0 + 80.0 * (t / 2100.0).sin()) as f32,
        ),
    }
}

impl Effect for Object3d {
    fn reset(&mut self, rng: &mut Rng) {
        for p in &mut self.phase {
            *p = rng.range_f32(0.0, TAU as f32);
        }
        debug!(phase = ?self.phase, "object rotation reseeded");
    }

    fn update(&mut self, time: FrameTime, _rng: &mut Rng) {
        self.animate(time.now_ms);
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        buffer.ensure_depth();
        buffer.clear_depth();
        let mut table = EdgeTable::new(buffer.height());
        let mut lock = buffer.lock();
        for polygon in &self.mesh.polygons {
            draw_polygon(
                &mut lock,
                &mut table,
                polygon,
                &self.pose,
                &self.cur,
                &self.texture,
                &self.light,
            );
        }
    }

    fn name(&self) -> &str {
        "Object3D"
    }
}
