use super::edge::EdgeSample;
use crate::display::{argb, rgb_of, FrameLock};
use crate::texture::{LightMap, Texture};

/// Fill one scanline between two edge crossings.
///
/// Each covered pixel is depth tested, textured, brightened by the light map
/// (clamped per channel) and written opaque. Zero-width spans draw nothing.
pub fn draw_span(
    lock: &mut FrameLock<'_>,
    y: u32,
    a: &EdgeSample,
    b: &EdgeSample,
    texture: &Texture,
    light: &LightMap,
) {
    let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
    let x0 = left.x.to_int();
    let x1 = right.x.to_int();
    let width = x1 - x0;
    if width <= 0 {
        return;
    }

    let du = left.u.step_to(right.u, width);
    let dv = left.v.step_to(right.v, width);
    let ds = left.s.step_to(right.s, width);
    let dt = left.t.step_to(right.t, width);
    let dz = left.z.step_to(right.z, width);

    let first = x0.max(0);
    let last = x1.min(lock.width() as i32);
    if first >= last {
        return;
    }

    let skip = first - x0;
    let mut u = left.u + du * skip;
    let mut v = left.v + dv * skip;
    let mut s = left.s + ds * skip;
    let mut t = left.t + dt * skip;
    let mut z = left.z + dz * skip;

    for x in first..last {
        let x = x as u32;
        if lock.depth_passes(x, y, z.raw()) {
            let (r, g, b) = rgb_of(texture.sample_texel(s.to_int(), t.to_int()));
            let lum = light.sample(u.to_int(), v.to_int());
            let pixel = argb(
                r.saturating_add(lum),
                g.saturating_add(lum),
                b.saturating_add(lum),
            );
            lock.write_z(x, y, z.raw(), pixel);
        }
        u += du;
        v += dv;
        s += ds;
        t += dt;
        z += dz;
    }
}
