//! Scanline edge table
//!
//! Each polygon edge is walked top to bottom and its interpolated attributes
//! are recorded per screen row. A convex silhouette crosses each row at most
//! twice, so the table keeps two slots per row.

use crate::fixed::{Q16, Q4};

/// Polygon corner in screen space with everything the span filler needs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeVertex {
    pub x: f32,
    pub y: f32,
    /// Light map coordinates, from the rotated vertex normal
    pub u: Q16,
    pub v: Q16,
    /// Texture coordinates, fixed per polygon corner
    pub s: Q16,
    pub t: Q16,
    pub z: Q4,
}

/// Interpolated attributes where an edge crosses a scanline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeSample {
    pub x: Q16,
    pub u: Q16,
    pub v: Q16,
    pub s: Q16,
    pub t: Q16,
    pub z: Q4,
}

impl EdgeSample {
    fn from_vertex(v: &EdgeVertex) -> Self {
        Self {
            x: Q16::from_f32(v.x),
            u: v.u,
            v: v.v,
            s: v.s,
            t: v.t,
            z: v.z,
        }
    }

    /// Per-step deltas to walk from `self` to `end` in `steps` steps
    fn step_to(&self, end: &Self, steps: i32) -> Self {
        Self {
            x: self.x.step_to(end.x, steps),
            u: self.u.step_to(end.u, steps),
            v: self.v.step_to(end.v, steps),
            s: self.s.step_to(end.s, steps),
            t: self.t.step_to(end.t, steps),
            z: self.z.step_to(end.z, steps),
        }
    }

    /// Advance by `n` steps of `delta`
    fn advance(&mut self, delta: &Self, n: i32) {
        self.x += delta.x * n;
        self.u += delta.u * n;
        self.v += delta.v * n;
        self.s += delta.s * n;
        self.t += delta.t * n;
        self.z += delta.z * n;
    }
}

/// Two crossing slots per screen row plus the row range touched by the
/// current polygon
pub struct EdgeTable {
    rows: Vec<[EdgeSample; 2]>,
    counts: Vec<u8>,
    min_y: i32,
    max_y: i32,
}

impl EdgeTable {
    pub fn new(height: u32) -> Self {
        Self {
            rows: vec![[EdgeSample::default(); 2]; height as usize],
            counts: vec![0; height as usize],
            min_y: i32::MAX,
            max_y: i32::MIN,
        }
    }

    /// Forget the previous polygon
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.min_y = i32::MAX;
        self.max_y = i32::MIN;
    }

    /// Record a crossing; a third crossing on the same row is dropped
    fn push(&mut self, y: usize, sample: EdgeSample) {
        let count = &mut self.counts[y];
        if *count < 2 {
            self.rows[y][*count as usize] = sample;
            *count += 1;
        }
    }

    /// Both crossings of row `y`, if the row was fully scanned
    pub fn row(&self, y: i32) -> Option<(EdgeSample, EdgeSample)> {
        let idx = usize::try_from(y).ok()?;
        match self.counts.get(idx) {
            Some(2) => Some((self.rows[idx][0], self.rows[idx][1])),
            _ => None,
        }
    }

    /// Number of crossings recorded on row `y`
    pub fn crossings(&self, y: usize) -> u8 {
        self.counts.get(y).copied().unwrap_or(0)
    }

    /// Inclusive row range of the scanned polygon clipped to the table,
    /// None if nothing lands on screen
    pub fn clipped_rows(&self) -> Option<(i32, i32)> {
        let top = self.min_y.max(0);
        let bottom = self.max_y.min(self.rows.len() as i32 - 1);
        (top <= bottom).then_some((top, bottom))
    }

    /// Walk one edge into the table.
    ///
    /// Rows are half-open `[top, bottom)` so a vertex shared by two edges is
    /// counted once per side. Horizontal edges contribute nothing.
    pub fn scan_edge(&mut self, a: &EdgeVertex, b: &EdgeVertex) {
        let (top, bottom) = if a.y <= b.y { (a, b) } else { (b, a) };
        let y0 = top.y.round() as i32;
        let y1 = bottom.y.round() as i32;
        let dy = y1 - y0;
        if dy <= 0 {
            return;
        }

        self.min_y = self.min_y.min(y0);
        self.max_y = self.max_y.max(y1 - 1);

        let first = y0.max(0);
        let last = y1.min(self.rows.len() as i32);
        if first >= last {
            return;
        }

        let mut sample = EdgeSample::from_vertex(top);
        let delta = sample.step_to(&EdgeSample::from_vertex(bottom), dy);
        sample.advance(&delta, first - y0);

        for y in first..last {
            self.push(y as usize, sample);
            sample.advance(&delta, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32) -> EdgeVertex {
        EdgeVertex {
            x,
            y,
            s: Q16::from_int(x as i32),
            z: Q4::from_int(y as i32),
            ..EdgeVertex::default()
        }
    }

    #[test]
    fn test_scan_interpolates_x() {
        let mut table = EdgeTable::new(20);
        table.scan_edge(&vertex(0.0, 0.0), &vertex(40.0, 10.0));
        for y in 0..10 {
            assert_eq!(table.crossings(y), 1);
            let sample = table.rows[y][0];
            assert_eq!(sample.x, Q16::from_int(4 * y as i32));
            assert_eq!(sample.s, Q16::from_int(4 * y as i32));
            assert_eq!(sample.z, Q4::from_int(y as i32));
        }
        assert_eq!(table.crossings(10), 0);
        assert_eq!(table.clipped_rows(), Some((0, 9)));
    }

    #[test]
    fn test_upward_edge_matches_downward() {
        let mut down = EdgeTable::new(20);
        let mut up = EdgeTable::new(20);
        down.scan_edge(&vertex(3.0, 2.0), &vertex(17.0, 15.0));
        up.scan_edge(&vertex(17.0, 15.0), &vertex(3.0, 2.0));
        assert_eq!(down.rows, up.rows);
        assert_eq!(down.counts, up.counts);
    }

    #[test]
    fn test_horizontal_edge_skipped() {
        let mut table = EdgeTable::new(10);
        table.scan_edge(&vertex(0.0, 4.0), &vertex(9.0, 4.0));
        assert!(table.counts.iter().all(|&c| c == 0));
        assert_eq!(table.clipped_rows(), None);
    }

    #[test]
    fn test_offscreen_rows_clipped_but_interpolated() {
        let mut table = EdgeTable::new(10);
        table.scan_edge(&vertex(0.0, -10.0), &vertex(20.0, 10.0));
        // row 0 is halfway down the edge
        assert_eq!(table.rows[0][0].x, Q16::from_int(10));
        assert_eq!(table.crossings(9), 1);
        assert_eq!(table.clipped_rows(), Some((0, 9)));
    }

    #[test]
    fn test_third_crossing_dropped() {
        let mut table = EdgeTable::new(10);
        table.scan_edge(&vertex(1.0, 0.0), &vertex(1.0, 5.0));
        table.scan_edge(&vertex(2.0, 0.0), &vertex(2.0, 5.0));
        table.scan_edge(&vertex(3.0, 0.0), &vertex(3.0, 5.0));
        let (a, b) = table.row(2).unwrap();
        assert_eq!(a.x, Q16::from_int(1));
        assert_eq!(b.x, Q16::from_int(2));
    }

    #[test]
    fn test_shared_vertex_counted_once_per_side() {
        // triangle with a middle vertex on the right side
        let mut table = EdgeTable::new(20);
        let a = vertex(5.0, 0.0);
        let b = vertex(15.0, 8.0);
        let c = vertex(2.0, 16.0);
        table.scan_edge(&a, &b);
        table.scan_edge(&b, &c);
        table.scan_edge(&c, &a);
        for y in 0..16 {
            assert_eq!(table.crossings(y), 2, "row {y}");
        }
        assert_eq!(table.crossings(16), 0);
    }

    #[test]
    fn test_reset_clears_rows() {
        let mut table = EdgeTable::new(10);
        table.scan_edge(&vertex(0.0, 0.0), &vertex(0.0, 9.0));
        table.reset();
        assert_eq!(table.crossings(3), 0);
        assert_eq!(table.clipped_rows(), None);
    }
}
