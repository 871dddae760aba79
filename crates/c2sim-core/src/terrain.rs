#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Obstruction raster covering the map, one cell per world unit.
///
/// Cells outside the raster count as obstructed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Terrain {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
}

impl Terrain {
    pub fn open(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "terrain must be non-empty");
        Self {
            width,
            height,
            blocked: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Build from rows listed south to north (`rows[y][x]`), non-zero = obstructed.
    pub fn from_rows(rows: &[Vec<u8>]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        let mut terrain = Self::open(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as u32, width, "terrain rows must have equal length");
            for (x, cell) in row.iter().enumerate() {
                terrain.set_blocked(x as i32, y as i32, *cell != 0);
            }
        }
        terrain
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        if let Some(idx) = self.idx(x, y) {
            self.blocked[idx] = blocked;
        }
    }

    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).map(|idx| self.blocked[idx]).unwrap_or(true)
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + x as usize)
    }

    /// Whether moving in a straight line from `from` to `to` crosses an obstructed cell.
    ///
    /// Candidate cells lie on the start row (or column) between the truncated
    /// endpoints along the dominant axis; each obstructed candidate is tested
    /// against the segment geometrically.
    pub fn crossing(&self, from: (f32, f32), to: (f32, f32)) -> bool {
        let (fx, fy) = (from.0.floor() as i32, from.1.floor() as i32);
        let (tx, ty) = (to.0.floor() as i32, to.1.floor() as i32);
        let along_x = (tx - fx).abs() >= (ty - fy).abs();

        let (lo, hi) = if along_x {
            (fx.min(tx), fx.max(tx))
        } else {
            (fy.min(ty), fy.max(ty))
        };

        (lo..=hi).any(|i| {
            let (cx, cy) = if along_x { (i, fy) } else { (fx, i) };
            self.is_blocked(cx, cy) && segment_touches_cell(from, to, cx, cy)
        })
    }
}

type P = (f32, f32);

fn cross(o: P, a: P, b: P) -> f32 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

fn within(a: P, b: P, p: P) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

/// Closed-segment intersection via signed areas.
pub fn segments_intersect(p1: P, p2: P, q1: P, q2: P) -> bool {
    let d1 = cross(p1, p2, q1);
    let d2 = cross(p1, p2, q2);
    let d3 = cross(q1, q2, p1);
    let d4 = cross(q1, q2, p2);

    if d1 == 0.0 && d2 == 0.0 {
        // collinear: overlap iff an endpoint of one lies on the other
        return within(p1, p2, q1) || within(p1, p2, q2) || within(q1, q2, p1) || within(q1, q2, p2);
    }
    d1 * d2 <= 0.0 && d3 * d4 <= 0.0
}

fn segment_touches_cell(from: P, to: P, cx: i32, cy: i32) -> bool {
    let (x0, y0) = (cx as f32, cy as f32);
    let (x1, y1) = (x0 + 1.0, y0 + 1.0);
    let inside = |p: P| p.0 >= x0 && p.0 < x1 && p.1 >= y0 && p.1 < y1;
    if inside(from) || inside(to) {
        return true;
    }

    let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
    (0..4).any(|i| segments_intersect(from, to, corners[i], corners[(i + 1) % 4]))
}
