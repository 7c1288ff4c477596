//! Hex grid geometry with cube coordinates
//!
//! Cells are identified by cube coordinates `(q, r, s)` with `q + r + s = 0`.
//! Axial coordinates drop `s` and are only used on the way to and from pixels.
//! The pixel layout is pointy-top: `x = size·√3·(q + r/2)`, `y = size·1.5·r`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Default hex size in pixels (before zoom)
pub const DEFAULT_HEX_SIZE: f64 = 30.0;

// ============================================================================
// CUBE COORDINATES
// ============================================================================

/// Integer cube coordinate. Invariant: `q + r + s == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cube {
    q: i32,
    r: i32,
    s: i32,
}

impl Cube {
    pub const ORIGIN: Cube = Cube { q: 0, r: 0, s: 0 };

    /// Build from the two axial components; `s` is derived.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Build from all three components, rejecting triples off the `q+r+s=0` plane.
    pub fn from_qrs(q: i32, r: i32, s: i32) -> Option<Self> {
        (q as i64 + r as i64 + s as i64 == 0).then_some(Self { q, r, s })
    }

    pub const fn q(&self) -> i32 {
        self.q
    }

    pub const fn r(&self) -> i32 {
        self.r
    }

    pub const fn s(&self) -> i32 {
        self.s
    }

    /// Distance from the origin: `max(|q|, |r|, |s|)`.
    pub fn ring(&self) -> u32 {
        self.q
            .unsigned_abs()
            .max(self.r.unsigned_abs())
            .max(self.s.unsigned_abs())
    }

    /// Whether the cell lies on a board of the given radius
    pub fn in_radius(&self, radius: u32) -> bool {
        self.ring() <= radius
    }

    pub fn distance_to(&self, other: Cube) -> u32 {
        (*self - other).ring()
    }

    /// One 120° rotation about the origin: `(q, r, s) -> (r, s, q)`.
    pub const fn rotate(&self) -> Cube {
        Cube {
            q: self.r,
            r: self.s,
            s: self.q,
        }
    }

    /// All six adjacent cells, in `DIRECTIONS` order
    pub fn neighbors(&self) -> [Cube; 6] {
        DIRECTIONS.map(|d| *self + d)
    }

    /// Drop `s`.
    pub const fn to_axial(&self) -> Axial {
        Axial {
            q: self.q,
            r: self.r,
        }
    }

    /// Which third of the board the cell falls in, if any.
    pub fn sector(&self) -> Option<Sector> {
        if self.q > 0 && self.r < 0 {
            Some(Sector::Q)
        } else if self.r > 0 && self.s < 0 {
            Some(Sector::R)
        } else if self.s > 0 && self.q < 0 {
            Some(Sector::S)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

impl Add for Cube {
    type Output = Cube;

    #[inline]
    fn add(self, other: Cube) -> Cube {
        Cube {
            q: self.q + other.q,
            r: self.r + other.r,
            s: self.s + other.s,
        }
    }
}

impl Sub for Cube {
    type Output = Cube;

    #[inline]
    fn sub(self, other: Cube) -> Cube {
        Cube {
            q: self.q - other.q,
            r: self.r - other.r,
            s: self.s - other.s,
        }
    }
}

/// Unit steps to the six neighbors
pub const DIRECTIONS: [Cube; 6] = [
    Cube { q: 1, r: -1, s: 0 },
    Cube { q: 1, r: 0, s: -1 },
    Cube { q: 0, r: 1, s: -1 },
    Cube { q: -1, r: 1, s: 0 },
    Cube { q: -1, r: 0, s: 1 },
    Cube { q: 0, r: -1, s: 1 },
];

/// Board thirds used for tinting empty cells.
/// `Cube::rotate` permutes the three sectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Q,
    R,
    S,
}

/// Largest radius whose cells all fit in `i32` components with room for
/// `q + r` sums.
const COORD_LIMIT: u32 = (i32::MAX / 2) as u32;

/// Number of cells on a board of the given radius: `3N² + 3N + 1`.
/// Saturates at `usize::MAX`.
pub fn cell_count(radius: u32) -> usize {
    let n = u64::from(radius);
    n.checked_mul(n)
        .and_then(|sq| sq.checked_mul(3))
        .and_then(|v| v.checked_add(3 * n + 1))
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(usize::MAX)
}

/// Every cell of a radius-`N` board, q-major, r ascending.
///
/// Radii beyond the representable coordinate range are truncated to it.
pub fn board_cells(radius: u32) -> impl Iterator<Item = Cube> {
    let n = radius.min(COORD_LIMIT) as i32;
    (-n..=n).flat_map(move |q| {
        let r1 = (-n).max(-q - n);
        let r2 = n.min(-q + n);
        (r1..=r2).map(move |r| Cube::new(q, r))
    })
}

// ============================================================================
// AXIAL / FRACTIONAL COORDINATES
// ============================================================================

/// Integer axial coordinate (cube with `s` dropped)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    pub const fn to_cube(&self) -> Cube {
        Cube::new(self.q, self.r)
    }
}

/// Unrounded axial coordinate, as produced by `Layout::pixel_to_axial`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FracAxial {
    pub q: f64,
    pub r: f64,
}

impl FracAxial {
    pub fn to_cube(&self) -> FracCube {
        FracCube {
            q: self.q,
            r: self.r,
            s: -self.q - self.r,
        }
    }
}

impl From<Axial> for FracAxial {
    fn from(a: Axial) -> Self {
        Self {
            q: a.q as f64,
            r: a.r as f64,
        }
    }
}

/// Unrounded cube coordinate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FracCube {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl FracCube {
    pub fn round(&self) -> Cube {
        cube_round(self.q, self.r, self.s)
    }
}

/// Snap a fractional cube coordinate to the nearest cell.
///
/// Each component is rounded on its own, then the one with the largest
/// rounding error is recomputed from the other two. Ties resolve q first,
/// then r, then s.
pub fn cube_round(q: f64, r: f64, s: f64) -> Cube {
    let mut rq = q.round();
    let mut rr = r.round();
    let mut rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    } else {
        rs = -rq - rr;
    }

    Cube {
        q: rq as i32,
        r: rr as i32,
        s: rs as i32,
    }
}

// ============================================================================
// PIXEL LAYOUT
// ============================================================================

/// Pixel position relative to the board center
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Renderer parameters: base hex size and zoom factor
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub hex_size: f64,
    pub scale: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            hex_size: DEFAULT_HEX_SIZE,
            scale: 1.0,
        }
    }
}

impl Layout {
    pub const fn new(hex_size: f64, scale: f64) -> Self {
        Self { hex_size, scale }
    }

    /// Effective size after zoom
    pub fn size(&self) -> f64 {
        self.hex_size * self.scale
    }

    pub fn axial_to_pixel(&self, axial: impl Into<FracAxial>) -> Point {
        let a = axial.into();
        let size = self.size();
        Point {
            x: size * SQRT_3 * (a.q + a.r / 2.0),
            y: size * 1.5 * a.r,
        }
    }

    /// Exact inverse of `axial_to_pixel` (no rounding).
    pub fn pixel_to_axial(&self, p: Point) -> FracAxial {
        let size = self.size();
        FracAxial {
            q: (SQRT_3 / 3.0 * p.x - p.y / 3.0) / size,
            r: (2.0 / 3.0 * p.y) / size,
        }
    }

    pub fn cube_to_pixel(&self, cube: Cube) -> Point {
        self.axial_to_pixel(cube.to_axial())
    }

    pub fn pixel_to_cube(&self, p: Point) -> Cube {
        self.pixel_to_axial(p).to_cube().round()
    }

    /// Corner positions of a pointy-top hex centered at `center`
    pub fn corners(&self, center: Point) -> [Point; 6] {
        let size = self.size();
        std::array::from_fn(|i| {
            let angle = (60.0 * i as f64 - 30.0).to_radians();
            Point {
                x: center.x + size * angle.cos(),
                y: center.y + size * angle.sin(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_invariant() {
        let c = Cube::new(2, -3);
        assert_eq!(c.s(), 1);
        assert!(Cube::from_qrs(1, -1, 0).is_some());
        assert!(Cube::from_qrs(1, 1, 1).is_none());
    }

    #[test]
    fn test_cell_count_matches_enumeration() {
        for radius in 0..8 {
            assert_eq!(board_cells(radius).count(), cell_count(radius));
            assert!(board_cells(radius).all(|c| c.in_radius(radius)));
        }
        assert_eq!(cell_count(2), 19);
    }

    #[test]
    fn test_huge_radius_does_not_overflow() {
        assert_eq!(cell_count(4_000_000_000), usize::MAX);
        assert!(board_cells(1 << 30).next().is_some());
        assert!(board_cells(3_000_000_000).next().is_some());
        assert!(board_cells(u32::MAX).take(10).all(|c| Cube::from_qrs(c.q(), c.r(), c.s()).is_some()));
    }

    #[test]
    fn test_rotate_cycles_in_three() {
        let c = Cube::new(3, -1);
        assert_ne!(c.rotate(), c);
        assert_eq!(c.rotate().rotate().rotate(), c);
        assert_eq!(c.rotate().ring(), c.ring());
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let c = Cube::new(1, 2);
        for n in c.neighbors() {
            assert_eq!(c.distance_to(n), 1);
            assert_eq!(n.q() + n.r() + n.s(), 0);
        }
    }

    #[test]
    fn test_pixel_round_trip() {
        let layout = Layout::new(24.0, 1.37);
        for cube in board_cells(6) {
            let p = layout.cube_to_pixel(cube);
            assert_eq!(layout.pixel_to_cube(p), cube, "round trip failed for {cube}");
        }
    }

    #[test]
    fn test_axial_to_pixel_orientation() {
        let layout = Layout::new(10.0, 1.0);
        let p = layout.axial_to_pixel(Axial { q: 1, r: 0 });
        assert!((p.x - 10.0 * SQRT_3).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);

        let p = layout.axial_to_pixel(Axial { q: 0, r: 2 });
        assert!((p.x - 10.0 * SQRT_3).abs() < 1e-9);
        assert!((p.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_to_axial_is_unrounded() {
        let layout = Layout::default();
        let a = layout.pixel_to_axial(Point::new(5.0, 7.0));
        let back = layout.axial_to_pixel(a);
        assert!((back.x - 5.0).abs() < 1e-9);
        assert!((back.y - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_cube_round_tie_break_order() {
        // q has the largest error: q is recomputed
        assert_eq!(cube_round(0.4, 0.3, -0.7), Cube::new(1, 0));
        // q/r tie: q is not strictly largest, so r is recomputed
        assert_eq!(cube_round(0.4, 0.4, -0.8), Cube::from_qrs(0, 1, -1).unwrap());
        // equal r/s error falls through to s
        assert_eq!(cube_round(0.0, 0.5, -0.5), Cube::from_qrs(0, 1, -1).unwrap());
    }

    #[test]
    fn test_sectors() {
        assert_eq!(Cube::new(1, -1).sector(), Some(Sector::Q));
        assert_eq!(Cube::new(0, 1).sector(), Some(Sector::R));
        assert_eq!(Cube::new(-1, 0).sector(), Some(Sector::S));
        assert_eq!(Cube::ORIGIN.sector(), None);
        assert_eq!(Cube::new(1, 0).sector(), None);
        let c = Cube::new(2, -1);
        assert_eq!(c.sector(), Some(Sector::Q));
        assert_eq!(c.rotate().sector(), Some(Sector::S));
    }

    #[test]
    fn test_corners() {
        let layout = Layout::new(10.0, 1.0);
        let corners = layout.corners(Point::new(0.0, 0.0));
        for c in corners {
            let d = (c.x * c.x + c.y * c.y).sqrt();
            assert!((d - 10.0).abs() < 1e-9);
        }
    }
}
