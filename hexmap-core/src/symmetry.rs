//! Three-fold rotational symmetry of the board
//!
//! Cells related by the cyclic permutation `(q,r,s) -> (r,s,q) -> (s,q,r)`
//! form an orbit. The origin is the only fixed point, so every orbit has
//! either 1 member (the origin) or 3 distinct members. Rotation preserves
//! `Cube::ring`, so an orbit never straddles the board edge.

use crate::coords::{board_cells, Cube};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// The members of one symmetry orbit, sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Orbit {
    members: Vec<Cube>,
}

impl Orbit {
    /// Orbit containing `cell`
    pub fn of(cell: Cube) -> Self {
        let mut members = vec![cell, cell.rotate(), cell.rotate().rotate()];
        members.sort_unstable();
        members.dedup();
        Self { members }
    }

    /// Canonical representative: the smallest member.
    /// Every member of the orbit maps to the same key.
    pub fn key(&self) -> Cube {
        self.members[0]
    }

    pub fn members(&self) -> &[Cube] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    pub fn contains(&self, cell: Cube) -> bool {
        self.members.contains(&cell)
    }

    /// Ring shared by every member
    pub fn ring(&self) -> u32 {
        self.key().ring()
    }
}

/// Canonical key of the orbit containing `cell`, without allocating.
pub fn orbit_key(cell: Cube) -> Cube {
    let a = cell.rotate();
    let b = a.rotate();
    cell.min(a).min(b)
}

/// Split a radius-`N` board into orbits.
///
/// Orbits come out in the order their first member appears in `board_cells`,
/// each reported exactly once.
pub fn partition_board(radius: u32) -> Vec<Orbit> {
    let mut seen = FxHashSet::default();
    let mut orbits = Vec::new();

    for cell in board_cells(radius) {
        if seen.insert(orbit_key(cell)) {
            orbits.push(Orbit::of(cell));
        }
    }

    orbits
}

/// Number of orbits on a radius-`N` board: the origin plus a third of the rest.
pub fn orbit_count(radius: u32) -> usize {
    1 + (crate::coords::cell_count(radius) - 1) / 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::cell_count;

    #[test]
    fn test_origin_is_singleton() {
        let orbit = Orbit::of(Cube::ORIGIN);
        assert!(orbit.is_singleton());
        assert_eq!(orbit.members(), &[Cube::ORIGIN]);
    }

    #[test]
    fn test_orbit_sizes_and_closure() {
        for radius in 0..7 {
            for cell in board_cells(radius) {
                let orbit = Orbit::of(cell);
                if cell == Cube::ORIGIN {
                    assert_eq!(orbit.len(), 1);
                } else {
                    assert_eq!(orbit.len(), 3, "orbit of {cell}");
                }
                assert!(orbit.contains(cell));
                for &member in orbit.members() {
                    assert_eq!(Orbit::of(member), orbit);
                    assert_eq!(orbit_key(member), orbit.key());
                    assert!(member.in_radius(radius));
                }
            }
        }
    }

    #[test]
    fn test_known_orbit() {
        let orbit = Orbit::of(Cube::new(1, -1));
        let mut expected = vec![
            Cube::new(1, -1),
            Cube::new(-1, 0),
            Cube::new(0, 1),
        ];
        expected.sort();
        assert_eq!(orbit.members(), expected.as_slice());
    }

    #[test]
    fn test_partition_covers_board_once() {
        for radius in 0..7 {
            let orbits = partition_board(radius);
            assert_eq!(orbits.len(), orbit_count(radius));

            let mut cells: Vec<Cube> = orbits
                .iter()
                .flat_map(|o| o.members().iter().copied())
                .collect();
            assert_eq!(cells.len(), cell_count(radius));
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), cell_count(radius));
        }
    }

    #[test]
    fn test_partition_radius_two() {
        let orbits = partition_board(2);
        assert_eq!(orbits.len(), 7);
        assert_eq!(orbits.iter().filter(|o| o.is_singleton()).count(), 1);
    }
}
