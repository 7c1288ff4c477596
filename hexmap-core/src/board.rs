//! Board state: tile contents keyed by symmetry orbit
//!
//! Tiles are stored once per orbit (under `orbit_key`), so every member of an
//! orbit always reads back the same tile. There is no way to write a single
//! cell on its own.

use crate::coords::{board_cells, Cube};
use crate::symmetry::{orbit_key, Orbit};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Highest gold stack on one cell
pub const MAX_GOLD: u8 = 6;

/// Largest supported board radius (3169 cells)
pub const MAX_RADIUS: u32 = 32;

// ============================================================================
// TILES
// ============================================================================

/// Contents of an occupied cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Danger,
    Shield,
    /// Gold stack, 1..=6
    Gold(u8),
}

impl Tile {
    /// Gold stack, if `count` is in range
    pub fn gold(count: u8) -> Option<Tile> {
        (1..=MAX_GOLD).contains(&count).then_some(Tile::Gold(count))
    }

    pub fn kind(&self) -> TileKind {
        match self {
            Tile::Danger => TileKind::Danger,
            Tile::Shield => TileKind::Shield,
            Tile::Gold(_) => TileKind::Gold,
        }
    }

    /// Contribution of one cell to the gold total
    pub fn gold_units(&self) -> u32 {
        match self {
            Tile::Gold(n) => *n as u32,
            _ => 0,
        }
    }
}

/// Tile kind without payload (what the editor has selected)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Danger,
    Shield,
    Gold,
}

impl std::str::FromStr for TileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "danger" => Ok(TileKind::Danger),
            "s" | "shield" => Ok(TileKind::Shield),
            "g" | "gold" => Ok(TileKind::Gold),
            other => Err(format!("unknown tile kind: {other}")),
        }
    }
}

/// Per-kind totals shown next to the tile buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCounts {
    /// Danger cells
    pub danger: u32,
    /// Shield cells
    pub shield: u32,
    /// Gold units (sum of stack counts over every cell)
    pub gold: u32,
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Tiles on a hex board of a given radius
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardState {
    radius: u32,
    /// orbit key -> tile
    tiles: FxHashMap<Cube, Tile>,
}

impl BoardState {
    /// Empty board; radii above `MAX_RADIUS` are clamped
    pub fn new(radius: u32) -> Self {
        Self {
            radius: clamp_radius(radius),
            tiles: FxHashMap::default(),
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn contains(&self, cell: Cube) -> bool {
        cell.in_radius(self.radius)
    }

    /// Tile at `cell`; off-board cells read as empty
    pub fn get(&self, cell: Cube) -> Option<Tile> {
        if !self.contains(cell) {
            return None;
        }
        self.tiles.get(&orbit_key(cell)).copied()
    }

    /// Write `tile` to every member of `cell`'s orbit.
    /// Returns false (and does nothing) for off-board cells.
    pub fn set_tile(&mut self, cell: Cube, tile: Tile) -> bool {
        if !self.contains(cell) {
            return false;
        }
        self.tiles.insert(orbit_key(cell), tile);
        true
    }

    /// Empty every member of `cell`'s orbit.
    pub fn clear_tile(&mut self, cell: Cube) -> bool {
        if !self.contains(cell) {
            return false;
        }
        self.tiles.remove(&orbit_key(cell));
        true
    }

    /// Editor click with `kind` active.
    ///
    /// Danger/Shield: clear the orbit if it already holds that kind, otherwise
    /// overwrite it. Gold: start at 1 on a non-gold orbit, otherwise add one,
    /// wrapping to empty past `MAX_GOLD`.
    pub fn toggle(&mut self, cell: Cube, kind: TileKind) -> bool {
        if !self.contains(cell) {
            return false;
        }
        let current = self.get(cell);

        match kind {
            TileKind::Danger | TileKind::Shield => {
                if current.map(|t| t.kind()) == Some(kind) {
                    self.clear_tile(cell)
                } else {
                    let tile = if kind == TileKind::Danger {
                        Tile::Danger
                    } else {
                        Tile::Shield
                    };
                    self.set_tile(cell, tile)
                }
            }
            TileKind::Gold => match current {
                Some(Tile::Gold(n)) if n >= MAX_GOLD => self.clear_tile(cell),
                Some(Tile::Gold(n)) => self.set_tile(cell, Tile::Gold(n + 1)),
                _ => self.set_tile(cell, Tile::Gold(1)),
            },
        }
    }

    /// Change the radius, dropping tiles that fall outside it.
    /// Radii above `MAX_RADIUS` are clamped.
    pub fn resize(&mut self, radius: u32) {
        let radius = clamp_radius(radius);
        self.radius = radius;
        self.tiles.retain(|key, _| key.in_radius(radius));
    }

    /// Remove tiles of `kind`, or everything when `kind` is None.
    pub fn clear_kind(&mut self, kind: Option<TileKind>) {
        match kind {
            Some(kind) => self.tiles.retain(|_, tile| tile.kind() != kind),
            None => self.tiles.clear(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Occupied orbits as `(orbit, tile)`, sorted by orbit key
    pub fn orbits(&self) -> Vec<(Orbit, Tile)> {
        let mut entries: Vec<_> = self
            .tiles
            .iter()
            .map(|(&key, &tile)| (Orbit::of(key), tile))
            .collect();
        entries.sort_by_key(|(orbit, _)| orbit.key());
        entries
    }

    /// Occupied cells, one entry per cell, sorted by coordinate
    pub fn cells(&self) -> Vec<(Cube, Tile)> {
        let mut cells: Vec<_> = self
            .tiles
            .iter()
            .flat_map(|(&key, &tile)| {
                Orbit::of(key)
                    .members()
                    .iter()
                    .map(move |&cell| (cell, tile))
                    .collect::<Vec<_>>()
            })
            .collect();
        cells.sort_by_key(|(cell, _)| *cell);
        cells
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.tiles
            .keys()
            .map(|&key| if key == Cube::ORIGIN { 1 } else { 3 })
            .sum()
    }

    pub fn counts(&self) -> TileCounts {
        let mut counts = TileCounts::default();
        for (&key, tile) in &self.tiles {
            let size = if key == Cube::ORIGIN { 1 } else { 3 };
            match tile {
                Tile::Danger => counts.danger += size,
                Tile::Shield => counts.shield += size,
                Tile::Gold(n) => counts.gold += *n as u32 * size,
            }
        }
        counts
    }

    /// Danger cells, expanded per cell
    pub fn danger_cells(&self) -> FxHashSet<Cube> {
        self.cells()
            .into_iter()
            .filter(|(_, tile)| *tile == Tile::Danger)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Whether all non-danger cells form one region
    pub fn is_connected(&self) -> bool {
        non_danger_connected(self.radius, &self.danger_cells())
    }
}

fn clamp_radius(radius: u32) -> u32 {
    if radius > MAX_RADIUS {
        tracing::warn!(radius, max = MAX_RADIUS, "board radius clamped");
    }
    radius.min(MAX_RADIUS)
}

// ============================================================================
// CONNECTIVITY
// ============================================================================

/// BFS from the first non-danger cell; true if it reaches every non-danger
/// cell. A board with no free cell counts as connected.
pub fn non_danger_connected(radius: u32, danger: &FxHashSet<Cube>) -> bool {
    let Some(start) = board_cells(radius).find(|c| !danger.contains(c)) else {
        return true;
    };

    let mut visited = FxHashSet::default();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for next in cell.neighbors() {
            if next.in_radius(radius) && !danger.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    board_cells(radius).all(|c| danger.contains(&c) || visited.contains(&c))
}
