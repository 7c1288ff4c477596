//! Map file formats
//!
//! JSON:
//! ```text
//! { "map_radius": 4, "max_moves": 100,
//!   "cells": [ {"q": 1, "r": -1, "s": 0, "value": "D"}, ... ] }
//! ```
//!
//! Text (header is cells per edge, i.e. radius + 1; the count line is
//! optional and informational):
//! ```text
//! 5
//! 12
//! 1 -1 0 D
//! 0 1 -1 3
//! ```
//!
//! Decoding never touches a live board: it builds a fresh `MapDocument` or
//! fails as a whole. Cells with unrecognised values, cells off the board and
//! orbit members that disagree with an earlier member are skipped and
//! reported as `DecodeWarning`s.

use crate::board::{BoardState, Tile, MAX_RADIUS};
use crate::coords::Cube;
use crate::symmetry::orbit_key;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Move budget used when a file does not carry one
pub const DEFAULT_MAX_MOVES: u32 = 100;

// ============================================================================
// TYPES
// ============================================================================

/// Board plus the metadata stored alongside it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapDocument {
    pub board: BoardState,
    pub max_moves: u32,
}

impl MapDocument {
    pub fn new(board: BoardState, max_moves: u32) -> Self {
        Self { board, max_moves }
    }
}

/// Supported encodings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Text,
}

impl Format {
    /// `.json` files are JSON, everything else is text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Text,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Text => "txt",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "text" | "txt" => Ok(Format::Text),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

/// Fatal decode failures; nothing is applied when one occurs
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("map file is empty")]
    MissingHeader,

    #[error("line {line}: expected cells per edge, found {found:?}")]
    InvalidHeader { line: usize, found: String },

    #[error("cells per edge must be at least 1")]
    EmptyBoard,

    #[error("board radius {radius} exceeds the maximum of {max}")]
    RadiusTooLarge { radius: u32, max: u32 },

    #[error("{location}: non-integer coordinate {found:?}")]
    InvalidCoordinate { location: String, found: String },

    #[error("{location}: coordinates ({q}, {r}, {s}) do not sum to zero")]
    OffPlane {
        location: String,
        q: i64,
        r: i64,
        s: i64,
    },
}

/// Non-fatal decode findings; the affected entry is skipped
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeWarning {
    UnknownTileValue { location: String, value: String },
    OutsideBoard { location: String, cell: Cube },
    OrbitConflict { location: String, cell: Cube },
    MalformedLine { line: usize },
    CountMismatch { declared: String, actual: usize },
}

impl std::fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeWarning::UnknownTileValue { location, value } => {
                write!(f, "{location}: unknown tile value {value}")
            }
            DecodeWarning::OutsideBoard { location, cell } => {
                write!(f, "{location}: cell {cell} is outside the board")
            }
            DecodeWarning::OrbitConflict { location, cell } => {
                write!(f, "{location}: cell {cell} disagrees with its symmetric cells")
            }
            DecodeWarning::MalformedLine { line } => {
                write!(f, "line {line}: expected `q r s value`")
            }
            DecodeWarning::CountMismatch { declared, actual } => {
                write!(f, "header declares {declared} cells, found {actual}")
            }
        }
    }
}

/// Successful decode: the document plus anything that was skipped
#[derive(Clone, Debug)]
pub struct Decoded {
    pub document: MapDocument,
    pub warnings: Vec<DecodeWarning>,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

pub fn encode(doc: &MapDocument, format: Format) -> Result<String, CodecError> {
    match format {
        Format::Json => encode_json(doc),
        Format::Text => Ok(encode_text(doc)),
    }
}

pub fn decode(input: &str, format: Format) -> Result<Decoded, CodecError> {
    match format {
        Format::Json => decode_json(input),
        Format::Text => decode_text(input),
    }
}

/// Read and decode a map file; the format follows the extension
pub fn load(path: &Path) -> anyhow::Result<Decoded> {
    let content = std::fs::read_to_string(path)?;
    Ok(decode(&content, Format::from_path(path))?)
}

/// Encode and write a map file
pub fn save(doc: &MapDocument, path: &Path, format: Format) -> anyhow::Result<()> {
    let content = encode(doc, format)?;
    std::fs::write(path, content)?;
    Ok(())
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize, Deserialize)]
struct JsonMap {
    map_radius: u32,
    #[serde(default)]
    max_moves: Option<u32>,
    cells: Vec<JsonCell>,
}

#[derive(Serialize, Deserialize)]
struct JsonCell {
    q: i64,
    r: i64,
    s: i64,
    value: Value,
}

pub fn encode_json(doc: &MapDocument) -> Result<String, CodecError> {
    let cells = doc
        .board
        .cells()
        .into_iter()
        .map(|(cell, tile)| JsonCell {
            q: cell.q() as i64,
            r: cell.r() as i64,
            s: cell.s() as i64,
            value: match tile {
                Tile::Danger => Value::from("D"),
                Tile::Shield => Value::from("S"),
                Tile::Gold(n) => Value::from(n),
            },
        })
        .collect();

    let map = JsonMap {
        map_radius: doc.board.radius(),
        max_moves: Some(doc.max_moves),
        cells,
    };
    Ok(serde_json::to_string_pretty(&map)?)
}

pub fn decode_json(input: &str) -> Result<Decoded, CodecError> {
    let map: JsonMap = serde_json::from_str(input)?;
    let mut builder = BoardBuilder::new(checked_radius(map.map_radius)?);

    for (index, cell) in map.cells.iter().enumerate() {
        let location = format!("cells[{index}]");
        let cube = checked_cube(&location, cell.q, cell.r, cell.s)?;
        match json_tile(&cell.value) {
            Some(tile) => builder.place(location, cube, tile),
            None => builder.warn(DecodeWarning::UnknownTileValue {
                location,
                value: cell.value.to_string(),
            }),
        }
    }

    Ok(builder.finish(map.max_moves.unwrap_or(DEFAULT_MAX_MOVES)))
}

fn json_tile(value: &Value) -> Option<Tile> {
    match value {
        Value::String(s) => text_tile(s),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(Tile::gold),
        _ => None,
    }
}

// ============================================================================
// TEXT
// ============================================================================

/// Text files have no move budget; decode uses `DEFAULT_MAX_MOVES`.
pub fn encode_text(doc: &MapDocument) -> String {
    let cells = doc.board.cells();
    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push((doc.board.radius() + 1).to_string());
    lines.push(cells.len().to_string());
    for (cell, tile) in cells {
        let value = match tile {
            Tile::Danger => "D".to_string(),
            Tile::Shield => "S".to_string(),
            Tile::Gold(n) => n.to_string(),
        };
        lines.push(format!("{} {} {} {}", cell.q(), cell.r(), cell.s(), value));
    }
    lines.join("\n")
}

pub fn decode_text(input: &str) -> Result<Decoded, CodecError> {
    // (1-based line number, trimmed content), blank lines dropped
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .peekable();

    let (header_line, header) = lines.next().ok_or(CodecError::MissingHeader)?;
    let per_edge: u32 = header.parse().map_err(|_| CodecError::InvalidHeader {
        line: header_line,
        found: header.to_string(),
    })?;
    if per_edge == 0 {
        return Err(CodecError::EmptyBoard);
    }
    let mut builder = BoardBuilder::new(checked_radius(per_edge - 1)?);

    // The count line is optional: a second line that looks like a cell is one
    let declared = lines
        .next_if(|(_, l)| l.split_whitespace().count() == 1)
        .map(|(_, l)| l.to_string());
    let mut listed = 0usize;

    for (line, content) in lines {
        let parts: Vec<&str> = content.split_whitespace().collect();
        if parts.len() < 4 {
            builder.warn(DecodeWarning::MalformedLine { line });
            continue;
        }
        listed += 1;

        let location = format!("line {line}");
        let mut coords = [0i64; 3];
        for (slot, raw) in coords.iter_mut().zip(&parts[..3]) {
            *slot = raw.parse().map_err(|_| CodecError::InvalidCoordinate {
                location: location.clone(),
                found: raw.to_string(),
            })?;
        }
        let cube = checked_cube(&location, coords[0], coords[1], coords[2])?;

        match text_tile(parts[3]) {
            Some(tile) => builder.place(location, cube, tile),
            None => builder.warn(DecodeWarning::UnknownTileValue {
                location,
                value: parts[3].to_string(),
            }),
        }
    }

    if let Some(declared) = declared {
        if declared.parse::<usize>().ok() != Some(listed) {
            builder.warn(DecodeWarning::CountMismatch {
                declared,
                actual: listed,
            });
        }
    }

    Ok(builder.finish(DEFAULT_MAX_MOVES))
}

fn text_tile(value: &str) -> Option<Tile> {
    match value {
        "D" => Some(Tile::Danger),
        "S" => Some(Tile::Shield),
        other => other.parse::<u8>().ok().and_then(Tile::gold),
    }
}

// ============================================================================
// SHARED
// ============================================================================

fn checked_cube(location: &str, q: i64, r: i64, s: i64) -> Result<Cube, CodecError> {
    let off_plane = || CodecError::OffPlane {
        location: location.to_string(),
        q,
        r,
        s,
    };
    // Anything outside i32 is far off any board, and summing raw i64 input
    // could overflow
    let q = i32::try_from(q).map_err(|_| off_plane())?;
    let r = i32::try_from(r).map_err(|_| off_plane())?;
    let s = i32::try_from(s).map_err(|_| off_plane())?;
    Cube::from_qrs(q, r, s).ok_or_else(off_plane)
}

fn checked_radius(radius: u32) -> Result<u32, CodecError> {
    if radius > MAX_RADIUS {
        return Err(CodecError::RadiusTooLarge {
            radius,
            max: MAX_RADIUS,
        });
    }
    Ok(radius)
}

/// Collects decoded cells into an orbit-uniform board.
/// The first listed member of an orbit decides the orbit's tile.
struct BoardBuilder {
    board: BoardState,
    seen: FxHashMap<Cube, Tile>,
    warnings: Vec<DecodeWarning>,
}

impl BoardBuilder {
    fn new(radius: u32) -> Self {
        Self {
            board: BoardState::new(radius),
            seen: FxHashMap::default(),
            warnings: Vec::new(),
        }
    }

    fn place(&mut self, location: String, cell: Cube, tile: Tile) {
        if !self.board.contains(cell) {
            self.warn(DecodeWarning::OutsideBoard { location, cell });
            return;
        }
        match self.seen.get(&orbit_key(cell)) {
            Some(&existing) if existing != tile => {
                self.warn(DecodeWarning::OrbitConflict { location, cell });
            }
            Some(_) => {}
            None => {
                self.seen.insert(orbit_key(cell), tile);
                self.board.set_tile(cell, tile);
            }
        }
    }

    fn warn(&mut self, warning: DecodeWarning) {
        tracing::warn!("skipping map entry: {warning}");
        self.warnings.push(warning);
    }

    fn finish(self, max_moves: u32) -> Decoded {
        Decoded {
            document: MapDocument::new(self.board, max_moves),
            warnings: self.warnings,
        }
    }
}
