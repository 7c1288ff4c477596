//! Editor session and command dispatch
//!
//! A `Session` holds everything the editor mutates: the board, the move
//! budget, the selected tile kind and the generator with its RNG. Front ends
//! turn raw input into `Command`s and hand them to `Session::apply`, one at
//! a time.

use crate::board::{BoardState, TileCounts, TileKind};
use crate::codec::{self, CodecError, DecodeWarning, Format, MapDocument, DEFAULT_MAX_MOVES};
use crate::coords::Cube;
use crate::generator::{GenerationReport, GeneratorConfig, MapGenerator, Preserve};
use rand_chacha::ChaCha8Rng;

/// Radius of a fresh session
pub const DEFAULT_RADIUS: u32 = 4;

/// Editor operations
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Select a tile kind; selecting the active kind deselects it
    SelectTile(TileKind),
    /// Click a cell with the active kind
    ClickCell(Cube),
    Resize(u32),
    /// Negative budgets clamp to zero
    SetMaxMoves(i64),
    /// Clear the active kind, or everything when nothing is selected
    Clear,
    Generate(Preserve),
    Load { content: String, format: Format },
    Save(Format),
}

/// Result of a command
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// State may have changed; counts are recomputed
    Updated(TileCounts),
    /// Command had no effect (no active kind, off-board click)
    Ignored,
    Generated {
        report: GenerationReport,
        counts: TileCounts,
    },
    Loaded {
        warnings: Vec<DecodeWarning>,
        counts: TileCounts,
    },
    Saved(String),
}

/// Mutable editor state
#[derive(Clone, Debug)]
pub struct Session {
    board: BoardState,
    max_moves: u32,
    active: Option<TileKind>,
    generator: MapGenerator,
    rng: ChaCha8Rng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, GeneratorConfig::default())
    }
}

impl Session {
    /// Empty board of `radius`; the RNG follows `config.seed`
    pub fn new(radius: u32, config: GeneratorConfig) -> Self {
        let rng = config.rng();
        Self {
            board: BoardState::new(radius),
            max_moves: DEFAULT_MAX_MOVES,
            active: None,
            generator: MapGenerator::new(config),
            rng,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn max_moves(&self) -> u32 {
        self.max_moves
    }

    pub fn active(&self) -> Option<TileKind> {
        self.active
    }

    pub fn counts(&self) -> TileCounts {
        self.board.counts()
    }

    /// Snapshot of board and move budget
    pub fn document(&self) -> MapDocument {
        MapDocument::new(self.board.clone(), self.max_moves)
    }

    /// Run one command to completion.
    ///
    /// Only `Load` and `Save` can fail; a failed load leaves the session as it was.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, CodecError> {
        let outcome = match command {
            Command::SelectTile(kind) => {
                self.active = if self.active == Some(kind) {
                    None
                } else {
                    Some(kind)
                };
                Outcome::Updated(self.counts())
            }
            Command::ClickCell(cell) => {
                let changed = match self.active {
                    Some(kind) => self.board.toggle(cell, kind),
                    None => false,
                };
                if changed {
                    Outcome::Updated(self.counts())
                } else {
                    Outcome::Ignored
                }
            }
            Command::Resize(radius) => {
                self.board.resize(radius);
                Outcome::Updated(self.counts())
            }
            Command::SetMaxMoves(moves) => {
                self.max_moves = moves.clamp(0, u32::MAX as i64) as u32;
                Outcome::Updated(self.counts())
            }
            Command::Clear => {
                self.board.clear_kind(self.active);
                Outcome::Updated(self.counts())
            }
            Command::Generate(preserve) => {
                let (board, report) = self.generator.generate(&self.board, preserve, &mut self.rng);
                self.board = board;
                Outcome::Generated {
                    report,
                    counts: self.counts(),
                }
            }
            Command::Load { content, format } => {
                let decoded = codec::decode(&content, format)?;
                self.board = decoded.document.board;
                self.max_moves = decoded.document.max_moves;
                Outcome::Loaded {
                    warnings: decoded.warnings,
                    counts: self.counts(),
                }
            }
            Command::Save(format) => Outcome::Saved(codec::encode(&self.document(), format)?),
        };

        tracing::debug!(?outcome, "command applied");
        Ok(outcome)
    }
}
