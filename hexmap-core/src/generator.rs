//! Constrained random map generation
//!
//! Every decision is made per symmetry orbit, so generated boards keep the
//! three-fold symmetry. A pass runs up to three phases:
//!
//! 1. Danger scatter, retried until the free cells stay connected
//! 2. One shield orbit on an empty ring cell triple
//! 3. Gold stacks until the gold quota is reached
//!
//! `Preserve` copies existing danger (and shield) tiles forward; a partial
//! pass then runs only the phase for the next kind in that order.

use crate::board::{non_danger_connected, BoardState, Tile, TileKind, MAX_GOLD};
use crate::symmetry::{partition_board, Orbit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Generator tuning knobs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Gold units to place (sum of stack counts over every cell)
    pub gold_quota: u32,
    /// Danger scatter attempts before settling for a disconnected layout
    pub danger_attempts: u32,
    /// Lower bound of the per-attempt danger probability
    pub danger_probability_min: f64,
    /// Upper bound of the per-attempt danger probability
    pub danger_probability_max: f64,
    /// Largest random step when growing a gold stack
    pub max_gold_increment: u8,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            gold_quota: 300,
            danger_attempts: 10,
            danger_probability_min: 0.10,
            danger_probability_max: 0.30,
            max_gold_increment: 3,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gold_quota(mut self, quota: u32) -> Self {
        self.gold_quota = quota;
        self
    }

    /// Set the danger probability range
    pub fn with_danger_probability(mut self, min: f64, max: f64) -> Self {
        self.danger_probability_min = min;
        self.danger_probability_max = max;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let (min, max) = (self.danger_probability_min, self.danger_probability_max);
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) {
            anyhow::bail!("danger probability must be within [0, 1], got {min}..{max}");
        }
        if min > max {
            anyhow::bail!("danger probability range is empty: {min} > {max}");
        }
        if self.danger_attempts == 0 {
            anyhow::bail!("danger_attempts must be at least 1");
        }
        if self.max_gold_increment == 0 {
            anyhow::bail!("max_gold_increment must be at least 1");
        }
        Ok(())
    }

    /// Load from JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// RNG seeded from `seed`, or from OS entropy
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Which existing tiles survive a regeneration.
///
/// Partial modes regenerate exactly one kind: the one after the kept ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preserve {
    /// Start from an empty board and generate every kind
    #[default]
    None,
    /// Keep danger tiles, generate a new shield; the board ends up without gold
    Danger,
    /// Keep danger and shield tiles, generate gold
    DangerShield,
}

impl Preserve {
    /// Kinds copied forward from the prior board
    pub fn keeps(&self, kind: TileKind) -> bool {
        match self {
            Preserve::None => false,
            Preserve::Danger => kind == TileKind::Danger,
            Preserve::DangerShield => kind != TileKind::Gold,
        }
    }

    /// Kinds generated this pass
    pub fn regenerates(&self, kind: TileKind) -> bool {
        match self {
            Preserve::None => true,
            Preserve::Danger => kind == TileKind::Shield,
            Preserve::DangerShield => kind == TileKind::Gold,
        }
    }
}

impl std::str::FromStr for Preserve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Preserve::None),
            "danger" => Ok(Preserve::Danger),
            "danger-shield" | "danger+shield" => Ok(Preserve::DangerShield),
            other => Err(format!("unknown preserve mode: {other}")),
        }
    }
}

/// What a generation pass actually did
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Danger attempts used (0 when danger was preserved)
    pub danger_attempts: u32,
    /// Whether the committed layout keeps the free cells connected
    pub connected: bool,
    /// Probability drawn for the committed danger attempt
    pub danger_probability: Option<f64>,
    pub shield_placed: bool,
    /// Gold units placed this pass
    pub gold_placed: u32,
    /// False when the board ran out of room before the quota, or when gold
    /// was not generated this pass
    pub quota_met: bool,
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Random map generator
#[derive(Clone, Debug, Default)]
pub struct MapGenerator {
    config: GeneratorConfig,
}

impl MapGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build a new board at `prior`'s radius.
    ///
    /// Tiles of the kinds `preserve` keeps are copied from `prior`, then the
    /// kinds it regenerates are placed. Anything else is left empty.
    pub fn generate<R: Rng>(
        &self,
        prior: &BoardState,
        preserve: Preserve,
        rng: &mut R,
    ) -> (BoardState, GenerationReport) {
        let orbits = partition_board(prior.radius());
        let mut board = carry_forward(prior, preserve);
        let mut report = GenerationReport::default();

        if preserve.regenerates(TileKind::Danger) {
            self.place_danger(&mut board, &orbits, &mut report, rng);
        }
        if preserve.regenerates(TileKind::Shield) {
            report.shield_placed = place_shield(&mut board, &orbits, rng);
        }
        if preserve.regenerates(TileKind::Gold) {
            self.allocate_gold(&mut board, &orbits, &mut report, rng);
        }

        report.connected = board.is_connected();

        tracing::debug!(
            radius = board.radius(),
            ?preserve,
            attempts = report.danger_attempts,
            connected = report.connected,
            gold = report.gold_placed,
            "generated map"
        );

        (board, report)
    }

    /// Scatter danger orbits, retrying until the free cells stay connected.
    /// After the last attempt the final candidate is committed regardless.
    fn place_danger<R: Rng>(
        &self,
        board: &mut BoardState,
        orbits: &[Orbit],
        report: &mut GenerationReport,
        rng: &mut R,
    ) {
        let radius = board.radius();
        let mut candidate: Vec<&Orbit> = Vec::new();

        for attempt in 1..=self.config.danger_attempts {
            let p = rng.gen_range(
                self.config.danger_probability_min..=self.config.danger_probability_max,
            );
            candidate = orbits.iter().filter(|_| rng.gen_bool(p)).collect();

            report.danger_attempts = attempt;
            report.danger_probability = Some(p);

            let cells: FxHashSet<_> = candidate
                .iter()
                .flat_map(|o| o.members().iter().copied())
                .collect();
            if non_danger_connected(radius, &cells) {
                break;
            }
            tracing::debug!(attempt, p, "danger layout disconnected, retrying");

            if attempt == self.config.danger_attempts {
                tracing::warn!(
                    attempts = attempt,
                    "no connected danger layout found, keeping the last attempt"
                );
            }
        }

        for orbit in candidate {
            board.set_tile(orbit.key(), Tile::Danger);
        }
    }

    /// Grow gold stacks on random orbits until `gold_quota` is reached.
    ///
    /// Each step adds at least one unit to a stack below `MAX_GOLD`, so the
    /// loop ends after at most `MAX_GOLD` steps per orbit even when the quota
    /// cannot be met. The last step may overshoot the quota by less than one
    /// orbit's worth; placed stacks are never reduced.
    fn allocate_gold<R: Rng>(
        &self,
        board: &mut BoardState,
        orbits: &[Orbit],
        report: &mut GenerationReport,
        rng: &mut R,
    ) {
        let quota = self.config.gold_quota;
        let max_step = u32::from(self.config.max_gold_increment.max(1));
        let mut placed = 0u32;

        let mut open: Vec<&Orbit> = orbits
            .iter()
            .filter(|o| has_room(board.get(o.key())))
            .collect();

        while placed < quota && !open.is_empty() {
            let idx = rng.gen_range(0..open.len());
            let orbit = open[idx];
            let size = orbit.len() as u32;
            let current = board.get(orbit.key()).map_or(0, |t| t.gold_units());

            let budget_cap = (quota - placed).div_ceil(size);
            let step = rng.gen_range(1..=max_step);
            let add = budget_cap.min(u32::from(MAX_GOLD) - current).min(step);

            let next = current + add;
            board.set_tile(orbit.key(), Tile::Gold(next as u8));
            placed += add * size;

            if next >= u32::from(MAX_GOLD) {
                open.swap_remove(idx);
            }
        }

        report.gold_placed = placed;
        report.quota_met = placed >= quota;
        if !report.quota_met {
            tracing::warn!(placed, quota, "board is full before reaching the gold quota");
        }
    }
}

/// Copy the preserved kinds from `prior` onto an empty board.
fn carry_forward(prior: &BoardState, preserve: Preserve) -> BoardState {
    let mut board = BoardState::new(prior.radius());
    for (orbit, tile) in prior.orbits() {
        if preserve.keeps(tile.kind()) {
            board.set_tile(orbit.key(), tile);
        }
    }
    board
}

/// Pick one empty three-cell orbit for the shield. Returns false if none is left.
fn place_shield<R: Rng>(board: &mut BoardState, orbits: &[Orbit], rng: &mut R) -> bool {
    let available: Vec<&Orbit> = orbits
        .iter()
        .filter(|o| o.len() == 3 && board.get(o.key()).is_none())
        .collect();

    match available.choose(rng) {
        Some(orbit) => board.set_tile(orbit.key(), Tile::Shield),
        None => {
            tracing::debug!("no empty orbit left for a shield");
            false
        }
    }
}

fn has_room(tile: Option<Tile>) -> bool {
    match tile {
        None => true,
        Some(Tile::Gold(n)) => n < MAX_GOLD,
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Cube;
    use crate::symmetry::partition_board;

    fn assert_uniform(board: &BoardState) {
        for orbit in partition_board(board.radius()) {
            let first = board.get(orbit.key());
            for &member in orbit.members() {
                assert_eq!(board.get(member), first);
            }
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(GeneratorConfig::default()
            .with_danger_probability(0.8, 0.2)
            .validate()
            .is_err());
        assert!(GeneratorConfig::default()
            .with_danger_probability(0.1, 1.5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_preserve_parse() {
        assert_eq!("none".parse::<Preserve>(), Ok(Preserve::None));
        assert_eq!("danger+shield".parse::<Preserve>(), Ok(Preserve::DangerShield));
        assert!("gold".parse::<Preserve>().is_err());
    }

    #[test]
    fn test_full_generation_meets_quota() {
        let generator = MapGenerator::default();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (board, report) = generator.generate(&BoardState::new(7), Preserve::None, &mut rng);

            let counts = board.counts();
            assert!(counts.gold >= 300, "seed {seed}: gold {}", counts.gold);
            assert!(counts.gold < 303, "seed {seed}: overshoot {}", counts.gold);
            assert_eq!(counts.gold, report.gold_placed);
            assert!(report.quota_met);
            assert!(report.shield_placed);
            assert_eq!(counts.shield, 3);
            assert_eq!(report.connected, board.is_connected());
            assert_uniform(&board);
        }
    }

    #[test]
    fn test_connected_in_most_runs() {
        let generator = MapGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let runs = 50;
        let connected = (0..runs)
            .filter(|_| {
                let (board, _) = generator.generate(&BoardState::new(5), Preserve::None, &mut rng);
                board.is_connected()
            })
            .count();
        assert!(connected * 10 >= runs * 9, "only {connected}/{runs} connected");
    }

    #[test]
    fn test_small_board_terminates_below_quota() {
        let generator = MapGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (board, report) = generator.generate(&BoardState::new(2), Preserve::None, &mut rng);

        assert!(!report.quota_met);
        for (_, tile) in board.cells() {
            if let Tile::Gold(n) = tile {
                assert_eq!(n, MAX_GOLD);
            }
        }
        assert_eq!(board.counts().gold, report.gold_placed);
    }

    #[test]
    fn test_single_cell_board() {
        let generator = MapGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (board, report) = generator.generate(&BoardState::new(0), Preserve::None, &mut rng);
        assert!(!report.shield_placed);
        assert!(board.counts().gold <= u32::from(MAX_GOLD));
    }

    #[test]
    fn test_preserve_danger_keeps_layout() {
        let mut prior = BoardState::new(5);
        prior.set_tile(Cube::new(2, -1), Tile::Danger);
        prior.set_tile(Cube::new(4, -4), Tile::Danger);
        prior.set_tile(Cube::new(1, 0), Tile::Shield);
        prior.set_tile(Cube::new(3, 0), Tile::Gold(2));

        let generator = MapGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let (board, report) = generator.generate(&prior, Preserve::Danger, &mut rng);

        assert_eq!(report.danger_attempts, 0);
        assert_eq!(board.danger_cells(), prior.danger_cells());
        assert!(report.shield_placed);
        assert_eq!(board.counts().shield, 3);

        // Only the shield is regenerated; prior gold is dropped, none is added
        assert_eq!(board.counts().gold, 0);
        assert_eq!(report.gold_placed, 0);
        assert!(!report.quota_met);
        assert_uniform(&board);
    }

    #[test]
    fn test_preserve_danger_shield_only_regenerates_gold() {
        let mut prior = BoardState::new(5);
        prior.set_tile(Cube::new(2, -1), Tile::Danger);
        prior.set_tile(Cube::new(1, 0), Tile::Shield);
        prior.set_tile(Cube::new(3, 0), Tile::Gold(6));

        let generator = MapGenerator::new(GeneratorConfig::default().with_gold_quota(60));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (board, report) = generator.generate(&prior, Preserve::DangerShield, &mut rng);

        assert_eq!(board.get(Cube::new(2, -1)), Some(Tile::Danger));
        assert_eq!(board.get(Cube::new(1, 0)), Some(Tile::Shield));
        assert!(!report.shield_placed);
        assert_eq!(board.counts().danger, 3);
        assert_eq!(board.counts().shield, 3);
        assert!(board.counts().gold >= 60);
        assert_eq!(board.counts().gold, report.gold_placed);
    }

    #[test]
    fn test_all_danger_board() {
        // Probability 1 puts danger everywhere, which counts as connected.
        let config = GeneratorConfig::default().with_danger_probability(1.0, 1.0);
        let generator = MapGenerator::new(config);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (board, report) = generator.generate(&BoardState::new(3), Preserve::None, &mut rng);
        assert_eq!(report.danger_attempts, 1);
        assert_eq!(board.counts().danger as usize, crate::coords::cell_count(3));
        assert_eq!(report.gold_placed, 0);
    }

    #[test]
    fn test_exhausted_attempts_commit_last_candidate() {
        // Far below the percolation threshold every attempt splits the free cells
        let config = GeneratorConfig::default().with_danger_probability(0.7, 0.7);
        let generator = MapGenerator::new(config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (board, report) = generator.generate(&BoardState::new(8), Preserve::None, &mut rng);

        assert_eq!(report.danger_attempts, 10);
        assert_eq!(report.danger_probability, Some(0.7));
        assert!(!report.connected);
        assert!(!board.is_connected());
        assert!(!board.danger_cells().is_empty());
        assert_uniform(&board);
    }

    #[test]
    fn test_same_seed_same_board() {
        let generator = MapGenerator::default();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        let (first, _) = generator.generate(&BoardState::new(6), Preserve::None, &mut a);
        let (second, _) = generator.generate(&BoardState::new(6), Preserve::None, &mut b);
        assert_eq!(first, second);
    }
}
