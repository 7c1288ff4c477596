//! Integration tests for the HEXMAP editor
//!
//! Tests the full stack: geometry, symmetry, board edits, generation and
//! both map formats

use hexmap_core::{
    codec, partition_board, BoardState, Command, Cube, Format, GeneratorConfig, Layout,
    MapDocument, MapGenerator, Outcome, Preserve, Session, Tile, TileKind, MAX_GOLD,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn cube(q: i32, r: i32, s: i32) -> Cube {
    Cube::from_qrs(q, r, s).unwrap()
}

/// Generated radius-7 document with a non-default move budget
fn generated_document(seed: u64) -> MapDocument {
    let generator = MapGenerator::new(GeneratorConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (board, _) = generator.generate(&BoardState::new(7), Preserve::None, &mut rng);
    MapDocument::new(board, 64)
}

fn assert_orbits_uniform(board: &BoardState) {
    for orbit in partition_board(board.radius()) {
        let first = board.get(orbit.key());
        for &member in orbit.members() {
            assert_eq!(board.get(member), first, "orbit {:?} is split", orbit);
        }
    }
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("hexmap-{}-{}", std::process::id(), name))
}

// ============================================================================
// EDITING
// ============================================================================

#[test]
fn test_radius_two_danger_scenario() {
    let mut session = Session::new(2, GeneratorConfig::default().with_seed(1));
    assert_eq!(session.board().cells().len(), 0);
    assert_eq!(partition_board(2).iter().map(|o| o.len()).sum::<usize>(), 19);

    session.apply(Command::SelectTile(TileKind::Danger)).unwrap();
    session.apply(Command::ClickCell(cube(1, -1, 0))).unwrap();

    for c in [cube(1, -1, 0), cube(-1, 0, 1), cube(0, 1, -1)] {
        assert_eq!(session.board().get(c), Some(Tile::Danger));
    }
    assert_eq!(session.counts().danger, 3);

    session.apply(Command::ClickCell(cube(1, -1, 0))).unwrap();
    assert!(session.board().is_empty());
}

#[test]
fn test_pixel_click_edits_whole_orbit() {
    let layout = Layout::new(30.0, 1.5);
    let mut session = Session::new(3, GeneratorConfig::default().with_seed(2));
    session.apply(Command::SelectTile(TileKind::Gold)).unwrap();

    let target = cube(2, -3, 1);
    let p = layout.cube_to_pixel(target);
    let clicked = layout.pixel_to_cube(p);
    assert_eq!(clicked, target);

    for _ in 0..MAX_GOLD {
        session.apply(Command::ClickCell(clicked)).unwrap();
    }
    assert_eq!(session.board().get(cube(-3, 1, 2)), Some(Tile::Gold(MAX_GOLD)));
    assert_eq!(session.counts().gold, 18);

    // One more click wraps the stack back to empty
    session.apply(Command::ClickCell(clicked)).unwrap();
    assert!(session.board().is_empty());
}

#[test]
fn test_shrink_then_grow_drops_outer_ring() {
    let mut session = Session::new(4, GeneratorConfig::default().with_seed(3));
    session.apply(Command::SelectTile(TileKind::Shield)).unwrap();
    session.apply(Command::ClickCell(cube(4, -2, -2))).unwrap();
    session.apply(Command::ClickCell(cube(1, -1, 0))).unwrap();

    session.apply(Command::Resize(2)).unwrap();
    session.apply(Command::Resize(4)).unwrap();

    assert_eq!(session.board().get(cube(4, -2, -2)), None);
    assert_eq!(session.board().get(cube(1, -1, 0)), Some(Tile::Shield));
    assert_orbits_uniform(session.board());
}

// ============================================================================
// GENERATION
// ============================================================================

#[test]
fn test_generated_maps_meet_invariants() {
    for seed in 0..10 {
        let doc = generated_document(seed);
        let counts = doc.board.counts();

        assert_orbits_uniform(&doc.board);
        assert!(counts.gold >= 300, "seed {seed}: gold {}", counts.gold);
        assert_eq!(counts.shield, 3);
        for (_, tile) in doc.board.cells() {
            if let Tile::Gold(n) = tile {
                assert!((1..=MAX_GOLD).contains(&n));
            }
        }
    }
}

#[test]
fn test_regenerate_keeps_danger_and_shield() {
    let mut session = Session::new(6, GeneratorConfig::default().with_seed(8));
    session.apply(Command::Generate(Preserve::None)).unwrap();
    let before = session.board().clone();

    let outcome = session.apply(Command::Generate(Preserve::DangerShield)).unwrap();
    let Outcome::Generated { report, .. } = outcome else {
        panic!("expected generation outcome");
    };
    assert!(!report.shield_placed);

    for (cell, tile) in before.cells() {
        if tile.kind() != TileKind::Gold {
            assert_eq!(session.board().get(cell), Some(tile));
        }
    }
}

// ============================================================================
// FILE FORMATS
// ============================================================================

#[test]
fn test_json_round_trip_through_file() {
    let doc = generated_document(11);
    let path = temp_path("round-trip.json");

    codec::save(&doc, &path, Format::Json).unwrap();
    let loaded = codec::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.document, doc);
}

#[test]
fn test_text_round_trip_through_file() {
    let doc = generated_document(12);
    let path = temp_path("round-trip.txt");

    codec::save(&doc, &path, Format::Text).unwrap();
    let loaded = codec::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.document.board, doc.board);
    // Text maps carry no move budget
    assert_eq!(loaded.document.max_moves, codec::DEFAULT_MAX_MOVES);
}

#[test]
fn test_text_to_json_conversion_preserves_board() {
    let doc = generated_document(13);
    let text = codec::encode(&doc, Format::Text).unwrap();

    let from_text = codec::decode(&text, Format::Text).unwrap().document;
    let json = codec::encode(&from_text, Format::Json).unwrap();
    let from_json = codec::decode(&json, Format::Json).unwrap().document;

    assert_eq!(from_json.board, doc.board);
}

#[test]
fn test_session_load_rejects_malformed_json() {
    let mut session = Session::new(2, GeneratorConfig::default().with_seed(4));
    let result = session.apply(Command::Load {
        content: r#"{"cells": []}"#.to_string(),
        format: Format::Json,
    });

    assert!(result.is_err());
    assert_eq!(session.board().radius(), 2);
}
