//! Property tests for template rotation, blood accumulation and whole-floor
//! generation.

use proptest::prelude::*;
use shamble::{content, CharGrid, GameConfig, Tile};

fn char_grid() -> impl Strategy<Value = Vec<String>> {
    (1_usize..7, 1_usize..7).prop_flat_map(|(width, height)| {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!['#', '.', 'D', 'z', 'R', '?']), width)
                .prop_map(|row| row.into_iter().collect::<String>()),
            height,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn four_quarter_turns_restore_the_grid(rows in char_grid()) {
        let grid = CharGrid::from_rows(&rows).unwrap();
        let turned = grid
            .rotate_clockwise()
            .rotate_clockwise()
            .rotate_clockwise()
            .rotate_clockwise();
        prop_assert_eq!(turned.rows(), rows);
    }

    #[test]
    fn quarter_turn_swaps_dimensions(rows in char_grid()) {
        let grid = CharGrid::from_rows(&rows).unwrap();
        let turned = grid.rotate_clockwise();
        prop_assert_eq!(turned.width(), grid.height());
        prop_assert_eq!(turned.height(), grid.width());
    }

    #[test]
    fn blood_never_exceeds_max(amounts in prop::collection::vec(0_u32..50, 0..20), max in 0_u32..30) {
        let mut tile = Tile::default();
        let mut previous = 0;
        for amount in amounts {
            let blood = tile.splatter(amount, max);
            prop_assert!(blood <= max);
            prop_assert!(blood >= previous);
            previous = blood;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_seed_yields_a_valid_floor(seed in any::<u64>()) {
        let (state, layout) = content::generate_default_floor(GameConfig::new(seed)).unwrap();
        prop_assert_eq!(layout.rooms.len(), 4);
        prop_assert!(state.player().is_some());
        prop_assert_eq!(state.tiles.iter().filter(|(_, tile)| tile.exit).count(), 1);
        for &door in &layout.doors {
            prop_assert!(state.is_walkable(door) || state.furniture.first_at(door, |f| f.door.is_some()).is_some());
        }
    }
}
