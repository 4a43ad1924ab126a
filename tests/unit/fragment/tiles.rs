use super::*;

fn size(w: u32, h: u32) -> PixelSize {
    PixelSize::new(w, h).unwrap()
}

fn params(grid_size: u32) -> FragmentParams {
    FragmentParams {
        grid_size,
        delay_scale: 0.4,
    }
}

#[test]
fn default_grid_is_row_major_and_uniform() {
    let tiles = fragment(size(800, 600), FragmentParams::default()).unwrap();
    assert_eq!(tiles.len(), 64);
    for (i, t) in tiles.iter().enumerate() {
        assert_eq!(t.row, i as u32 / 8);
        assert_eq!(t.col, i as u32 % 8);
        assert_eq!((t.width, t.height), (100, 75));
        assert_eq!((t.x, t.y), (t.col * 100, t.row * 75));
    }
}

#[test]
fn center_tiles_start_first_and_corners_last() {
    let tiles = fragment(size(800, 600), FragmentParams::default()).unwrap();
    for (r, c) in [(3, 3), (3, 4), (4, 3), (4, 4)] {
        assert_eq!(tiles[r * 8 + c].delay, 0.0);
    }
    for (r, c) in [(0, 0), (0, 7), (7, 0), (7, 7)] {
        assert!((tiles[r * 8 + c].delay - 0.4).abs() < 1e-12);
    }
    let corner = tiles[0].distance_from_center;
    assert!((corner - 350.0_f64.hypot(262.5)).abs() < 1e-9);
}

#[test]
fn tiles_cover_buffer_exactly_once_for_uneven_sizes() {
    let tiles = fragment(size(101, 37), params(8)).unwrap();
    let mut hits = vec![0u8; 101 * 37];
    for t in &tiles {
        for y in t.y..t.y + t.height {
            for x in t.x..t.x + t.width {
                hits[(y * 101 + x) as usize] += 1;
            }
        }
    }
    assert!(hits.iter().all(|&h| h == 1));
}

#[test]
fn grids_larger_than_buffer_collapse_into_the_last_tile() {
    let tiles = fragment(size(5, 5), params(8)).unwrap();
    assert_eq!(tiles.len(), 64);
    let filled: Vec<&Tile> = tiles.iter().filter(|t| !t.is_empty()).collect();
    assert_eq!(filled.len(), 1);
    assert_eq!((filled[0].row, filled[0].col), (7, 7));
    assert_eq!((filled[0].width, filled[0].height), (5, 5));
    assert!(tiles.iter().all(|t| t.delay.is_finite()));
}

#[test]
fn no_tile_is_empty_when_buffer_spans_the_grid() {
    let tiles = fragment(size(9, 3), params(3)).unwrap();
    assert!(tiles.iter().all(|t| !t.is_empty()));

    let tiles = fragment(size(9, 8), params(8)).unwrap();
    assert!(tiles.iter().all(|t| !t.is_empty()));
    let widths: Vec<u32> = tiles[..8].iter().map(|t| t.width).collect();
    assert_eq!(widths, vec![1, 1, 1, 1, 1, 1, 1, 2]);
}

#[test]
fn last_column_and_row_absorb_the_remainder() {
    let tiles = fragment(size(801, 603), params(8)).unwrap();
    for t in &tiles {
        let w = if t.col == 7 { 101 } else { 100 };
        let h = if t.row == 7 { 78 } else { 75 };
        assert_eq!((t.width, t.height), (w, h), "tile {},{}", t.row, t.col);
        assert_eq!((t.x, t.y), (t.col * 100, t.row * 75));
    }
}

#[test]
fn single_tile_grid_has_zero_delay() {
    let tiles = fragment(size(320, 200), params(1)).unwrap();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].delay, 0.0);
    assert_eq!(tiles[0].center(), Point::new(160.0, 100.0));
    assert_eq!(tiles[0].rect(), Rect::new(0.0, 0.0, 320.0, 200.0));
}

#[test]
fn equal_distances_get_equal_delays() {
    let tiles = fragment(size(600, 600), params(6)).unwrap();
    let at = |r: usize, c: usize| tiles[r * 6 + c].delay;
    assert_eq!(at(0, 1), at(1, 0));
    assert_eq!(at(0, 1), at(5, 4));
    assert_eq!(at(2, 2), at(3, 3));
}

#[test]
fn fragmenting_is_deterministic() {
    let a = fragment(size(333, 222), params(7)).unwrap();
    let b = fragment(size(333, 222), params(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_params_are_rejected() {
    assert!(fragment(size(10, 10), params(0)).is_err());
    assert!(fragment(size(10, 10), params(MAX_GRID_SIZE + 1)).is_err());
    let bad = FragmentParams {
        grid_size: 4,
        delay_scale: f64::NAN,
    };
    assert!(matches!(bad.validate(), Err(RippleError::Validation(_))));
}
