use super::*;
use crate::foundation::core::{PixelSize, Rgba8};
use crate::fragment::tiles::{FragmentParams, fragment};

fn red_buffer(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::filled(PixelSize::new(w, h).unwrap(), Rgba8::opaque(255, 0, 0))
}

fn single_tile(size: PixelSize) -> Vec<Tile> {
    fragment(
        size,
        FragmentParams {
            grid_size: 1,
            delay_scale: 0.4,
        },
    )
    .unwrap()
}

#[test]
fn alpha_correction_forces_opacity_and_is_idempotent() {
    let mut px = vec![
        10, 20, 30, 0, // color with zero alpha
        0, 0, 0, 0, // untouched
        1, 2, 3, 128, // partial
        0, 0, 0, 255, // opaque black
    ];
    alpha_correct(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0, 1, 2, 3, 255, 0, 0, 0, 255]);
    let once = px.clone();
    alpha_correct(&mut px);
    assert_eq!(px, once);
}

#[test]
fn extract_tile_copies_rows() {
    let mut data = Vec::new();
    for i in 0..(4 * 3) {
        data.extend_from_slice(&[i as u8, 0, 0, 255]);
    }
    let buffer = PixelBuffer::new(4, 3, data).unwrap();
    let tile = Tile {
        row: 0,
        col: 1,
        x: 2,
        y: 1,
        width: 2,
        height: 2,
        distance_from_center: 0.0,
        delay: 0.0,
    };
    let px = extract_tile(&buffer, &tile).unwrap();
    let reds: Vec<u8> = px.chunks_exact(4).map(|p| p[0]).collect();
    assert_eq!(reds, vec![6, 7, 10, 11]);

    let outside = Tile { x: 3, ..tile };
    assert!(matches!(
        extract_tile(&buffer, &outside),
        Err(RippleError::Render(_))
    ));
}

#[test]
fn nothing_is_drawn_before_any_delay_passes() {
    let size = PixelSize::new(80, 60).unwrap();
    let buffer = red_buffer(80, 60);
    let tiles = fragment(size, FragmentParams::default()).unwrap();
    let mut surface = Surface::new(size).unwrap();
    let stats = Compositor::default()
        .composite(&buffer, &tiles, 0.0, &mut surface)
        .unwrap();
    assert_eq!(stats.drawn, 0);
    assert_eq!(stats.hidden, 64);
    assert!(surface.is_blank());
}

#[test]
fn mid_animation_draws_translucent_tile() {
    let size = PixelSize::new(100, 100).unwrap();
    let buffer = red_buffer(100, 100);
    let tiles = single_tile(size);
    let mut surface = Surface::new(size).unwrap();
    let stats = Compositor::default()
        .composite(&buffer, &tiles, 0.3, &mut surface)
        .unwrap();
    assert_eq!(
        stats,
        CompositeStats {
            drawn: 1,
            hidden: 0,
            substituted: 0
        }
    );

    let img = surface.to_rgba_image().unwrap();
    let center = img.get_pixel(50, 50).0;
    assert!(center[0] >= 240, "{center:?}");
    assert!((150..=210).contains(&center[3]), "{center:?}");
    assert_eq!(img.get_pixel(1, 1).0[3], 0);
}

#[test]
fn redraw_at_same_progress_is_identical() {
    let size = PixelSize::new(64, 48).unwrap();
    let buffer = red_buffer(64, 48);
    let tiles = fragment(size, FragmentParams::default()).unwrap();
    let compositor = Compositor::default();
    let mut surface = Surface::new(size).unwrap();

    compositor.composite(&buffer, &tiles, 0.45, &mut surface).unwrap();
    let first = surface.data().to_vec();
    compositor.composite(&buffer, &tiles, 0.45, &mut surface).unwrap();
    assert_eq!(surface.data(), first.as_slice());
}

#[test]
fn fully_faded_frame_is_blank() {
    let size = PixelSize::new(64, 48).unwrap();
    let buffer = red_buffer(64, 48);
    let tiles = fragment(size, FragmentParams::default()).unwrap();
    let mut surface = Surface::new(size).unwrap();
    let stats = Compositor::default()
        .composite(&buffer, &tiles, 1.0, &mut surface)
        .unwrap();
    assert_eq!(stats.drawn, 0);
    assert!(surface.is_blank());
}

#[test]
fn mismatched_surface_is_a_render_error() {
    let buffer = red_buffer(10, 10);
    let mut surface = Surface::new(PixelSize::new(5, 5).unwrap()).unwrap();
    let err = Compositor::default()
        .composite(&buffer, &[], 0.5, &mut surface)
        .unwrap_err();
    assert!(matches!(err, RippleError::Render(_)));
}

#[test]
fn placeholder_tile_has_border_tag_and_white_body() {
    let px = placeholder_tile(60, 40);
    assert_eq!(px.len(), 60 * 40 * 4);
    let at = |x: usize, y: usize| &px[(y * 60 + x) * 4..(y * 60 + x) * 4 + 4];
    assert_eq!(at(0, 0), &[0xe5, 0xe7, 0xeb, 255]);
    assert_eq!(at(59, 39), &[0xe5, 0xe7, 0xeb, 255]);
    assert_eq!(at(10, 25), &[0xf1, 0xf5, 0xf9, 255]);
    assert_eq!(at(50, 10), &[255, 255, 255, 255]);

    // Tag box is clipped by small tiles.
    let tiny = placeholder_tile(8, 8);
    assert!(tiny.chunks_exact(4).all(|p| p[3] == 255));
    assert!(tiny.chunks_exact(4).all(|p| p[..3] != [0xf1, 0xf5, 0xf9]));
}

#[test]
fn fully_transparent_tiles_are_drawn_as_placeholders() {
    let size = PixelSize::new(100, 100).unwrap();
    let buffer = PixelBuffer::filled(size, Rgba8::transparent());
    let tiles = single_tile(size);
    let mut surface = Surface::new(size).unwrap();
    let stats = Compositor::default()
        .composite(&buffer, &tiles, 0.3, &mut surface)
        .unwrap();
    assert_eq!(stats.drawn, 1);
    assert_eq!(stats.substituted, 1);
    assert!(!surface.is_blank());

    let img = surface.to_rgba_image().unwrap();
    let center = img.get_pixel(50, 50).0;
    assert!(center[0] >= 240 && center[1] >= 240 && center[2] >= 240, "{center:?}");
    assert!(center[3] > 0, "{center:?}");
}

#[test]
fn tiles_with_any_visible_pixel_keep_their_content() {
    let size = PixelSize::new(20, 20).unwrap();
    let mut data = vec![0u8; size.byte_len()];
    data[..4].copy_from_slice(&[0, 0, 255, 1]);
    let buffer = PixelBuffer::new(20, 20, data).unwrap();
    let mut surface = Surface::new(size).unwrap();
    let stats = Compositor::default()
        .composite(&buffer, &single_tile(size), 0.3, &mut surface)
        .unwrap();
    assert_eq!(stats.substituted, 0);
    let img = surface.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(10, 10).0[3], 0);
}
