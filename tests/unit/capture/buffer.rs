use super::*;

#[test]
fn new_rejects_zero_size_and_bad_length() {
    assert!(PixelBuffer::new(0, 4, vec![]).is_err());
    assert!(PixelBuffer::new(2, 2, vec![0; 15]).is_err());
    let b = PixelBuffer::new(2, 2, vec![0; 16]).unwrap();
    assert_eq!(b.size(), PixelSize::new(2, 2).unwrap());
}

#[test]
fn pixel_lookup_is_row_major() {
    let mut data = vec![0u8; 3 * 2 * 4];
    let idx = (3 + 2) * 4;
    data[idx..idx + 4].copy_from_slice(&[1, 2, 3, 4]);
    let b = PixelBuffer::new(3, 2, data).unwrap();
    assert_eq!(b.pixel(2, 1), Some([1, 2, 3, 4]));
    assert_eq!(b.pixel(3, 0), None);
}

#[test]
fn stats_classify_pixels() {
    let data = vec![
        255, 255, 255, 255, // white
        10, 20, 30, 255, // colored
        0, 0, 0, 0, // transparent
        5, 5, 5, 128, // semi
    ];
    let b = PixelBuffer::new(4, 1, data).unwrap();
    let s = b.stats();
    assert_eq!(s.total, 4);
    assert_eq!(s.white, 1);
    assert_eq!(s.colored, 1);
    assert_eq!(s.opaque, 2);
    assert_eq!(s.transparent, 1);
    assert_eq!(s.semi_transparent, 1);
    assert!((s.opaque_percent() - 50.0).abs() < 1e-9);
    assert!(b.has_visible_pixel());
}

#[test]
fn filled_buffer_converts_to_image() {
    let size = PixelSize::new(3, 3).unwrap();
    let b = PixelBuffer::filled(size, Rgba8::opaque(9, 8, 7));
    let img = b.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(2, 2).0, [9, 8, 7, 255]);
}
