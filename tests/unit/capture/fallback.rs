use super::*;
use crate::region::StaticRegion;
use crate::region::element::Bounds;

fn label(x: f64, text: &str) -> Element {
    Element::new(ElementRole::Label, Bounds::new(x, 0.0, 10.0, 10.0)).with_text(text)
}

fn trade_card(x: f64, y: f64, title: &str) -> Element {
    Element::new(ElementRole::Card, Bounds::new(x, y, 300.0, 120.0))
        .with_child(
            Element::new(ElementRole::Heading, Bounds::new(x, y, 100.0, 20.0)).with_text(title),
        )
        .with_child(
            Element::new(ElementRole::Link, Bounds::new(x, y + 20.0, 100.0, 20.0))
                .with_text("https://example.com/a/very/long/path/that/keeps/going"),
        )
        .with_child(label(x, "x"))
        .with_child(label(x, "growth"))
        .with_child(label(x, "semiconductors"))
        .with_child(label(x, "tech"))
        .with_child(label(x, "swing"))
}

fn region_with(children: Vec<Element>) -> StaticRegion {
    let mut root = Element::new(ElementRole::Container, Bounds::new(50.0, 40.0, 800.0, 500.0));
    root.children = children;
    StaticRegion::new(root)
}

#[test]
fn sketch_extracts_truncated_title_link_and_three_badges() {
    let region = region_with(vec![trade_card(60.0, 50.0, "A title that is definitely too long")]);
    let root = region.root().unwrap();
    let cards = sketch_cards(root, region.bounds().origin());
    assert_eq!(cards.len(), 1);

    let c = &cards[0];
    assert_eq!(c.rect, Rect::new(10.0, 10.0, 310.0, 130.0));
    assert_eq!(c.title.as_deref(), Some("A title that is definitel"));
    assert_eq!(c.link.as_deref().map(|l| l.chars().count()), Some(35));
    assert_eq!(c.badges, vec!["growth", "semicond", "tech"]);
}

#[test]
fn empty_heading_gets_numbered_title_and_no_heading_means_no_link() {
    let mut no_heading = trade_card(0.0, 0.0, "unused");
    no_heading.children.remove(0);
    let region = region_with(vec![trade_card(60.0, 50.0, "   "), no_heading]);
    let cards = sketch_cards(region.root().unwrap(), region.bounds().origin());

    assert_eq!(cards[0].title.as_deref(), Some("Item 1"));
    assert_eq!(cards[1].title, None);
    assert_eq!(cards[1].link, None);
}

#[test]
fn synthesize_draws_cards_at_requested_size() {
    let region = region_with(vec![trade_card(60.0, 50.0, "AAPL")]);
    let size = PixelSize::new(800, 500).unwrap();
    let buf = FallbackSynthesizer::default().synthesize(&region, size);

    assert_eq!(buf.size(), size);
    assert!(buf.has_visible_pixel());
    // Card border at the card's top-left corner, badge fill inside the first badge.
    assert_eq!(buf.pixel(10, 10), Some([0xe5, 0xe7, 0xeb, 255]));
    assert_eq!(buf.pixel(40, 95), Some([0xe5, 0xe7, 0xeb, 255]));
    assert_eq!(buf.pixel(5, 5), Some([255, 255, 255, 255]));
}

#[test]
fn no_cards_draws_placeholder_bands() {
    let region = region_with(vec![]);
    let size = PixelSize::new(200, 100).unwrap();
    let buf = FallbackSynthesizer::default().synthesize(&region, size);
    assert_eq!(buf.size(), size);
    // First band spans y in [10, 10); height 100/5 - 20 = 0 -> no bands at this height.
    assert_eq!(band_rects(size).len(), 0);
    assert_eq!(buf.stats().white, size.area());

    let tall = PixelSize::new(200, 500).unwrap();
    let bands = band_rects(tall);
    assert_eq!(bands.len(), 5);
    assert_eq!(bands[0], Rect::new(20.0, 10.0, 180.0, 90.0));
    let buf = FallbackSynthesizer::default().synthesize(&region, tall);
    assert_eq!(buf.pixel(20, 10), Some([0xe2, 0xe8, 0xf0, 255]));
}

struct DetachedRegion;

impl ContentRegion for DetachedRegion {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 64.0, 48.0)
    }

    fn root(&self) -> RippleResult<&Element> {
        Err(RippleError::missing_region("tree torn down"))
    }
}

#[test]
fn synthesis_failure_falls_back_to_gradient_placeholder() {
    let size = PixelSize::new(64, 48).unwrap();
    let synth = FallbackSynthesizer::default();

    let err = synth.draw_structured(&DetachedRegion, size).unwrap_err();
    assert!(matches!(err, RippleError::Synthesis(_)));

    let buf = synth.synthesize(&DetachedRegion, size);
    assert_eq!(buf, placeholder_bands(size));
    assert_eq!(buf.stats().opaque, size.area());
    assert_eq!(buf.pixel(0, 0), Some([0xf8, 0xfa, 0xfc, 255]));
}

#[test]
fn placeholder_is_fully_opaque_for_tiny_sizes() {
    let size = PixelSize::new(1, 1).unwrap();
    let buf = placeholder_bands(size);
    assert_eq!(buf.stats().opaque, 1);
}

fn dark_pixels_in(buf: &PixelBuffer, x: std::ops::Range<u32>, y: std::ops::Range<u32>) -> usize {
    y.flat_map(|py| x.clone().map(move |px| (px, py)))
        .filter_map(|(px, py)| buf.pixel(px, py))
        .filter(|p| p[3] > 0 && p[0] < 128 && p[1] < 128 && p[2] < 128)
        .count()
}

#[test]
fn card_titles_are_drawn_when_a_font_is_available() {
    let Some(font) = crate::capture::text::find_test_font() else {
        eprintln!("skipping: no TTF/OTF font found (set RIPPLEFX_TEST_FONT)");
        return;
    };
    let card = Element::new(ElementRole::Card, Bounds::new(60.0, 50.0, 300.0, 120.0))
        .with_child(
            Element::new(ElementRole::Heading, Bounds::new(60.0, 50.0, 100.0, 20.0))
                .with_text("NVDA breakout"),
        );
    let region = region_with(vec![card]);
    let size = PixelSize::new(400, 200).unwrap();

    // Card rect is (10, 10); the title sits at (+20, +15).
    let with_text = FallbackSynthesizer::new(Some(font)).synthesize(&region, size);
    let without = FallbackSynthesizer::default().synthesize(&region, size);
    assert_eq!(dark_pixels_in(&without, 30..260, 25..53), 0);
    assert!(dark_pixels_in(&with_text, 30..260, 25..53) > 20);
    // Nothing outside the card changes.
    assert_eq!(with_text.pixel(380, 190), without.pixel(380, 190));
}
