use super::*;

fn card(x: f64, title: &str) -> Element {
    Element::new(ElementRole::Card, Bounds::new(x, 10.0, 100.0, 80.0))
        .with_child(
            Element::new(ElementRole::Heading, Bounds::new(x + 4.0, 14.0, 90.0, 20.0))
                .with_text(title),
        )
        .with_child(
            Element::new(ElementRole::Label, Bounds::new(x + 4.0, 40.0, 30.0, 12.0))
                .with_text("tech"),
        )
}

#[test]
fn descendants_are_preorder_and_exclude_self() {
    let root = Element::new(ElementRole::Container, Bounds::new(0.0, 0.0, 300.0, 100.0))
        .with_child(card(0.0, "AAPL"))
        .with_child(card(150.0, "MSFT"));

    let roles: Vec<ElementRole> = root.descendants().map(|e| e.role).collect();
    assert_eq!(
        roles,
        vec![
            ElementRole::Card,
            ElementRole::Heading,
            ElementRole::Label,
            ElementRole::Card,
            ElementRole::Heading,
            ElementRole::Label,
        ]
    );
}

#[test]
fn text_content_concatenates_subtree() {
    let c = card(0.0, "AAPL");
    assert_eq!(c.text_content(), "AAPLtech");
    assert_eq!(
        c.first_with_role(ElementRole::Heading)
            .map(|h| h.text_content()),
        Some("AAPL".to_owned())
    );
}

#[test]
fn card_units_finds_all_cards() {
    let root = Element::new(ElementRole::Container, Bounds::new(0.0, 0.0, 300.0, 100.0))
        .with_child(
            Element::new(ElementRole::Container, Bounds::new(0.0, 0.0, 300.0, 100.0))
                .with_child(card(0.0, "A")),
        )
        .with_child(card(150.0, "B"));
    assert_eq!(root.card_units().len(), 2);
}

#[test]
fn rect_relative_to_shifts_by_origin() {
    let c = card(150.0, "B");
    let r = c.rect_relative_to(Point::new(100.0, 5.0));
    assert_eq!(r, Rect::new(50.0, 5.0, 150.0, 85.0));
}

#[test]
fn element_json_defaults_optional_fields() {
    let e: Element = serde_json::from_value(serde_json::json!({
        "bounds": { "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0 },
        "children": [ { "role": "heading", "bounds": { "x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0 }, "text": "T" } ]
    }))
    .unwrap();
    assert_eq!(e.role, ElementRole::Container);
    assert_eq!(e.style, ElementStyle::default());
    assert_eq!(e.children[0].role, ElementRole::Heading);
}
