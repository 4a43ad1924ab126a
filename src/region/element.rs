use crate::foundation::core::{Point, Rect};

/// Axis-aligned layout box in page coordinates, as reported by the host's layout engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (non-negative).
    pub width: f64,
    /// Height (non-negative).
    pub height: f64,
}

impl Bounds {
    /// Build a bounds box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to a `kurbo` rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Semantic role a descendant plays in the rendered list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementRole {
    /// Plain box.
    #[default]
    Container,
    /// A discrete content unit (one list row, card, or grid cell).
    Card,
    /// Title-like text of a card.
    Heading,
    /// Secondary link text of a card.
    Link,
    /// Short tag/badge text.
    Label,
    /// Other text.
    Text,
    /// Never painted (scripts, styles, nested canvases, debug overlays).
    Ignored,
}

/// Paint properties of an element. Colors are CSS-like strings resolved at capture time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementStyle {
    /// Fill color of the element box.
    #[serde(default)]
    pub background: Option<String>,
    /// 1px border color.
    #[serde(default)]
    pub border: Option<String>,
    /// Text color.
    #[serde(default)]
    pub color: Option<String>,
    /// Text size in pixels.
    #[serde(default)]
    pub font_size: Option<f32>,
}

/// One node of the rendered content tree.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    /// Semantic role.
    #[serde(default)]
    pub role: ElementRole,
    /// Layout box in page coordinates.
    pub bounds: Bounds,
    /// Paint properties.
    #[serde(default)]
    pub style: ElementStyle,
    /// Own text, if any.
    #[serde(default)]
    pub text: Option<String>,
    /// Child elements in paint order.
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    /// Element with a role and bounds, no style or children.
    pub fn new(role: ElementRole, bounds: Bounds) -> Self {
        Self {
            role,
            bounds,
            ..Self::default()
        }
    }

    /// Builder-style: set own text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style: set the style.
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder-style: append a child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Layout box as a rectangle.
    pub fn rect(&self) -> Rect {
        self.bounds.to_rect()
    }

    /// Pre-order iterator over strict descendants (not including `self`).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Concatenated text of this element and all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        if let Some(t) = &self.text {
            out.push_str(t);
        }
        for d in self.descendants() {
            if let Some(t) = &d.text {
                out.push_str(t);
            }
        }
        out
    }

    /// All `card` descendants in document order (nested cards included).
    pub fn card_units(&self) -> Vec<&Element> {
        self.descendants()
            .filter(|e| e.role == ElementRole::Card)
            .collect()
    }

    /// First descendant with the given role.
    pub fn first_with_role(&self, role: ElementRole) -> Option<&Element> {
        self.descendants().find(|e| e.role == role)
    }

    /// This element's box relative to `origin`.
    pub fn rect_relative_to(&self, origin: Point) -> Rect {
        self.rect() - origin.to_vec2()
    }
}

/// Pre-order traversal produced by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.stack.pop()?;
        self.stack.extend(e.children.iter().rev());
        Some(e)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/element.rs"]
mod tests;
