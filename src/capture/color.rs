use std::collections::BTreeMap;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{RippleError, RippleResult};

const MAX_VAR_DEPTH: usize = 8;

/// Resolves CSS-like color strings found in element styles.
///
/// Supported: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` (comma or space
/// separated, integer or percent channels), `transparent`, a handful of named colors, and
/// `var(--name[, fallback])`. Anything else is a capture error.
#[derive(Clone, Debug)]
pub struct ColorResolver {
    vars: BTreeMap<String, String>,
}

impl Default for ColorResolver {
    fn default() -> Self {
        let mut vars = BTreeMap::new();
        for (k, v) in [
            ("--background", "#ffffff"),
            ("--foreground", "#000000"),
            ("--card", "#ffffff"),
            ("--card-foreground", "#000000"),
            ("--border", "#e5e7eb"),
            ("--muted", "#f3f4f6"),
        ] {
            vars.insert(k.to_owned(), v.to_owned());
        }
        Self { vars }
    }
}

impl ColorResolver {
    /// Resolver with no custom properties defined.
    pub fn empty() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Define or override a custom property (`--name`).
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Resolve a color string.
    pub fn resolve(&self, s: &str) -> RippleResult<Rgba8> {
        self.resolve_depth(s, 0)
    }

    fn resolve_depth(&self, s: &str, depth: usize) -> RippleResult<Rgba8> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(inner) = func_args(&s, "var") {
            if depth >= MAX_VAR_DEPTH {
                return Err(RippleError::capture(format!(
                    "color variable nesting too deep in '{s}'"
                )));
            }
            let (name, fallback) = match inner.split_once(',') {
                Some((n, f)) => (n.trim(), Some(f.trim())),
                None => (inner.trim(), None),
            };
            return match (self.vars.get(name), fallback) {
                (Some(v), _) => self.resolve_depth(v, depth + 1),
                (None, Some(f)) => self.resolve_depth(f, depth + 1),
                (None, None) => Err(RippleError::capture(format!(
                    "undefined color variable '{name}'"
                ))),
            };
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = func_args(&s, "rgba").or_else(|| func_args(&s, "rgb")) {
            return parse_rgb_args(args);
        }
        named(&s).ok_or_else(|| RippleError::capture(format!("unsupported color syntax '{s}'")))
    }
}

fn func_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn named(s: &str) -> Option<Rgba8> {
    Some(match s {
        "transparent" => Rgba8::transparent(),
        "white" => Rgba8::opaque(255, 255, 255),
        "black" => Rgba8::opaque(0, 0, 0),
        "red" => Rgba8::opaque(255, 0, 0),
        "green" => Rgba8::opaque(0, 128, 0),
        "blue" => Rgba8::opaque(0, 0, 255),
        "gray" | "grey" => Rgba8::opaque(128, 128, 128),
        _ => return None,
    })
}

fn parse_hex(hex: &str) -> RippleResult<Rgba8> {
    fn nibble(c: u8) -> RippleResult<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| RippleError::capture(format!("invalid hex digit '{}'", c as char)))
    }

    let b = hex.as_bytes();
    let digits = b.iter().map(|&c| nibble(c)).collect::<RippleResult<Vec<u8>>>()?;
    let (r, g, bl, a) = match digits.len() {
        3 => (digits[0] * 17, digits[1] * 17, digits[2] * 17, 255),
        4 => (
            digits[0] * 17,
            digits[1] * 17,
            digits[2] * 17,
            digits[3] * 17,
        ),
        6 => (
            digits[0] << 4 | digits[1],
            digits[2] << 4 | digits[3],
            digits[4] << 4 | digits[5],
            255,
        ),
        8 => (
            digits[0] << 4 | digits[1],
            digits[2] << 4 | digits[3],
            digits[4] << 4 | digits[5],
            digits[6] << 4 | digits[7],
        ),
        _ => {
            return Err(RippleError::capture(format!(
                "hex color must have 3, 4, 6 or 8 digits, got '#{hex}'"
            )));
        }
    };
    Ok(Rgba8 { r, g, b: bl, a })
}

fn parse_rgb_args(args: &str) -> RippleResult<Rgba8> {
    // Accept both `r, g, b, a` and `r g b / a`.
    let normalized = args.replace('/', " ").replace(',', " ");
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(RippleError::capture(format!(
            "rgb() expects 3 or 4 components, got '{args}'"
        )));
    }

    let channel = |p: &str| -> RippleResult<u8> {
        let v = if let Some(pct) = p.strip_suffix('%') {
            parse_num(pct)? * 255.0 / 100.0
        } else {
            parse_num(p)?
        };
        Ok(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = |p: &str| -> RippleResult<u8> {
        let v = if let Some(pct) = p.strip_suffix('%') {
            parse_num(pct)? / 100.0
        } else {
            parse_num(p)?
        };
        Ok((v.clamp(0.0, 1.0) * 255.0).round() as u8)
    };

    Ok(Rgba8 {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: match parts.get(3) {
            Some(p) => alpha(p)?,
            None => 255,
        },
    })
}

fn parse_num(s: &str) -> RippleResult<f64> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| RippleError::capture(format!("invalid color component '{s}'")))?;
    if !v.is_finite() {
        return Err(RippleError::capture(format!(
            "color component must be finite, got '{s}'"
        )));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/color.rs"]
mod tests;
