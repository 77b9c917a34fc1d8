use crate::coords::ColorRgba;
use crate::error::{GeometryError, Result};

/// Resolves a style specification to a straight-alpha color.
///
/// Implementations must be pure: the same input always yields the same
/// output, which is what makes [`StyleCache`](super::StyleCache) sound.
pub trait ColorResolver {
    fn resolve(&self, spec: &str) -> Result<ColorRgba>;
}

/// Resolver for the CSS color forms canvases usually see:
/// - named colors (`"red"`, `"transparent"`, ...)
/// - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
/// - `rgb(r, g, b)` and `rgba(r, g, b, a)` with `a` in `[0, 1]`
///
/// Matching is ASCII case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Copy, Clone, Default)]
pub struct CssColorResolver;

impl ColorResolver for CssColorResolver {
    fn resolve(&self, spec: &str) -> Result<ColorRgba> {
        let s = spec.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| malformed(spec));
        }
        if let Some(args) = function_args(&s, "rgba") {
            return parse_rgb_args(args, true).ok_or_else(|| malformed(spec));
        }
        if let Some(args) = function_args(&s, "rgb") {
            return parse_rgb_args(args, false).ok_or_else(|| malformed(spec));
        }

        named(&s).ok_or_else(|| malformed(spec))
    }
}

fn malformed(spec: &str) -> GeometryError {
    GeometryError::invalid_argument(format!("unrecognized color style {spec:?}"))
}

fn parse_hex(hex: &str) -> Option<ColorRgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 | 4 => {
            // #rgb expands each digit: 0xf -> 0xff.
            let r = nibble(0)? * 17;
            let g = nibble(1)? * 17;
            let b = nibble(2)? * 17;
            let a = if hex.len() == 4 { nibble(3)? * 17 } else { 255 };
            Some(ColorRgba::from_srgb_u8(r, g, b, a))
        }
        6 | 8 => {
            let a = if hex.len() == 8 { byte(6)? } else { 255 };
            Some(ColorRgba::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, a))
        }
        _ => None,
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<ColorRgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |p: &str| -> Option<f32> {
        let v: f32 = p.parse().ok()?;
        v.is_finite().then(|| v.clamp(0.0, 255.0) / 255.0)
    };

    let a = if with_alpha {
        let a: f32 = parts[3].parse().ok()?;
        if !a.is_finite() {
            return None;
        }
        a.clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(ColorRgba::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, a))
}

fn named(name: &str) -> Option<ColorRgba> {
    let (r, g, b, a) = match name {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "lime" => (0, 255, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "cyan" | "aqua" => (0, 255, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        "silver" => (192, 192, 192, 255),
        "maroon" => (128, 0, 0, 255),
        "olive" => (128, 128, 0, 255),
        "navy" => (0, 0, 128, 255),
        "teal" => (0, 128, 128, 255),
        "purple" => (128, 0, 128, 255),
        "orange" => (255, 165, 0, 255),
        "pink" => (255, 192, 203, 255),
        "brown" => (165, 42, 42, 255),
        _ => return None,
    };
    Some(ColorRgba::from_srgb_u8(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(s: &str) -> Result<ColorRgba> {
        CssColorResolver.resolve(s)
    }

    // ── named ─────────────────────────────────────────────────────────────

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(resolve("Red").unwrap(), ColorRgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(resolve("  white ").unwrap(), ColorRgba::white());
        assert_eq!(resolve("transparent").unwrap(), ColorRgba::transparent());
    }

    // ── hex ───────────────────────────────────────────────────────────────

    #[test]
    fn short_hex_expands_digits() {
        assert_eq!(resolve("#f00").unwrap(), ColorRgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(resolve("#0f08").unwrap(), ColorRgba::from_srgb_u8(0, 255, 0, 0x88));
    }

    #[test]
    fn long_hex_with_and_without_alpha() {
        assert_eq!(resolve("#336699").unwrap(), ColorRgba::from_srgb_u8(0x33, 0x66, 0x99, 255));
        assert_eq!(resolve("#33669980").unwrap(), ColorRgba::from_srgb_u8(0x33, 0x66, 0x99, 0x80));
    }

    #[test]
    fn bad_hex_is_invalid_argument() {
        for s in ["#12", "#12345", "#ggg", "#"] {
            assert!(matches!(resolve(s), Err(GeometryError::InvalidArgument(_))), "{s}");
        }
    }

    // ── rgb()/rgba() ──────────────────────────────────────────────────────

    #[test]
    fn rgb_function() {
        assert_eq!(resolve("rgb(255, 0, 51)").unwrap(), ColorRgba::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn rgba_function_clamps() {
        let c = resolve("rgba(300, -5, 0, 0.5)").unwrap();
        assert_eq!(c, ColorRgba::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn rgb_wrong_arity_is_rejected() {
        assert!(resolve("rgb(1, 2)").is_err());
        assert!(resolve("rgba(1, 2, 3)").is_err());
        assert!(resolve("rgb(1, 2, x)").is_err());
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(resolve("blurple"), Err(GeometryError::InvalidArgument(_))));
    }
}
