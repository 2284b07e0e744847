//! Color value validation
//!
//! Zones carry raw color strings authored in markup. A candidate only becomes
//! the page background when it passes a [`ColorValidator`], so a typo such as
//! `"#"` can never blank the page.

use std::sync::OnceLock;

use regex::Regex;

/// Predicate deciding whether a raw string is a usable color value
pub trait ColorValidator {
    fn is_valid_color(&self, candidate: &str) -> bool;
}

impl<F> ColorValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_color(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

/// Validator for the CSS `<color>` grammar subset used in page markup:
/// hex notation, `rgb()`/`hsl()` functions, named colors and keywords
#[derive(Debug, Clone, Copy, Default)]
pub struct CssColorValidator;

impl ColorValidator for CssColorValidator {
    fn is_valid_color(&self, candidate: &str) -> bool {
        let value = candidate.trim().to_ascii_lowercase();
        if value.is_empty() {
            return false;
        }

        if let Some(hex) = value.strip_prefix('#') {
            return is_hex_color(hex);
        }

        if let Some(caps) = function_regex().captures(&value) {
            let name = &caps[1];
            let args = &caps[2];
            return if name.starts_with("rgb") {
                is_rgb_args(args)
            } else {
                is_hsl_args(args)
            };
        }

        KEYWORDS.contains(&value.as_str()) || NAMED_COLORS.binary_search(&value.as_str()).is_ok()
    }
}

/// `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa` (without the leading `#`)
fn is_hex_color(hex: &str) -> bool {
    matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn function_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(rgba?|hsla?)\(\s*(.*?)\s*\)$").expect("valid regex"))
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)(e[+-]?\d+)?$").expect("valid regex")
    })
}

fn is_number(token: &str) -> bool {
    number_regex().is_match(token)
}

fn is_percentage(token: &str) -> bool {
    token.strip_suffix('%').is_some_and(is_number)
}

fn is_hue(token: &str) -> bool {
    ["deg", "grad", "rad", "turn"]
        .iter()
        .find_map(|unit| token.strip_suffix(unit))
        .map_or_else(|| is_number(token), is_number)
}

fn is_alpha(token: &str) -> bool {
    token == "none" || is_number(token) || is_percentage(token)
}

/// Split function arguments into channels plus optional alpha.
///
/// Legacy syntax separates every argument with commas (alpha is the fourth);
/// modern syntax separates channels with whitespace and alpha with `/`.
fn split_args(args: &str) -> Option<(Vec<&str>, Option<&str>)> {
    if args.contains(',') {
        if args.contains('/') {
            return None;
        }
        let mut parts: Vec<&str> = args.split(',').map(str::trim).collect();
        return match parts.len() {
            3 => Some((parts, None)),
            4 => {
                let alpha = parts.pop();
                Some((parts, alpha))
            }
            _ => None,
        };
    }

    let (channels, alpha) = match args.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha.trim())),
        None => (args, None),
    };
    let channels: Vec<&str> = channels.split_whitespace().collect();
    if channels.len() != 3 || alpha.is_some_and(str::is_empty) {
        return None;
    }
    Some((channels, alpha))
}

fn is_rgb_args(args: &str) -> bool {
    let Some((channels, alpha)) = split_args(args) else {
        return false;
    };
    channels
        .iter()
        .all(|c| *c == "none" || is_number(c) || is_percentage(c))
        && alpha.map_or(true, is_alpha)
}

fn is_hsl_args(args: &str) -> bool {
    let Some((channels, alpha)) = split_args(args) else {
        return false;
    };
    let hue_ok = channels[0] == "none" || is_hue(channels[0]);
    let rest_ok = channels[1..]
        .iter()
        .all(|c| *c == "none" || is_percentage(c) || is_number(c));
    hue_ok && rest_ok && alpha.map_or(true, is_alpha)
}

const KEYWORDS: &[&str] = &[
    "currentcolor",
    "inherit",
    "initial",
    "revert",
    "transparent",
    "unset",
];

/// CSS named colors, sorted for binary search
const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(s: &str) -> bool {
        CssColorValidator.is_valid_color(s)
    }

    #[test]
    fn test_named_colors_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_hex_colors() {
        assert!(valid("#d4ccc4"));
        assert!(valid("#FFF"));
        assert!(valid("#ffff"));
        assert!(valid("#11223344"));
        assert!(!valid("#"));
        assert!(!valid("#12"));
        assert!(!valid("#12345"));
        assert!(!valid("#ggg"));
        assert!(!valid("d4ccc4"));
    }

    #[test]
    fn test_functional_colors() {
        assert!(valid("rgb(255, 0, 0)"));
        assert!(valid("rgba(255, 0, 0, 0.5)"));
        assert!(valid("rgb(100% 0% 0% / 50%)"));
        assert!(valid("hsl(120deg 50% 50%)"));
        assert!(valid("hsla(120, 50%, 50%, .3)"));
        assert!(valid("hsl(0.5turn 10% 90% / 1)"));
        assert!(!valid("rgb(255, 0)"));
        assert!(!valid("rgb(255 0 0 0)"));
        assert!(!valid("rgb(red, 0, 0)"));
        assert!(!valid("rgb(1, 2, 3 / 4)"));
        assert!(!valid("rgb(1 2 3 /)"));
        assert!(!valid("hsl(120px 50% 50%)"));
    }

    #[test]
    fn test_named_colors_and_keywords() {
        assert!(valid("navy"));
        assert!(valid("  RebeccaPurple "));
        assert!(valid("transparent"));
        assert!(valid("currentColor"));
        assert!(!valid("notacolor"));
        assert!(!valid(""));
        assert!(!valid("   "));
    }

    #[test]
    fn test_closure_validator() {
        let only_a = |s: &str| s == "A";
        assert!(only_a.is_valid_color("A"));
        assert!(!only_a.is_valid_color("B"));
    }
}
