//! Display and parsing of ingredient quantities.
//!
//! Quantities are stored as decimals and rendered with Unicode vulgar
//! fractions for the common cooking fractions ("1 ½", "¾").

/// Remainders rendered as vulgar fractions.
///
/// Both 0.666 and 0.667 map to two thirds: 2/3 rounded to three places can
/// land on either side depending on how the quantity was computed.
const FRACTION_GLYPHS: [(f64, &str); 10] = [
    (0.125, "⅛"),
    (0.25, "¼"),
    (0.333, "⅓"),
    (0.375, "⅜"),
    (0.5, "½"),
    (0.625, "⅝"),
    (0.666, "⅔"),
    (0.667, "⅔"),
    (0.75, "¾"),
    (0.875, "⅞"),
];

/// Maximum distance between a remainder and a table key to count as a match.
const FRACTION_TOLERANCE: f64 = 0.01;

/// Exact values of the glyphs accepted when parsing user input.
const GLYPH_VALUES: [(char, f64); 9] = [
    ('⅛', 0.125),
    ('¼', 0.25),
    ('⅓', 1.0 / 3.0),
    ('⅜', 0.375),
    ('½', 0.5),
    ('⅝', 0.625),
    ('⅔', 2.0 / 3.0),
    ('¾', 0.75),
    ('⅞', 0.875),
];

/// Formats a quantity as a mixed number using vulgar fraction glyphs.
///
/// `None` and non-finite values format as an empty string. Remainders without
/// a glyph use `f64`'s `Display`, which never switches to exponent notation.
pub fn format_quantity(quantity: Option<f64>) -> String {
    let Some(quantity) = quantity.filter(|q| q.is_finite()) else {
        return String::new();
    };
    if quantity == 0.0 {
        return "0".to_string();
    }

    let whole = quantity.floor();
    let remainder = ((quantity - whole) * 1000.0).round() / 1000.0;
    let glyph = fraction_glyph(remainder);

    match glyph {
        Some(glyph) if whole == 0.0 => glyph.to_string(),
        Some(glyph) if whole > 0.0 => format!("{whole} {glyph}"),
        None if whole > 0.0 && remainder != 0.0 => quantity.to_string(),
        None if whole > 0.0 => whole.to_string(),
        _ => quantity.to_string(),
    }
}

fn fraction_glyph(remainder: f64) -> Option<&'static str> {
    FRACTION_GLYPHS
        .iter()
        .find(|(key, _)| (remainder - key).abs() < FRACTION_TOLERANCE)
        .map(|(_, glyph)| *glyph)
}

/// Formats a quantity followed by its unit, skipping whichever is empty.
pub fn format_quantity_with_unit(quantity: Option<f64>, unit: Option<&str>) -> String {
    let amount = format_quantity(quantity);
    let unit = unit.map(str::trim).unwrap_or_default();
    match (amount.is_empty(), unit.is_empty()) {
        (true, _) => unit.to_string(),
        (false, true) => amount,
        (false, false) => format!("{amount} {unit}"),
    }
}

/// Parses user-typed quantity text.
///
/// Accepts decimals with either separator (`"1.5"`, `"1,5"`), vulgar glyphs
/// alone or after a whole number (`"½"`, `"1½"`, `"1 ½"`) and ASCII
/// fractions (`"1/2"`, `"1 1/2"`). A comma is only ever a decimal separator:
/// `"1,000"` looks like a thousands separator and is rejected. Returns `None`
/// for blank or unparseable input.
pub fn parse_quantity(text: &str) -> Option<f64> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let value = match tokens.as_slice() {
        [single] => parse_token(single)?,
        [whole, fraction] => {
            let whole = parse_whole(whole)?;
            let fraction = parse_fraction(fraction)?;
            if fraction >= 1.0 {
                return None;
            }
            whole + fraction
        }
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn parse_token(token: &str) -> Option<f64> {
    if let Some(value) = parse_fraction(token) {
        return Some(value);
    }

    // "1½"
    let mut chars = token.chars();
    if let Some(last) = chars.next_back() {
        if let Some(fraction) = glyph_value(last) {
            let whole = chars.as_str();
            if !whole.is_empty() {
                return Some(parse_whole(whole)? + fraction);
            }
        }
    }

    parse_decimal(token)
}

fn parse_fraction(token: &str) -> Option<f64> {
    let mut chars = token.chars();
    if let (Some(glyph), None) = (chars.next(), chars.next()) {
        if let Some(value) = glyph_value(glyph) {
            return Some(value);
        }
    }

    let (numerator, denominator) = token.split_once('/')?;
    let numerator = parse_whole(numerator)?;
    let denominator = parse_whole(denominator)?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

fn parse_whole(token: &str) -> Option<f64> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse::<u32>().ok().map(f64::from)
}

fn parse_decimal(token: &str) -> Option<f64> {
    if let Some((_, fraction)) = token.split_once(',') {
        if fraction.len() == 3 && fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }
    let normalized = token.replace(',', ".");
    let starts_numeric = normalized
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if !starts_numeric {
        return None;
    }
    normalized.parse::<f64>().ok()
}

fn glyph_value(glyph: char) -> Option<f64> {
    GLYPH_VALUES
        .iter()
        .find(|(candidate, _)| *candidate == glyph)
        .map(|(_, value)| *value)
}

/// Scales an ingredient amount from one serving count to another.
///
/// Returns `None` when either serving count is zero.
pub fn scale_quantity(quantity: f64, from_servings: u32, to_servings: u32) -> Option<f64> {
    if from_servings == 0 || to_servings == 0 {
        return None;
    }
    Some(quantity * f64::from(to_servings) / f64::from(from_servings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_documented_examples() {
        assert_eq!(format_quantity(Some(0.5)), "½");
        assert_eq!(format_quantity(Some(1.5)), "1 ½");
        assert_eq!(format_quantity(Some(2.0)), "2");
        assert_eq!(format_quantity(None), "");
        assert_eq!(format_quantity(Some(0.0)), "0");
    }

    #[test]
    fn every_table_key_formats_as_its_glyph() {
        for (key, glyph) in FRACTION_GLYPHS {
            assert_eq!(format_quantity(Some(key)), glyph, "key {key}");
            for whole in [1.0, 2.0, 10.0] {
                assert_eq!(
                    format_quantity(Some(whole + key)),
                    format!("{whole} {glyph}"),
                    "key {key} whole {whole}"
                );
            }
        }
    }

    #[test]
    fn computed_thirds_match_glyphs() {
        assert_eq!(format_quantity(Some(1.0 / 3.0)), "⅓");
        assert_eq!(format_quantity(Some(2.0 / 3.0)), "⅔");
        assert_eq!(format_quantity(Some(1.0 + 2.0 / 3.0)), "1 ⅔");
    }

    #[test]
    fn tolerance_is_one_hundredth() {
        assert_eq!(format_quantity(Some(0.505)), "½");
        assert_eq!(format_quantity(Some(0.52)), "0.52");
    }

    #[test]
    fn unmatched_remainders_format_as_decimals() {
        assert_eq!(format_quantity(Some(0.1)), "0.1");
        assert_eq!(format_quantity(Some(1.2)), "1.2");
        assert_eq!(format_quantity(Some(-0.5)), "-0.5");
        assert_eq!(format_quantity(Some(f64::NAN)), "");
    }

    #[test]
    fn large_and_tiny_values_print_without_exponent() {
        assert_eq!(format_quantity(Some(1e21)), "1000000000000000000000");
        assert_eq!(format_quantity(Some(1e-7)), "0.0000001");
    }

    #[test]
    fn formats_with_units() {
        assert_eq!(format_quantity_with_unit(Some(1.5), Some("cups")), "1 ½ cups");
        assert_eq!(format_quantity_with_unit(None, Some("pinch")), "pinch");
        assert_eq!(format_quantity_with_unit(Some(2.0), None), "2");
        assert_eq!(format_quantity_with_unit(None, None), "");
    }

    #[test]
    fn parses_common_inputs() {
        assert_eq!(parse_quantity("1.5"), Some(1.5));
        assert_eq!(parse_quantity(" 1,5 "), Some(1.5));
        assert_eq!(parse_quantity("½"), Some(0.5));
        assert_eq!(parse_quantity("1½"), Some(1.5));
        assert_eq!(parse_quantity("2 ¾"), Some(2.75));
        assert_eq!(parse_quantity("1/4"), Some(0.25));
        assert_eq!(parse_quantity("1 1/2"), Some(1.5));
        assert_eq!(parse_quantity("3"), Some(3.0));
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("   "), None);
        assert_eq!(parse_quantity("a lot"), None);
        assert_eq!(parse_quantity("1/0"), None);
        assert_eq!(parse_quantity("1 3/2"), None);
        assert_eq!(parse_quantity("inf"), None);
        assert_eq!(parse_quantity("1 2 3"), None);
    }

    #[test]
    fn comma_is_a_decimal_separator_only() {
        assert_eq!(parse_quantity("0,25"), Some(0.25));
        assert_eq!(parse_quantity("1,000"), None);
        assert_eq!(parse_quantity("2,500"), None);
        assert_eq!(parse_quantity("1,000,000"), None);
    }

    #[test]
    fn parse_inverts_format() {
        for value in [0.25, 0.5, 1.75, 3.0, 2.125] {
            let text = format_quantity(Some(value));
            assert_eq!(parse_quantity(&text), Some(value), "text {text}");
        }
    }

    #[test]
    fn scales_by_servings() {
        assert_eq!(scale_quantity(2.0, 4, 8), Some(4.0));
        assert_eq!(scale_quantity(1.5, 6, 4), Some(1.0));
        assert_eq!(scale_quantity(1.0, 0, 4), None);
    }
}
