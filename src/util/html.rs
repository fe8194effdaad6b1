use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Anything from `<` to the next `>`.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is a valid regex"));

/// Removes every `<...>` span from `text`.
///
/// This is a lossy, best-effort pass and not an HTML parser: a `<` with no
/// later `>` is kept, `<>` is kept, a `>` inside an attribute value ends the
/// tag early, and comments or scripts lose only their delimiting spans.
/// Running it again on its own output changes nothing.
///
/// Returns `Cow::Borrowed` when there was nothing to remove.
///
/// # Examples
///
/// ```
/// use rss_reader::util::strip_html_tags;
///
/// assert_eq!(strip_html_tags("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(strip_html_tags("a < b"), "a < b");
/// ```
pub fn strip_html_tags(text: &str) -> Cow<'_, str> {
    TAG_PATTERN.replace_all(text, "")
}

/// `&` followed by a decimal, hex or named reference; the `;` is optional.
static CHARREF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)")
        .expect("character reference pattern is a valid regex")
});

/// Named references that HTML resolves even without the trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Resolves HTML named and numeric character references the way HTML5
/// does (`&amp;`, `&eacute;`, `&#8217;`).
///
/// - Legacy names work without `;` and as a prefix: `&copy 2024` and
///   `&copyright` both yield `©`.
/// - Numeric references in 0x80-0x9F use the Windows-1252 mapping, `&#0;`,
///   surrogates and values past U+10FFFF become U+FFFD, and other
///   non-characters (controls, U+FFFE) are dropped.
/// - Unknown names are left untouched.
///
/// Returns `Cow::Borrowed` when the text holds no reference.
pub fn unescape_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    CHARREF_PATTERN.replace_all(text, |caps: &Captures<'_>| resolve_reference(&caps[1]))
}

fn resolve_reference(reference: &str) -> String {
    match reference.strip_prefix('#') {
        Some(number) => resolve_numeric(number).map(String::from).unwrap_or_default(),
        None => resolve_named(reference),
    }
}

fn resolve_numeric(number: &str) -> Option<char> {
    let number = number.trim_end_matches(';');
    let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    };
    // Overflow is out of range too
    let code = code.unwrap_or(u32::MAX);

    if let Some(replacement) = charref_override(code) {
        return Some(replacement);
    }
    if (0xD800..=0xDFFF).contains(&code) || code > 0x10FFFF {
        return Some(char::REPLACEMENT_CHARACTER);
    }
    if is_invalid_codepoint(code) {
        return None;
    }
    char::from_u32(code)
}

/// Replacements for code points that HTML maps before range checks.
fn charref_override(code: u32) -> Option<char> {
    let replacement = match code {
        0x00 => '\u{FFFD}',
        0x0D => '\r',
        0x80 => '\u{20AC}',
        0x81 => '\u{81}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8D => '\u{8D}',
        0x8E => '\u{017D}',
        0x8F => '\u{8F}',
        0x90 => '\u{90}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9D => '\u{9D}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(replacement)
}

fn is_invalid_codepoint(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || code & 0xFFFE == 0xFFFE
}

fn resolve_named(reference: &str) -> String {
    let found = match reference.strip_suffix(';') {
        Some(name) => lookup_named(name),
        None if LEGACY_ENTITIES.contains(&reference) => lookup_named(reference),
        None => None,
    };
    if let Some(value) = found {
        return value;
    }

    // Longest legacy name at the start wins, the rest stays literal
    for end in (2..reference.len()).rev() {
        if !reference.is_char_boundary(end) {
            continue;
        }
        let prefix = &reference[..end];
        if LEGACY_ENTITIES.contains(&prefix) {
            if let Some(value) = lookup_named(prefix) {
                return format!("{}{}", value, &reference[end..]);
            }
        }
    }

    format!("&{}", reference)
}

/// Looks up `&name;` in the HTML5 entity table.
fn lookup_named(name: &str) -> Option<String> {
    let reference = format!("&{};", name);
    let decoded = html_escape::decode_html_entities(&reference);
    // A full match expands to one or two characters; anything longer kept part of the input
    if decoded != reference.as_str() && decoded.chars().count() <= 2 {
        Some(decoded.into_owned())
    } else {
        None
    }
}

/// Item description cleanup: entities first, then tags, so escaped markup
/// such as `&lt;p&gt;` is removed as well.
pub fn clean_description(raw: &str) -> String {
    let unescaped = unescape_entities(raw);
    strip_html_tags(&unescaped).into_owned()
}
