//! Sanitization of note content received from the note service.
//!
//! Note content is rich text (HTML from the editor) and comes back from the
//! server untrusted. Nothing from it reaches the terminal verbatim:
//!
//! - Block-level tags become line breaks, list items get a bullet
//! - Every other tag is dropped
//! - Common HTML entities are decoded
//! - Control characters (terminal escape sequences included) are removed

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of characters of a title shown on a card.
const MAX_TITLE_CHARS: usize = 120;

static LINE_BREAK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*br\s*/?\s*>|<\s*/\s*(p|div|h[1-6]|li|ul|ol|blockquote|pre)\s*>")
        .expect("valid line break regex")
});

static LIST_ITEM_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*li(\s[^>]*)?>").expect("valid list item regex"));

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*(script|style)[^>]*>.*?<\s*/\s*(script|style)\s*>")
        .expect("valid script regex")
});

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank line regex"));

/// Convert rich-text note content into plain text that is safe to print.
pub fn rich_text_to_plain(content: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(content, "");
    let text = LIST_ITEM_TAG.replace_all(&text, "• ");
    let text = LINE_BREAK_TAG.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = strip_control_chars(&text, true);

    let text = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned()
}

/// Flatten a title to a single safe line, truncated for display.
pub fn display_title(title: &str) -> String {
    let plain = strip_control_chars(&decode_entities(&ANY_TAG.replace_all(title, "")), false);
    let collapsed = plain.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > MAX_TITLE_CHARS {
        let mut truncated: String = collapsed.chars().take(MAX_TITLE_CHARS - 1).collect();
        truncated.push('…');
        truncated
    } else {
        collapsed
    }
}

/// Remove control characters. Tabs always survive; newlines only when
/// `keep_newlines` is set, otherwise they become spaces.
fn strip_control_chars(text: &str, keep_newlines: bool) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' if keep_newlines => Some('\n'),
            '\n' | '\r' => Some(' '),
            '\t' => Some('\t'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Decode the handful of entities the editor emits, plus numeric ones.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
