//! Note, draft and color types shared by the controller, the forms and the
//! remote store.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{NoteError, Result};

/// Color given to notes that never picked one.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Preset swatches offered next to the free-form color picker.
pub const PALETTE: [&str; 9] = [
    "#ffffff", "#f28b82", "#fbbc04", "#fff475", "#ccff90", "#a7ffeb", "#cbf0f8", "#aecbfa",
    "#d7aefb",
];

/// Message shown when a draft is submitted with an empty title or content.
pub const EMPTY_FIELDS_MESSAGE: &str = "Please fill in both title and content";

/// Server-assigned note identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        NoteId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        NoteId(s.to_string())
    }
}

/// A note as stored by the note service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteRecord")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Rich text (HTML) as produced by the editor. Untrusted when it comes
    /// back from the server; see [`crate::sanitize`].
    pub content: String,
    pub color: String,
}

/// Wire form of a note. The service may send `_id`, `id` or both (Mongo
/// documents serialized with virtuals).
#[derive(Deserialize)]
struct NoteRecord {
    #[serde(default)]
    id: Option<NoteId>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<NoteId>,
    title: String,
    content: String,
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    color: String,
}

impl TryFrom<NoteRecord> for Note {
    type Error = String;

    fn try_from(record: NoteRecord) -> std::result::Result<Self, Self::Error> {
        let id = record
            .mongo_id
            .or(record.id)
            .ok_or_else(|| "note is missing `_id`/`id`".to_string())?;

        Ok(Note {
            id,
            title: record.title,
            content: record.content,
            color: record.color,
        })
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn color_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let color = Option::<String>::deserialize(deserializer)?;
    Ok(match color {
        Some(c) if !c.trim().is_empty() => c,
        _ => default_color(),
    })
}

/// In-progress title/content/color bound to an open create or edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub color: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            color: default_color(),
        }
    }
}

impl Draft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            color: color.into(),
        }
    }

    /// Seed a draft from an existing note, for the edit form.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            color: note.color.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }

    /// Check the draft can be persisted and return the version that is sent
    /// to the server: trimmed title and content, default color when unset.
    ///
    /// Never touches the network; callers run this before any request.
    pub fn validated(&self) -> Result<Draft> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(NoteError::Validation(EMPTY_FIELDS_MESSAGE.to_string()));
        }

        let color = if self.color.trim().is_empty() {
            default_color()
        } else {
            normalize_color(&self.color)?
        };

        Ok(Draft {
            title: title.to_string(),
            content: content.to_string(),
            color,
        })
    }
}

/// Validate a `#rgb` / `#rrggbb` color and return it lowercased.
pub fn normalize_color(color: &str) -> Result<String> {
    let color = color.trim();
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| invalid_color(color))?;

    if !(hex.len() == 3 || hex.len() == 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid_color(color));
    }

    Ok(format!("#{}", hex.to_ascii_lowercase()))
}

fn invalid_color(color: &str) -> NoteError {
    NoteError::Validation(format!(
        "invalid color '{color}', expected a hex color like #fff475"
    ))
}

/// Parse a hex color into RGB components. Falls back to white for anything
/// that does not parse, since server data is not trusted to be well formed.
pub fn color_rgb(color: &str) -> (u8, u8, u8) {
    let Ok(normalized) = normalize_color(color) else {
        return (0xff, 0xff, 0xff);
    };
    let hex = &normalized[1..];

    let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0xff);
    if hex.len() == 3 {
        let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
        (expand(0), expand(1), expand(2))
    } else {
        (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6]))
    }
}
