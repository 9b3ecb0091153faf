//! Terminal rendering of the note collection.
//!
//! All server-provided text goes through [`crate::sanitize`] first.

use owo_colors::OwoColorize;

use crate::note::{Note, PALETTE, color_rgb};
use crate::sanitize::{display_title, rich_text_to_plain};

/// Shown in place of the grid when the collection is empty.
pub const EMPTY_STATE: &str = "No notes created yet...";

/// Render one note as a card: a color swatch, the title and id, then the
/// content indented underneath.
pub fn format_note_card(note: &Note) -> String {
    let (r, g, b) = color_rgb(&note.color);
    let swatch = "██".truecolor(r, g, b).to_string();

    let mut card = format!(
        "{} {} {}\n",
        swatch,
        display_title(&note.title).bold(),
        format!("({})", display_title(note.id.as_str())).dimmed()
    );

    let content = rich_text_to_plain(&note.content);
    for line in content.lines() {
        card.push_str(&format!("{}  {}\n", "│".truecolor(r, g, b), line));
    }
    card
}

/// Render the whole collection, one card after another.
pub fn format_note_grid(notes: &[Note]) -> String {
    if notes.is_empty() {
        return format!("{}\n", EMPTY_STATE.dimmed());
    }

    notes
        .iter()
        .map(format_note_card)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The preset palette with a swatch for each color.
pub fn format_palette() -> String {
    PALETTE
        .iter()
        .map(|color| {
            let (r, g, b) = color_rgb(color);
            format!("{} {}\n", "██".truecolor(r, g, b), color)
        })
        .collect()
}
