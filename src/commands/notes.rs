//! Note commands: each one drives the dashboard controller through the same
//! steps a user would take in the dashboard.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_dashboard, print_toasts};
use crate::display::{format_note_grid, format_palette};
use crate::error::{NoteError, Result};
use crate::note::{NoteId, PALETTE};
use crate::utils::{is_stdin_tty, read_stdin};

/// Field changes requested by `edit`. Unset fields keep the note's value.
#[derive(Debug, Default)]
pub struct NoteEdits {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
}

/// List the notes of the logged-in user
pub async fn cmd_ls(json: bool) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let result = dashboard.initialize().await;
    print_toasts(dashboard.take_toasts(), result.as_ref().err(), json);
    result?;

    CommandOutput::new(json!(dashboard.notes()))
        .with_text(format_note_grid(dashboard.notes()))
        .print(json)
}

/// Create a note through the create form
pub async fn cmd_add(
    title: String,
    content: Option<String>,
    color: Option<String>,
    json: bool,
) -> Result<()> {
    let content = match content {
        Some(content) => content,
        None if !is_stdin_tty() => read_stdin()?,
        None => String::new(),
    };

    let mut dashboard = open_dashboard()?;
    dashboard.open_create_modal()?;
    if let Some(draft) = dashboard.draft_mut() {
        draft.title = title;
        draft.content = content;
        if let Some(color) = color {
            draft.color = color;
        }
    }

    let draft = dashboard.draft().cloned().unwrap_or_default();
    let result = dashboard.create(draft).await;
    print_toasts(dashboard.take_toasts(), result.as_ref().err(), json);
    let created = result?;

    CommandOutput::new(json!({
        "action": "note_created",
        "note": created,
        "count": dashboard.notes().len(),
    }))
    .with_text(format!("{} {}", "Created".green(), created.id.cyan()))
    .print(json)
}

/// Edit a note through the edit form, seeded from its current values
pub async fn cmd_edit(id: &str, edits: NoteEdits, json: bool) -> Result<()> {
    if edits.title.is_none() && edits.content.is_none() && edits.color.is_none() {
        return Err(NoteError::Validation(
            "nothing to change; pass --title, --content or --color".to_string(),
        ));
    }

    let id = NoteId::from(id);
    let mut dashboard = open_dashboard()?;
    let result = dashboard.initialize().await;
    print_toasts(dashboard.take_toasts(), result.as_ref().err(), json);
    result?;

    dashboard.open_edit_modal_by_id(&id)?;
    if let Some(draft) = dashboard.draft_mut() {
        if let Some(title) = edits.title {
            draft.title = title;
        }
        if let Some(content) = edits.content {
            draft.content = content;
        }
        if let Some(color) = edits.color {
            draft.color = color;
        }
    }

    let result = dashboard.submit().await;
    print_toasts(dashboard.take_toasts(), result.as_ref().err(), json);
    result?;

    CommandOutput::new(json!({
        "action": "note_updated",
        "note": dashboard.note(&id),
    }))
    .with_text(format!("{} {}", "Updated".green(), id.cyan()))
    .print(json)
}

/// Delete a note
pub async fn cmd_rm(id: &str, json: bool) -> Result<()> {
    let id = NoteId::from(id);
    let mut dashboard = open_dashboard()?;

    let result = dashboard.delete(&id).await;
    print_toasts(dashboard.take_toasts(), result.as_ref().err(), json);
    result?;

    CommandOutput::new(json!({
        "action": "note_deleted",
        "id": id,
    }))
    .with_text(format!("{} {}", "Deleted".green(), id.cyan()))
    .print(json)
}

/// Show the preset note colors
pub fn cmd_colors(json: bool) -> Result<()> {
    CommandOutput::new(json!(PALETTE))
        .with_text(format_palette())
        .print(json)
}
