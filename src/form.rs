//! Create and edit forms.
//!
//! Forms only collect input and validate it. They never talk to the note
//! service: a successful submit yields a [`SubmitIntent`] that the
//! [`DashboardController`](crate::dashboard::DashboardController) acts on.

use crate::error::Result;
use crate::note::{DEFAULT_COLOR, Draft, Note, NoteId};

/// What a form asks the controller to do once its input is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitIntent {
    Add(Draft),
    Update { id: Option<NoteId>, draft: Draft },
}

/// Form for a brand new note.
#[derive(Debug, Clone, Default)]
pub struct NoteForm {
    draft: Draft,
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: Draft) -> Self {
        Self { draft }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    /// Pick a color. An empty value resets to the default.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.draft.color = color_or_default(color.into());
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn submit(&self) -> Result<SubmitIntent> {
        Ok(SubmitIntent::Add(self.draft.validated()?))
    }
}

/// Form for an existing note, seeded from the note's current values.
#[derive(Debug, Clone)]
pub struct NoteEditor {
    id: Option<NoteId>,
    draft: Draft,
}

impl NoteEditor {
    pub fn for_note(note: &Note) -> Self {
        Self {
            id: Some(note.id.clone()),
            draft: Draft::from_note(note),
        }
    }

    /// Editor whose target may be unknown. Submitting without an id is
    /// allowed here; the controller rejects it with `MissingTarget`.
    pub fn new(id: Option<NoteId>, draft: Draft) -> Self {
        Self { id, draft }
    }

    pub fn id(&self) -> Option<&NoteId> {
        self.id.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.draft.color = color_or_default(color.into());
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn submit(&self) -> Result<SubmitIntent> {
        Ok(SubmitIntent::Update {
            id: self.id.clone(),
            draft: self.draft.validated()?,
        })
    }
}

fn color_or_default(color: String) -> String {
    if color.trim().is_empty() {
        DEFAULT_COLOR.to_string()
    } else {
        color
    }
}
