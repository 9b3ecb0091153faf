//! Which note form is open, and the draft it is editing.
//!
//! ```text
//! Closed ──open_create──▶ Creating(draft)
//! Closed ──open_edit────▶ Editing { note, draft }
//! Creating | Editing ──close / successful submit──▶ Closed
//! ```
//!
//! There is no direct edge between `Creating` and `Editing`; the form has to
//! be closed first, which discards its draft.

use crate::error::{NoteError, Result};
use crate::note::{Draft, Note};

/// Modal visibility plus the draft bound to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Creating(Draft),
    Editing {
        /// The note as it was when the editor opened
        note: Note,
        draft: Draft,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            ModalState::Closed => None,
            ModalState::Creating(draft) | ModalState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            ModalState::Closed => None,
            ModalState::Creating(draft) | ModalState::Editing { draft, .. } => Some(draft),
        }
    }

    /// The note being edited, if the edit form is open.
    pub fn target(&self) -> Option<&Note> {
        match self {
            ModalState::Editing { note, .. } => Some(note),
            _ => None,
        }
    }

    pub fn open_create(&mut self) -> Result<()> {
        self.ensure_closed()?;
        *self = ModalState::Creating(Draft::default());
        Ok(())
    }

    pub fn open_edit(&mut self, note: Note) -> Result<()> {
        self.ensure_closed()?;
        let draft = Draft::from_note(&note);
        *self = ModalState::Editing { note, draft };
        Ok(())
    }

    /// Close whatever is open. The draft goes with it.
    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }

    fn ensure_closed(&self) -> Result<()> {
        if self.is_open() {
            return Err(NoteError::ModalBusy);
        }
        Ok(())
    }
}
