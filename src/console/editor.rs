use serde::Serialize;

use crate::models::RecordId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditorState {
    #[default]
    Idle,
    Composing,
    Editing { id: RecordId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission<D> {
    Create(D),
    Update(RecordId, D),
}

/// Form state for one record type.
///
/// `Idle → Composing → (submit) → Idle` creates, `Idle → Editing → (submit |
/// cancel) → Idle` updates. Every exit back to `Idle` blanks the form.
#[derive(Debug, Clone, Default)]
pub struct Editor<D> {
    state: EditorState,
    draft: D,
}

impl<D: Default + Clone> Editor<D> {
    pub fn new() -> Self {
        Self {
            state: EditorState::Idle,
            draft: D::default(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditorState::Editing { .. })
    }

    /// Start a new record on a blank form.
    pub fn compose(&mut self) {
        self.state = EditorState::Composing;
        self.draft = D::default();
    }

    /// Populate the form from an existing record.
    pub fn edit(&mut self, id: RecordId, draft: D) {
        self.state = EditorState::Editing { id };
        self.draft = draft;
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Replace the form contents. Typing into the idle form starts composing.
    pub fn set_draft(&mut self, draft: D) {
        if self.state == EditorState::Idle {
            self.state = EditorState::Composing;
        }
        self.draft = draft;
    }

    /// Hand the form over for submission and return to a blank idle form.
    /// Nothing is submitted from `Idle`.
    pub fn take_submission(&mut self) -> Option<Submission<D>> {
        let draft = self.draft.clone();
        let submission = match std::mem::take(&mut self.state) {
            EditorState::Idle => None,
            EditorState::Composing => Some(Submission::Create(draft)),
            EditorState::Editing { id } => Some(Submission::Update(id, draft)),
        };
        self.reset();
        submission
    }

    fn reset(&mut self) {
        self.state = EditorState::Idle;
        self.draft = D::default();
    }
}
