//! Notices the editor raises for the host shell: selection changes for
//! the property panel, dirty marks for autosave.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The selection changed; property panels should re-bind.
    SelectionChanged,
    /// The scene was edited; the string names the editing operation.
    Dirty(&'static str),
}

#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.pending.push_back(notice);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
