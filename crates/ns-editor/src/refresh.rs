//! Redraw coalescing.
//!
//! Gestures request refreshes far faster than the host can paint.
//! Requests only set flags; the host calls `tick` once per frame and
//! repaints whatever was requested since the last tick.

#[derive(Debug, Default)]
pub struct RefreshCoalescer {
    canvas: bool,
    editor: bool,
    toolbar: bool,
}

/// What needs repainting this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshSet {
    pub canvas: bool,
    pub editor: bool,
    pub toolbar: bool,
}

impl RefreshSet {
    pub fn any(self) -> bool {
        self.canvas || self.editor || self.toolbar
    }
}

impl RefreshCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_canvas(&mut self) {
        self.canvas = true;
    }

    pub fn request_editor(&mut self) {
        self.editor = true;
    }

    pub fn request_toolbar(&mut self) {
        self.toolbar = true;
    }

    pub fn request_all(&mut self) {
        self.canvas = true;
        self.editor = true;
        self.toolbar = true;
    }

    /// Take the pending set, clearing it.
    pub fn tick(&mut self) -> RefreshSet {
        let set = RefreshSet { canvas: self.canvas, editor: self.editor, toolbar: self.toolbar };
        self.canvas = false;
        self.editor = false;
        self.toolbar = false;
        set
    }
}
