//! The interaction state machine.

/// What the pointer is in the middle of doing. Exactly one state is
/// active at a time; every gesture ends back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    /// Moving the selected items.
    Drag,
    /// Resizing a subnet by one of its handles.
    Reshape,
    /// Sweeping a rubberband, for selection or subnet creation.
    Banding,
    /// A connection is anchored and follows the pointer.
    Connect,
    /// Like `Connect`, but re-routing an existing connector's end.
    Reconnect,
    /// Scrolling all layers together.
    Pan,
    /// An icon is about to be stamped on the canvas.
    Placing,
}
