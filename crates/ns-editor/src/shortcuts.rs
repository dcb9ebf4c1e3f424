//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Browsers
//! trap most bare ctrl combos, so everything except delete rides on
//! ctrl+shift.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the selected items.
    Delete,
    /// Ctrl+Shift+D: duplicate the selected items.
    Duplicate,
    /// Ctrl+Shift+A: select everything.
    SelectAll,
    /// Ctrl+Shift+J: dump the document JSON.
    DumpJson,
    /// Ctrl+Shift+L: lock the selected nodes and subnets.
    Lock,
    /// Ctrl+Shift+U: unlock the selected nodes and subnets.
    Unlock,
    /// Ctrl+Shift+V: reload the document from storage.
    ReloadFromStorage,
    /// Ctrl+Shift+G: toggle the background grid.
    ToggleGrid,
    /// Ctrl+Shift+F: toggle the hover feedback display.
    ToggleFeedback,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. `key` is the raw
    /// `KeyboardEvent.key` value; comparison is case-insensitive.
    /// Returns `None` for unbound combos.
    pub fn resolve(key: &str, ctrl: bool, shift: bool) -> Option<ShortcutAction> {
        let key = key.to_lowercase();

        if key == "delete" || key == "backspace" {
            return Some(ShortcutAction::Delete);
        }

        if !(ctrl && shift) {
            return None;
        }

        match key.as_str() {
            "d" => Some(ShortcutAction::Duplicate),
            "a" => Some(ShortcutAction::SelectAll),
            "j" => Some(ShortcutAction::DumpJson),
            "l" => Some(ShortcutAction::Lock),
            "u" => Some(ShortcutAction::Unlock),
            "v" => Some(ShortcutAction::ReloadFromStorage),
            "g" => Some(ShortcutAction::ToggleGrid),
            "f" => Some(ShortcutAction::ToggleFeedback),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn delete_needs_no_modifiers() {
        assert_eq!(ShortcutMap::resolve("Delete", false, false), Some(ShortcutAction::Delete));
        assert_eq!(ShortcutMap::resolve("Backspace", false, false), Some(ShortcutAction::Delete));
    }

    #[test]
    fn everything_else_rides_on_ctrl_shift() {
        assert_eq!(ShortcutMap::resolve("d", true, true), Some(ShortcutAction::Duplicate));
        assert_eq!(ShortcutMap::resolve("D", true, true), Some(ShortcutAction::Duplicate));
        assert_eq!(ShortcutMap::resolve("a", true, true), Some(ShortcutAction::SelectAll));
        assert_eq!(ShortcutMap::resolve("g", true, true), Some(ShortcutAction::ToggleGrid));
        assert_eq!(ShortcutMap::resolve("d", true, false), None);
        assert_eq!(ShortcutMap::resolve("d", false, true), None);
    }

    #[test]
    fn unbound_keys_resolve_to_nothing() {
        assert_eq!(ShortcutMap::resolve("q", true, true), None);
        assert_eq!(ShortcutMap::resolve("7", false, false), None);
    }
}
