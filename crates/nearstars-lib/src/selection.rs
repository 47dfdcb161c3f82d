//! Selected and highlighted stars.

use std::collections::HashSet;

/// Tracks which stars are selected and which are highlighted.
///
/// Selection and highlighting are independent: a star may be highlighted
/// without being selected and vice versa. Both sets forbid duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected: HashSet<String>,
    highlighted: HashSet<String>,
    focus: Option<String>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a star to the selection. Returns `false` when it was already selected,
    /// in which case nothing changes.
    pub fn select(&mut self, name: &str) -> bool {
        if self.selected.contains(name) {
            return false;
        }
        self.selected.insert(name.to_string());
        self.focus = Some(name.to_string());
        true
    }

    /// Remove a star from the selection. Returns `false` when it was not selected.
    pub fn deselect(&mut self, name: &str) -> bool {
        let removed = self.selected.remove(name);
        if self.focus.as_deref() == Some(name) {
            self.focus = None;
        }
        removed
    }

    /// Empty the selection. Highlights are kept.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.focus = None;
    }

    /// Flip the highlighted status of a star, returning the new status.
    pub fn toggle_highlight(&mut self, name: &str) -> bool {
        if self.highlighted.remove(name) {
            false
        } else {
            self.highlighted.insert(name.to_string());
            true
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn is_highlighted(&self, name: &str) -> bool {
        self.highlighted.contains(name)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Most recently selected star that is still selected.
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Selected names in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Selected names sorted alphabetically.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }

    /// Highlighted names sorted alphabetically.
    pub fn highlighted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.highlighted.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deselecting_focus_clears_it() {
        let mut selection = SelectionManager::new();
        selection.select("Sun");
        selection.select("Sirius A");
        assert_eq!(selection.focus(), Some("Sirius A"));
        assert!(selection.deselect("Sirius A"));
        assert_eq!(selection.focus(), None);
        assert!(!selection.deselect("Sirius A"));
        assert_eq!(selection.sorted(), vec!["Sun"]);
    }

    #[test]
    fn highlight_is_independent_of_selection() {
        let mut selection = SelectionManager::new();
        assert!(selection.toggle_highlight("Vega"));
        assert!(!selection.is_selected("Vega"));
        selection.select("Vega");
        selection.clear();
        assert!(selection.is_highlighted("Vega"));
        assert!(!selection.toggle_highlight("Vega"));
        assert!(selection.highlighted().is_empty());
    }
}
