use super::ViewError;
use crate::models::RecommendationEntry;

/// Cards shown per search.
pub const MAX_VISIBLE: usize = 3;
/// Cars that fit side by side in the comparison modal.
pub const MAX_COMPARE: usize = 3;

/// Rendered result list plus the comparison selection.
#[derive(Debug, Clone, Default)]
pub struct RecommendationView {
    entries: Vec<RecommendationEntry>,
    selected: Vec<usize>,
    comparing: bool,
}

impl RecommendationView {
    /// Entries stay in scorer order.
    pub fn new(entries: Vec<RecommendationEntry>) -> Self {
        Self {
            entries,
            selected: Vec::new(),
            comparing: false,
        }
    }

    pub fn visible(&self) -> &[RecommendationEntry] {
        &self.entries[..self.entries.len().min(MAX_VISIBLE)]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds or removes a visible card from the comparison; returns whether
    /// it is selected afterwards.
    pub fn toggle_compare(&mut self, index: usize) -> Result<bool, ViewError> {
        if index >= self.visible().len() {
            return Err(ViewError::NoSuchEntry(index));
        }
        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            if self.selected.len() < 2 {
                self.comparing = false;
            }
            return Ok(false);
        }
        if self.selected.len() >= MAX_COMPARE {
            return Err(ViewError::SelectionFull(MAX_COMPARE));
        }
        self.selected.push(index);
        Ok(true)
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn open_comparison(&mut self) -> Result<Vec<&RecommendationEntry>, ViewError> {
        if self.selected.len() < 2 {
            return Err(ViewError::NotEnoughSelected);
        }
        self.comparing = true;
        Ok(self.selected.iter().map(|&i| &self.entries[i]).collect())
    }

    pub fn close_comparison(&mut self) {
        self.comparing = false;
    }

    pub fn is_comparing(&self) -> bool {
        self.comparing
    }
}
