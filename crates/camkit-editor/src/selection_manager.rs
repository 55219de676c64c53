use crate::shape_store::{ShapeId, ShapeStore};

/// Ordered selection set with click-cycling state.
///
/// `SelectionManager` is responsible for:
/// - Keeping the selected shapes in the order they were selected
/// - Guaranteeing that a shape appears at most once
/// - Cycling through stacked candidates on repeated clicks
///
/// # Selection Model
///
/// - **Order**: re-selecting a shape moves it to the end of the set
/// - **Replace**: a plain click replaces the whole selection
/// - **Toggle**: with the multi-select modifier held, the clicked shape is
///   added or removed without touching the rest
///
/// # Cycling
///
/// The cycle index belongs to the manager, so every session cycles
/// independently. Clicking the same stack of candidates again advances to the
/// next one; a different stack restarts at the closest.
#[derive(Debug, Clone)]
pub struct SelectionManager {
    selected: Vec<ShapeId>,
    last_candidates: Vec<ShapeId>,
    cycle_index: isize,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use camkit_editor::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert!(manager.is_empty());
    /// assert_eq!(manager.cycle_index(), -1);
    /// ```
    pub fn new() -> Self {
        Self {
            selected: Vec::new(),
            last_candidates: Vec::new(),
            cycle_index: -1,
        }
    }

    /// Returns the selected shape IDs in selection order.
    pub fn selected(&self) -> &[ShapeId] {
        &self.selected
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Index of the candidate picked by the last click, `-1` if none.
    pub fn cycle_index(&self) -> isize {
        self.cycle_index
    }

    /// Adds a shape to the end of the selection.
    ///
    /// If the shape is already selected it is moved to the end, so the set
    /// never holds duplicates.
    ///
    /// # Arguments
    ///
    /// * `id` - The shape to select
    pub fn set_selected(&mut self, id: ShapeId) {
        self.selected.retain(|s| *s != id);
        self.selected.push(id);
    }

    /// Toggles membership of a shape.
    ///
    /// # Returns
    ///
    /// `true` if the shape is selected afterwards.
    pub fn toggle(&mut self, id: ShapeId) -> bool {
        if self.contains(id) {
            self.deselect(id);
            false
        } else {
            self.selected.push(id);
            true
        }
    }

    pub fn deselect(&mut self, id: ShapeId) {
        self.selected.retain(|s| *s != id);
    }

    /// Clears the selection. The cycle state is kept.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replaces the selection with `ids`, dropping duplicates.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.selected.clear();
        for id in ids {
            self.set_selected(id);
        }
    }

    /// Drops selected IDs that are no longer in `store`.
    pub fn retain_existing(&mut self, store: &ShapeStore) {
        self.retain(|id| store.contains(id));
    }

    /// Keeps only the selected IDs for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(ShapeId) -> bool) {
        self.selected.retain(|id| keep(*id));
    }

    /// Applies a click on a stack of candidate shapes.
    ///
    /// # Arguments
    ///
    /// * `candidates` - Shapes under the cursor, closest first
    /// * `multi` - `true` while the multi-select modifier is held
    ///
    /// # Returns
    ///
    /// The candidate that was picked, or `None` when there were none.
    pub fn select_candidate(&mut self, candidates: &[ShapeId], multi: bool) -> Option<ShapeId> {
        if candidates.is_empty() {
            self.cycle_index = -1;
            self.last_candidates.clear();
            return None;
        }
        if candidates == self.last_candidates.as_slice() {
            self.cycle_index = (self.cycle_index + 1) % candidates.len() as isize;
        } else {
            self.cycle_index = 0;
            self.last_candidates = candidates.to_vec();
        }
        let id = candidates[self.cycle_index as usize];
        if multi {
            self.toggle(id);
        } else {
            self.selected.clear();
            self.set_selected(id);
        }
        Some(id)
    }
}
