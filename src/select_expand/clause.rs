use tracing::{debug, trace};

use crate::select_expand::{PathSelectItem, SelectItem, WildcardSelectItem};

/// How a wildcard merges with a wildcard already in the clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WildcardMerge {
    /// The new wildcard replaces the earlier one and its subsumed items.
    #[default]
    Replace,
    /// The earlier wildcard stays; it absorbs what the new one would have.
    SubsetOnly,
}

/// The selection at one level of a `$select`/`$expand` tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectExpandClause {
    selected_items: Vec<SelectItem>,
    all_selected: bool,
}

impl SelectExpandClause {
    pub fn new(all_selected: bool) -> Self {
        SelectExpandClause {
            selected_items: Vec::new(),
            all_selected,
        }
    }

    /// Adds `items` in order, as by [`add_selected_item`](Self::add_selected_item).
    pub fn from_items(items: impl IntoIterator<Item = SelectItem>, all_selected: bool) -> Self {
        let mut clause = Self::new(all_selected);
        for item in items {
            clause.add_selected_item(item);
        }
        clause
    }

    pub fn selected_items(&self) -> &[SelectItem] {
        &self.selected_items
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectItem> {
        self.selected_items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_items.is_empty()
    }

    /// The wildcard at this level, if any.
    pub fn wildcard(&self) -> Option<&WildcardSelectItem> {
        self.selected_items.iter().find_map(|item| match item {
            SelectItem::Wildcard(wildcard) => Some(wildcard),
            _ => None,
        })
    }

    /// Appends an item. A wildcard is merged with [`WildcardMerge::Replace`].
    pub fn add_selected_item(&mut self, item: SelectItem) {
        match item {
            SelectItem::Wildcard(wildcard) => self.add_wildcard(wildcard, WildcardMerge::Replace),
            other => self.selected_items.push(other),
        }
    }

    /// Adds a wildcard and moves the same-level structural and navigation
    /// path selections into its subsumed items. Marks the clause as
    /// selecting everything.
    ///
    /// `Replace` puts the new wildcard in place of an earlier one and takes
    /// over the items the earlier one subsumed. `SubsetOnly` keeps the
    /// earlier wildcard and merges into it.
    pub fn add_wildcard(&mut self, mut wildcard: WildcardSelectItem, merge: WildcardMerge) {
        let absorbed = self.take_subsumable();
        trace!(absorbed = absorbed.len(), ?merge, "wildcard added");
        let existing = self
            .selected_items
            .iter()
            .position(|item| matches!(item, SelectItem::Wildcard(_)));
        match (merge, existing) {
            (WildcardMerge::SubsetOnly, Some(index)) => {
                if let SelectItem::Wildcard(existing) = &mut self.selected_items[index] {
                    existing.absorb(absorbed);
                    existing.absorb(wildcard.subsumed_items().iter().cloned());
                }
            }
            (WildcardMerge::Replace, Some(index)) => {
                debug!("replacing earlier wildcard");
                if let SelectItem::Wildcard(earlier) = self.selected_items.remove(index) {
                    wildcard.absorb(earlier.subsumed_items().iter().cloned());
                }
                wildcard.absorb(absorbed);
                self.selected_items.push(SelectItem::Wildcard(wildcard));
            }
            (_, None) => {
                wildcard.absorb(absorbed);
                self.selected_items.push(SelectItem::Wildcard(wildcard));
            }
        }
        self.all_selected = true;
    }

    fn take_subsumable(&mut self) -> Vec<PathSelectItem> {
        let mut absorbed = Vec::new();
        for item in std::mem::take(&mut self.selected_items) {
            match item {
                SelectItem::Path(path) if path.is_structural_or_navigation() => absorbed.push(path),
                other => self.selected_items.push(other),
            }
        }
        absorbed
    }
}

impl<'a> IntoIterator for &'a SelectExpandClause {
    type Item = &'a SelectItem;
    type IntoIter = std::slice::Iter<'a, SelectItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
