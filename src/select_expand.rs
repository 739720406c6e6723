//! # `$select` and `$expand`
//!
//! A [`SelectExpandClause`] lists the [`SelectItem`]s of one level; expanded
//! navigation items carry the clause of the next level, so the tree is as
//! deep as the expand paths.
//!
//! ```
//! use odata_semantic::select_expand::{SelectExpandClause, SelectItem, WildcardSelectItem};
//!
//! let mut clause = SelectExpandClause::new(false);
//! clause.add_selected_item(SelectItem::from(WildcardSelectItem::new()));
//! assert!(clause.all_selected());
//! assert!(clause.wildcard().is_some());
//! ```

pub mod clause;
pub mod items;
pub mod options;

pub use clause::{SelectExpandClause, WildcardMerge};
pub use items::{
    ExpandedCountSelectItem, ExpandedNavigationSelectItem, ExpandedReferenceSelectItem,
    NamespaceQualifiedWildcardSelectItem, PathCountSelectItem, PathSelectItem, WildcardSelectItem,
};
pub use options::SelectExpandOptions;

/// Discriminant of [`SelectItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectItemKind {
    Path,
    ExpandedNavigation,
    ExpandedReference,
    ExpandedCount,
    Wildcard,
    NamespaceQualifiedWildcard,
    PathCount,
}

/// One item of a `$select` or `$expand` level.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Path(PathSelectItem),
    ExpandedNavigation(ExpandedNavigationSelectItem),
    ExpandedReference(ExpandedReferenceSelectItem),
    ExpandedCount(ExpandedCountSelectItem),
    Wildcard(WildcardSelectItem),
    NamespaceQualifiedWildcard(NamespaceQualifiedWildcardSelectItem),
    PathCount(PathCountSelectItem),
}

impl SelectItem {
    pub fn kind(&self) -> SelectItemKind {
        match self {
            SelectItem::Path(_) => SelectItemKind::Path,
            SelectItem::ExpandedNavigation(_) => SelectItemKind::ExpandedNavigation,
            SelectItem::ExpandedReference(_) => SelectItemKind::ExpandedReference,
            SelectItem::ExpandedCount(_) => SelectItemKind::ExpandedCount,
            SelectItem::Wildcard(_) => SelectItemKind::Wildcard,
            SelectItem::NamespaceQualifiedWildcard(_) => SelectItemKind::NamespaceQualifiedWildcard,
            SelectItem::PathCount(_) => SelectItemKind::PathCount,
        }
    }

    pub fn is_expansion(&self) -> bool {
        matches!(
            self,
            SelectItem::ExpandedNavigation(_)
                | SelectItem::ExpandedReference(_)
                | SelectItem::ExpandedCount(_)
        )
    }
}

macro_rules! select_item_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for SelectItem {
                fn from(item: $ty) -> Self {
                    SelectItem::$variant(item)
                }
            }
        )*
    };
}

select_item_from!(
    Path(PathSelectItem),
    ExpandedNavigation(ExpandedNavigationSelectItem),
    ExpandedReference(ExpandedReferenceSelectItem),
    ExpandedCount(ExpandedCountSelectItem),
    Wildcard(WildcardSelectItem),
    NamespaceQualifiedWildcard(NamespaceQualifiedWildcardSelectItem),
    PathCount(PathCountSelectItem),
);
