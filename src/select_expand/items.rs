use std::rc::Rc;

use crate::apply::ApplyClause;
use crate::edm::NavigationSourceId;
use crate::error::{Result, require_non_empty};
use crate::nodes::{FilterClause, LevelsClause, SearchClause};
use crate::path::{ODataExpandPath, ODataSelectPath, PathSegment};
use crate::select_expand::{SelectExpandClause, SelectExpandOptions};

/// A selected path, e.g. `Name`, `Address/City` or `Trips($top=2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSelectItem {
    path: ODataSelectPath,
    navigation_source: Option<NavigationSourceId>,
    options: SelectExpandOptions,
    select_and_expand: Option<Rc<SelectExpandClause>>,
}

impl PathSelectItem {
    pub fn new(path: ODataSelectPath) -> Self {
        PathSelectItem {
            path,
            navigation_source: None,
            options: SelectExpandOptions::default(),
            select_and_expand: None,
        }
    }

    pub fn with_navigation_source(mut self, navigation_source: NavigationSourceId) -> Self {
        self.navigation_source = Some(navigation_source);
        self
    }

    pub fn with_options(mut self, options: SelectExpandOptions) -> Self {
        self.options = options;
        self
    }

    /// Nested `$select`/`$expand` of a complex or collection path.
    pub fn with_select_and_expand(mut self, clause: SelectExpandClause) -> Self {
        self.select_and_expand = Some(Rc::new(clause));
        self
    }

    pub fn selected_path(&self) -> &ODataSelectPath {
        &self.path
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.navigation_source
    }

    pub fn options(&self) -> &SelectExpandOptions {
        &self.options
    }

    pub fn select_and_expand(&self) -> Option<&Rc<SelectExpandClause>> {
        self.select_and_expand.as_ref()
    }

    /// Whether the item carries nested options or a nested select/expand.
    pub fn has_nested_options(&self) -> bool {
        !self.options.is_empty() || self.select_and_expand.is_some()
    }

    /// A plain selection of declared or dynamic properties, the kind of
    /// item a `*` at the same level covers.
    pub(crate) fn is_structural_or_navigation(&self) -> bool {
        self.path.iter().all(|segment| {
            matches!(
                segment,
                PathSegment::Property(_)
                    | PathSegment::NavigationProperty(_)
                    | PathSegment::DynamicPath(_)
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Expansion {
    path: ODataExpandPath,
    navigation_source: Option<NavigationSourceId>,
    options: SelectExpandOptions,
}

impl Expansion {
    fn new(path: ODataExpandPath, navigation_source: Option<NavigationSourceId>) -> Self {
        Expansion {
            path,
            navigation_source,
            options: SelectExpandOptions::default(),
        }
    }
}

macro_rules! expansion_accessors {
    ($($item:ident),*) => {
        $(
            impl $item {
                pub fn with_options(mut self, options: SelectExpandOptions) -> Self {
                    self.expansion.options = options;
                    self
                }

                pub fn path_to_navigation_property(&self) -> &ODataExpandPath {
                    &self.expansion.path
                }

                /// Target navigation source of the expanded property.
                pub fn navigation_source(&self) -> Option<NavigationSourceId> {
                    self.expansion.navigation_source
                }

                pub fn options(&self) -> &SelectExpandOptions {
                    &self.expansion.options
                }
            }
        )*
    };
}

/// `$expand=Nav(...)`: expands the related entities in full.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedNavigationSelectItem {
    expansion: Expansion,
    select_and_expand: Rc<SelectExpandClause>,
    levels: Option<LevelsClause>,
    apply: Option<ApplyClause>,
}

impl ExpandedNavigationSelectItem {
    pub fn new(
        path: ODataExpandPath,
        navigation_source: Option<NavigationSourceId>,
        select_and_expand: SelectExpandClause,
    ) -> Self {
        ExpandedNavigationSelectItem {
            expansion: Expansion::new(path, navigation_source),
            select_and_expand: Rc::new(select_and_expand),
            levels: None,
            apply: None,
        }
    }

    pub fn with_levels(mut self, levels: LevelsClause) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn with_apply(mut self, apply: ApplyClause) -> Self {
        self.apply = Some(apply);
        self
    }

    pub fn select_and_expand(&self) -> &Rc<SelectExpandClause> {
        &self.select_and_expand
    }

    pub fn levels(&self) -> Option<&LevelsClause> {
        self.levels.as_ref()
    }

    pub fn apply(&self) -> Option<&ApplyClause> {
        self.apply.as_ref()
    }
}

/// `$expand=Nav/$ref`: expands entity references only.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedReferenceSelectItem {
    expansion: Expansion,
}

impl ExpandedReferenceSelectItem {
    pub fn new(path: ODataExpandPath, navigation_source: Option<NavigationSourceId>) -> Self {
        ExpandedReferenceSelectItem {
            expansion: Expansion::new(path, navigation_source),
        }
    }
}

/// `$expand=Nav/$count`: expands the number of related entities.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedCountSelectItem {
    expansion: Expansion,
}

impl ExpandedCountSelectItem {
    pub fn new(path: ODataExpandPath, navigation_source: Option<NavigationSourceId>) -> Self {
        ExpandedCountSelectItem {
            expansion: Expansion::new(path, navigation_source),
        }
    }
}

expansion_accessors!(
    ExpandedNavigationSelectItem,
    ExpandedReferenceSelectItem,
    ExpandedCountSelectItem
);

/// `$select=*`.
///
/// Same-level path selections present when the wildcard is added are moved
/// here, so a consumer can still tell they were named explicitly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WildcardSelectItem {
    subsumed: Vec<PathSelectItem>,
}

impl WildcardSelectItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subsumed_items(&self) -> &[PathSelectItem] {
        &self.subsumed
    }

    pub(crate) fn absorb(&mut self, items: impl IntoIterator<Item = PathSelectItem>) {
        self.subsumed.extend(items);
    }
}

/// `$select=NS.*`: all operations of one namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceQualifiedWildcardSelectItem {
    namespace: String,
}

impl NamespaceQualifiedWildcardSelectItem {
    pub fn new(namespace: &str) -> Result<Self> {
        require_non_empty(namespace, "namespace")?;
        Ok(NamespaceQualifiedWildcardSelectItem {
            namespace: namespace.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// `$select=Emails/$count($filter=...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCountSelectItem {
    path: ODataSelectPath,
    filter: Option<FilterClause>,
    search: Option<SearchClause>,
}

impl PathCountSelectItem {
    pub fn new(path: ODataSelectPath) -> Self {
        PathCountSelectItem {
            path,
            filter: None,
            search: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_search(mut self, search: SearchClause) -> Self {
        self.search = Some(search);
        self
    }

    pub fn selected_path(&self) -> &ODataSelectPath {
        &self.path
    }

    pub fn filter(&self) -> Option<&FilterClause> {
        self.filter.as_ref()
    }

    pub fn search(&self) -> Option<&SearchClause> {
        self.search.as_ref()
    }
}
