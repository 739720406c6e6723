mod common;

use common::{Fixture, fixture};
use odata_semantic::edm::{EdmType, PropertyId};
use odata_semantic::nodes::{LevelsClause, SearchClause, SearchTermNode, SingleValueNode};
use odata_semantic::path::*;
use odata_semantic::select_expand::*;
use odata_semantic::SemanticError;
use std::rc::Rc;

fn select(f: &Fixture, property: PropertyId) -> PathSelectItem {
    let segment = PropertySegment::new(&f.model, property).unwrap();
    PathSelectItem::new(ODataSelectPath::new(vec![segment.into()]).unwrap())
}

fn select_manager_budget(f: &Fixture) -> PathSelectItem {
    let cast = TypeSegment::new(&f.model, EdmType::Entity(f.manager), Some(f.people)).unwrap();
    let budget = PropertySegment::new(&f.model, f.manager_budget).unwrap();
    PathSelectItem::new(ODataSelectPath::new(vec![cast.into(), budget.into()]).unwrap())
}

fn expand_trips(f: &Fixture) -> ODataExpandPath {
    let trips = NavigationPropertySegment::new(&f.model, f.trips, Some(f.trips_set)).unwrap();
    ODataExpandPath::new(vec![trips.into()]).unwrap()
}

fn selected_names(items: &[PathSelectItem]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|item| item.selected_path().last_segment())
        .map(PathSegment::identifier)
        .collect()
}

// ============================================================================
// Clause basics
// ============================================================================

#[test]
fn test_items_keep_insertion_order() {
    let f = fixture();
    let clause = SelectExpandClause::from_items(
        [
            select(&f, f.name).into(),
            ExpandedReferenceSelectItem::new(expand_trips(&f), Some(f.trips_set)).into(),
            select(&f, f.age).into(),
        ],
        false,
    );
    let kinds: Vec<_> = clause.iter().map(SelectItem::kind).collect();
    assert_eq!(
        kinds,
        vec![
            SelectItemKind::Path,
            SelectItemKind::ExpandedReference,
            SelectItemKind::Path,
        ]
    );
    assert!(!clause.all_selected());
    assert!(clause.wildcard().is_none());
}

#[test]
fn test_expansion_items() {
    let f = fixture();
    let nested = SelectExpandClause::from_items([select(&f, f.description).into()], false);
    let item = ExpandedNavigationSelectItem::new(expand_trips(&f), Some(f.trips_set), nested)
        .with_levels(LevelsClause::max())
        .with_options(SelectExpandOptions::new().with_top(2).with_count(true));

    assert_eq!(item.navigation_source(), Some(f.trips_set));
    assert_eq!(item.levels().map(|l| l.is_max_level), Some(true));
    assert_eq!(item.options().top, Some(2));
    assert_eq!(item.select_and_expand().selected_items().len(), 1);
    assert!(item.apply().is_none());
    assert_eq!(
        item.path_to_navigation_property()
            .navigation_property_segment()
            .map(|s| s.identifier()),
        Some("Trips")
    );

    let item = SelectItem::from(item);
    assert!(item.is_expansion());
    assert!(SelectItem::from(ExpandedCountSelectItem::new(expand_trips(&f), None)).is_expansion());
    assert!(!SelectItem::from(select(&f, f.name)).is_expansion());
}

#[test]
fn test_namespace_wildcard() {
    let item = NamespaceQualifiedWildcardSelectItem::new("NS").unwrap();
    assert_eq!(item.namespace(), "NS");
    assert_eq!(
        NamespaceQualifiedWildcardSelectItem::new("").unwrap_err(),
        SemanticError::ArgumentNullOrEmpty("namespace")
    );
}

#[test]
fn test_path_count_item() {
    let f = fixture();
    let emails = PropertySegment::new(&f.model, f.emails).unwrap();
    let path = ODataSelectPath::new(vec![emails.into()]).unwrap();
    let term = Rc::new(SingleValueNode::from(SearchTermNode::new("gmail").unwrap()));
    let item = PathCountSelectItem::new(path).with_search(SearchClause::new(term));
    assert!(item.search().is_some());
    assert!(item.filter().is_none());
    assert_eq!(SelectItem::from(item).kind(), SelectItemKind::PathCount);
}

#[test]
fn test_nested_options_detection() {
    let f = fixture();
    assert!(!select(&f, f.name).has_nested_options());
    assert!(select(&f, f.emails)
        .with_options(SelectExpandOptions::new().with_top(1))
        .has_nested_options());
    let nested = SelectExpandClause::from_items([select(&f, f.city).into()], false);
    assert!(select(&f, f.home_address)
        .with_select_and_expand(nested)
        .has_nested_options());
}

// ============================================================================
// Wildcards
// ============================================================================

#[test]
fn test_wildcard_subsumes_structural_items() {
    let f = fixture();
    let expand = ExpandedNavigationSelectItem::new(
        expand_trips(&f),
        Some(f.trips_set),
        SelectExpandClause::new(true),
    );
    let mut clause = SelectExpandClause::from_items(
        [
            select(&f, f.name).into(),
            select(&f, f.age).into(),
            expand.into(),
        ],
        false,
    );
    clause.add_selected_item(WildcardSelectItem::new().into());

    assert!(clause.all_selected());
    let kinds: Vec<_> = clause.iter().map(SelectItem::kind).collect();
    assert_eq!(
        kinds,
        vec![SelectItemKind::ExpandedNavigation, SelectItemKind::Wildcard]
    );
    let wildcard = clause.wildcard().unwrap();
    assert_eq!(selected_names(wildcard.subsumed_items()), vec!["Name", "Age"]);
}

#[test]
fn test_wildcard_keeps_cast_selections() {
    let f = fixture();
    let mut clause =
        SelectExpandClause::from_items([select_manager_budget(&f).into()], false);
    clause.add_wildcard(WildcardSelectItem::new(), WildcardMerge::Replace);
    assert_eq!(clause.selected_items().len(), 2);
    assert!(clause.wildcard().unwrap().subsumed_items().is_empty());
}

#[test]
fn test_items_after_wildcard_stay_active() {
    let f = fixture();
    let mut clause = SelectExpandClause::new(false);
    clause.add_selected_item(WildcardSelectItem::new().into());
    clause.add_selected_item(select(&f, f.name).into());
    assert_eq!(clause.selected_items().len(), 2);
    assert!(clause.wildcard().unwrap().subsumed_items().is_empty());
}

#[test]
fn test_subset_only_wildcard_is_idempotent() {
    let f = fixture();
    let nested = SelectExpandClause::from_items([select(&f, f.city).into()], false);
    let mut clause = SelectExpandClause::from_items(
        [
            select(&f, f.home_address).with_select_and_expand(nested).into(),
            select(&f, f.name).into(),
        ],
        false,
    );
    clause.add_wildcard(WildcardSelectItem::new(), WildcardMerge::SubsetOnly);
    let once = clause.clone();
    clause.add_wildcard(WildcardSelectItem::new(), WildcardMerge::SubsetOnly);

    assert_eq!(clause, once);
    let subsumed = clause.wildcard().unwrap().subsumed_items();
    assert_eq!(selected_names(subsumed), vec!["HomeAddress", "Name"]);
    assert!(subsumed[0].has_nested_options());
}

#[test]
fn test_subset_only_merges_later_selections_into_first_wildcard() {
    let f = fixture();
    let mut clause = SelectExpandClause::from_items([select(&f, f.name).into()], false);
    clause.add_wildcard(WildcardSelectItem::new(), WildcardMerge::SubsetOnly);
    clause.add_selected_item(select(&f, f.age).into());
    clause.add_wildcard(WildcardSelectItem::new(), WildcardMerge::SubsetOnly);

    let wildcards = clause
        .iter()
        .filter(|item| item.kind() == SelectItemKind::Wildcard)
        .count();
    assert_eq!(wildcards, 1);
    assert_eq!(
        selected_names(clause.wildcard().unwrap().subsumed_items()),
        vec!["Name", "Age"]
    );
}

#[test]
fn test_replace_takes_over_earlier_subsumed_items() {
    let f = fixture();
    let mut clause = SelectExpandClause::from_items([select(&f, f.name).into()], false);
    clause.add_wildcard(WildcardSelectItem::new(), WildcardMerge::Replace);
    clause.add_selected_item(select(&f, f.age).into());
    clause.add_wildcard(WildcardSelectItem::new(), WildcardMerge::Replace);

    assert_eq!(clause.selected_items().len(), 1);
    assert_eq!(
        selected_names(clause.wildcard().unwrap().subsumed_items()),
        vec!["Name", "Age"]
    );
}

#[test]
fn test_second_wildcard_keeps_nested_selection() {
    let f = fixture();
    let nested = SelectExpandClause::from_items([select(&f, f.city).into()], false);
    let mut clause = SelectExpandClause::from_items(
        [select(&f, f.home_address).with_select_and_expand(nested).into()],
        false,
    );
    clause.add_selected_item(WildcardSelectItem::new().into());
    clause.add_selected_item(WildcardSelectItem::new().into());

    let wildcards = clause
        .iter()
        .filter(|item| item.kind() == SelectItemKind::Wildcard)
        .count();
    assert_eq!(wildcards, 1);
    let subsumed = clause.wildcard().unwrap().subsumed_items();
    assert_eq!(selected_names(subsumed), vec!["HomeAddress"]);
    assert!(subsumed[0].has_nested_options());
    assert_eq!(
        subsumed[0].select_and_expand().map(|c| c.selected_items().len()),
        Some(1)
    );
}
