mod common;

use common::{Fixture, fixture};
use odata_semantic::edm::{EdmType, PrimitiveKind};
use odata_semantic::path::*;
use odata_semantic::{ODataValue, PathKind, SemanticError};
use proptest::prelude::*;

fn people(f: &Fixture) -> PathSegment {
    EntitySetSegment::new(&f.model, f.people).unwrap().into()
}

fn key(f: &Fixture, id: i32) -> KeySegment {
    KeySegment::new(
        &f.model,
        vec![("Id".to_string(), ODataValue::Int32(id))],
        f.person,
        Some(f.people),
    )
    .unwrap()
}

fn as_manager(f: &Fixture) -> PathSegment {
    TypeSegment::new(&f.model, EdmType::Entity(f.manager), Some(f.people))
        .unwrap()
        .into()
}

fn trips(f: &Fixture) -> PathSegment {
    NavigationPropertySegment::new(&f.model, f.trips, Some(f.trips_set))
        .unwrap()
        .into()
}

fn property(f: &Fixture, id: odata_semantic::edm::PropertyId) -> PathSegment {
    PropertySegment::new(&f.model, id).unwrap().into()
}

fn identifiers(path: &ODataPath) -> Vec<&str> {
    path.iter().map(PathSegment::identifier).collect()
}

// ============================================================================
// Trimming and appending
// ============================================================================

#[test]
fn test_trim_ending_type_segment() {
    let f = fixture();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), as_manager(&f), as_manager(&f)]);
    let trimmed = path.trim_ending_type_segment();
    assert_eq!(identifiers(&trimmed), vec!["People", "(1)"]);
    assert_eq!(path.len(), 4);
}

#[test]
fn test_trim_ending_key_segment_skips_trailing_types() {
    let f = fixture();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), as_manager(&f)]);
    assert_eq!(identifiers(&path.trim_ending_key_segment()), vec!["People"]);
}

#[test]
fn test_trim_ending_key_segment_without_key_is_unchanged() {
    let f = fixture();
    let path = ODataPath::new(vec![people(&f), as_manager(&f)]);
    assert_eq!(path.trim_ending_key_segment(), path);
}

#[test]
fn test_trim_ending_type_and_key_segments() {
    let f = fixture();
    let path = ODataPath::new(vec![
        people(&f),
        as_manager(&f),
        key(&f, 1).into(),
        as_manager(&f),
    ]);
    assert_eq!(
        identifiers(&path.trim_ending_type_and_key_segments()),
        vec!["People"]
    );
}

#[test]
fn test_trim_empty_path() {
    let path = ODataPath::default();
    assert!(path.trim_ending_type_segment().is_empty());
    assert!(path.trim_ending_key_segment().is_empty());
    assert!(path.trim_ending_type_and_key_segments().is_empty());
}

#[test]
fn test_append_key_goes_before_trailing_types() {
    let f = fixture();
    let path = ODataPath::new(vec![people(&f), as_manager(&f)]);
    let keyed = path.append_key_segment(key(&f, 7));
    assert_eq!(identifiers(&keyed), vec!["People", "(7)", "NS.Manager"]);
    assert_eq!(keyed.to_resource_path_string(), "People(7)/NS.Manager");
    assert_eq!(path.len(), 2);
}

#[test]
fn test_append_segment() {
    let f = fixture();
    let path = ODataPath::new(vec![people(&f)]).append_segment(CountSegment::new());
    assert_eq!(path.to_resource_path_string(), "People/$count");
}

// ============================================================================
// Path queries
// ============================================================================

#[test]
fn test_resource_path_string() {
    let f = fixture();
    let path: ODataPath = vec![
        people(&f),
        key(&f, 1).into(),
        trips(&f),
        CountSegment::new().into(),
    ]
    .into();
    assert_eq!(path.to_resource_path_string(), "People(1)/Trips/$count");
}

#[test]
fn test_resource_path_with_value_and_link() {
    let f = fixture();
    let name = property(&f, f.name);
    let value = ValueSegment::new(Some(&EdmType::Primitive(PrimitiveKind::String))).unwrap();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), name, value.into()]);
    assert_eq!(path.to_resource_path_string(), "People(1)/Name/$value");

    let link = NavigationPropertyLinkSegment::new(&f.model, f.best_friend, Some(f.people)).unwrap();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), link.into()]);
    assert_eq!(path.to_resource_path_string(), "People(1)/BestFriend/$ref");
}

#[test]
fn test_individual_property() {
    let f = fixture();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), property(&f, f.name)]);
    assert!(path.is_individual_property());
    assert!(!path.is_undeclared());

    let dynamic = DynamicPathSegment::new("Nickname", None, Some(f.people), true).unwrap();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), dynamic.into()]);
    assert!(path.is_individual_property());
    assert!(path.is_undeclared());
}

#[test]
fn test_path_type_and_navigation_source() {
    let f = fixture();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), trips(&f)]);
    assert!(path.is_collection().unwrap());
    assert_eq!(path.navigation_source(), Some(f.trips_set));
    assert!(!ODataPath::default().is_collection().unwrap());
}

#[test]
fn test_path_type_with_ambiguous_operation() {
    let f = fixture();
    let operation =
        OperationSegment::new(&f.model, vec![f.get_age_int, f.get_age_string], None).unwrap();
    let path = ODataPath::new(vec![people(&f), key(&f, 1).into(), operation.into()]);
    assert!(matches!(
        path.edm_type(),
        Err(SemanticError::AmbiguousOverloads(_))
    ));
}

// ============================================================================
// $expand and $select grammar
// ============================================================================

#[test]
fn test_expand_path_single_navigation() {
    let f = fixture();
    let path = ODataExpandPath::new(vec![trips(&f)]).unwrap();
    assert_eq!(
        path.navigation_property_segment().map(NavigationPropertySegment::property),
        Some(f.trips)
    );
}

#[test]
fn test_expand_path_through_cast_and_complex() {
    let f = fixture();
    let path = ODataExpandPath::new(vec![as_manager(&f), property(&f, f.home_address), trips(&f)]);
    assert!(path.is_ok());
}

#[test]
fn test_expand_path_with_two_navigations_rejected() {
    let f = fixture();
    let err = ODataExpandPath::new(vec![trips(&f), trips(&f)]).unwrap_err();
    assert_eq!(
        err,
        SemanticError::InvalidPath {
            kind: PathKind::Expand,
            segment: "NavigationPropertySegment",
            position: 0,
            reason: "a navigation property must be the only and last navigation segment",
        }
    );
}

#[test]
fn test_expand_path_must_end_in_navigation() {
    let f = fixture();
    let err = ODataExpandPath::new(vec![property(&f, f.home_address)]).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::InvalidPath {
            kind: PathKind::Expand,
            position: 0,
            ..
        }
    ));
}

#[test]
fn test_expand_path_rejects_key_and_empty() {
    let f = fixture();
    let err = ODataExpandPath::new(vec![key(&f, 1).into(), trips(&f)]).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::InvalidPath {
            segment: "KeySegment",
            ..
        }
    ));
    assert!(matches!(
        ODataExpandPath::new(vec![]),
        Err(SemanticError::InvalidPath {
            segment: "<none>",
            ..
        })
    ));
}

#[test]
fn test_select_path_grammar() {
    let f = fixture();
    assert!(ODataSelectPath::new(vec![property(&f, f.name)]).is_ok());
    assert!(ODataSelectPath::new(vec![as_manager(&f), property(&f, f.manager_budget)]).is_ok());
    assert!(ODataSelectPath::new(vec![property(&f, f.home_address), property(&f, f.city)]).is_ok());
    assert!(ODataSelectPath::new(vec![trips(&f)]).is_ok());

    let operation = OperationSegment::new(&f.model, vec![f.get_friends], Some(f.people)).unwrap();
    assert!(ODataSelectPath::new(vec![operation.into()]).is_ok());
}

#[test]
fn test_select_path_lone_type_rejected() {
    let f = fixture();
    let err = ODataSelectPath::new(vec![as_manager(&f)]).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::InvalidPath {
            kind: PathKind::Select,
            segment: "TypeSegment",
            position: 0,
            ..
        }
    ));
}

#[test]
fn test_select_path_navigation_not_last_rejected() {
    let f = fixture();
    let err = ODataSelectPath::new(vec![trips(&f), property(&f, f.description)]).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::InvalidPath {
            kind: PathKind::Select,
            position: 0,
            ..
        }
    ));
}

#[test]
fn test_select_path_rejects_count() {
    let f = fixture();
    let err = ODataSelectPath::new(vec![property(&f, f.emails), CountSegment::new().into()]).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::InvalidPath {
            segment: "CountSegment",
            position: 1,
            ..
        }
    ));
}

#[test]
fn test_select_to_expand_conversion() {
    let f = fixture();
    let select = ODataSelectPath::new(vec![property(&f, f.name)]).unwrap();
    assert!(select.to_expand_path().is_err());

    let expand = ODataExpandPath::new(vec![trips(&f)]).unwrap();
    let select = expand.to_select_path().unwrap();
    assert_eq!(ODataPath::from(select), ODataPath::from(expand));
}

// ============================================================================
// Properties
// ============================================================================

fn build(f: &Fixture, picks: &[u8]) -> ODataPath {
    let mut segments = vec![people(f)];
    for (index, pick) in picks.iter().enumerate() {
        segments.push(match pick % 3 {
            0 => key(f, index as i32).into(),
            1 => as_manager(f),
            _ => trips(f),
        });
    }
    ODataPath::new(segments)
}

proptest! {
    #[test]
    fn prop_trimming_is_idempotent(picks in prop::collection::vec(any::<u8>(), 0..8)) {
        let f = fixture();
        let path = build(&f, &picks);

        let once = path.trim_ending_type_segment();
        prop_assert_eq!(once.trim_ending_type_segment(), once.clone());
        prop_assert!(!once.last_segment().is_some_and(PathSegment::is_type));

        let both = path.trim_ending_type_and_key_segments();
        prop_assert_eq!(both.trim_ending_type_and_key_segments(), both.clone());
        prop_assert!(!both.last_segment().is_some_and(|s| s.is_type() || s.is_key()));
        prop_assert!(both.len() <= path.trim_ending_key_segment().len());
    }

    #[test]
    fn prop_expand_paths_are_select_paths(prefix in prop::collection::vec(any::<bool>(), 0..5)) {
        let f = fixture();
        let mut segments: Vec<PathSegment> = prefix
            .iter()
            .map(|cast| if *cast { as_manager(&f) } else { property(&f, f.home_address) })
            .collect();
        segments.push(trips(&f));

        let expand = ODataExpandPath::new(segments).unwrap();
        let select = expand.to_select_path().unwrap();
        let back = select.to_expand_path().unwrap();
        prop_assert_eq!(back, expand);
    }
}
