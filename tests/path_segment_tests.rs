mod common;

use common::fixture;
use odata_semantic::edm::{EdmModel, EdmType, EntitySetExpression, PrimitiveKind, TypeRef};
use odata_semantic::path::*;
use odata_semantic::{ODataValue, SemanticError};

// ============================================================================
// Navigation sources
// ============================================================================

#[test]
fn test_entity_set_segment() {
    let f = fixture();
    let segment = EntitySetSegment::new(&f.model, f.people).unwrap();
    assert_eq!(segment.identifier(), "People");
    assert!(!segment.is_single_result());
    assert_eq!(segment.target_kind(), TargetKind::Resource);
    assert_eq!(segment.target_edm_type(), Some(&EdmType::Entity(f.person)));
    assert_eq!(segment.target_navigation_source(), Some(f.people));
}

#[test]
fn test_entity_set_segment_on_singleton_rejected() {
    let f = fixture();
    assert!(matches!(
        EntitySetSegment::new(&f.model, f.me),
        Err(SemanticError::InvalidSegment(_))
    ));
}

#[test]
fn test_singleton_segment_is_single() {
    let f = fixture();
    let segment = SingletonSegment::new(&f.model, f.me).unwrap();
    assert!(segment.is_single_result());
    assert_eq!(segment.edm_type(), Some(&EdmType::Entity(f.person)));
}

// ============================================================================
// Keys and casts
// ============================================================================

#[test]
fn test_single_key_identifier() {
    let f = fixture();
    let key = KeySegment::new(
        &f.model,
        vec![("Id".to_string(), ODataValue::Int32(1))],
        f.person,
        Some(f.people),
    )
    .unwrap();
    assert_eq!(key.identifier(), "(1)");
    assert!(key.is_single_result());
}

#[test]
fn test_compound_key_identifier() {
    let f = fixture();
    let key = KeySegment::new(
        &f.model,
        vec![
            ("Id".to_string(), ODataValue::Int32(1)),
            ("Name".to_string(), ODataValue::String("O'Neil".to_string())),
        ],
        f.person,
        None,
    )
    .unwrap();
    assert_eq!(key.identifier(), "(Id=1,Name='O''Neil')");
}

#[test]
fn test_key_of_derived_type_accepted() {
    let f = fixture();
    let keys = vec![("Id".to_string(), ODataValue::Int32(7))];
    assert!(KeySegment::new(&f.model, keys, f.manager, Some(f.people)).is_ok());
}

#[test]
fn test_key_of_unrelated_type_rejected() {
    let f = fixture();
    let keys = vec![("TripId".to_string(), ODataValue::Int32(7))];
    let err = KeySegment::new(&f.model, keys, f.trip, Some(f.people)).unwrap_err();
    assert!(matches!(err, SemanticError::UnrelatedTypes { .. }));
}

#[test]
fn test_key_without_values_rejected() {
    let f = fixture();
    assert_eq!(
        KeySegment::new(&f.model, vec![], f.person, None).unwrap_err(),
        SemanticError::ArgumentNullOrEmpty("keys")
    );
}

#[test]
fn test_key_on_complex_type_rejected() {
    let f = fixture();
    let keys = vec![("City".to_string(), ODataValue::String("Oslo".into()))];
    assert!(matches!(
        KeySegment::new(&f.model, keys, f.address, None),
        Err(SemanticError::InvalidSegment(_))
    ));
}

#[test]
fn test_type_segment_identifier_is_qualified_name() {
    let f = fixture();
    let single = TypeSegment::new(&f.model, EdmType::Entity(f.manager), Some(f.people)).unwrap();
    assert_eq!(single.identifier(), "NS.Manager");
    assert!(single.is_single_result());

    let many = EdmType::Collection(Box::new(TypeRef::entity(f.manager, false)));
    let many = TypeSegment::new(&f.model, many, Some(f.people)).unwrap();
    assert_eq!(many.identifier(), "NS.Manager");
    assert!(!many.is_single_result());
    assert_eq!(many.target_edm_type(), Some(&EdmType::Entity(f.manager)));
}

#[test]
fn test_type_segment_unrelated_to_source_rejected() {
    let f = fixture();
    let err = TypeSegment::new(&f.model, EdmType::Entity(f.trip), Some(f.people)).unwrap_err();
    assert!(matches!(err, SemanticError::UnrelatedTypes { .. }));
}

#[test]
fn test_type_segment_with_expected_primitive_type() {
    let f = fixture();
    let int64 = EdmType::Primitive(PrimitiveKind::Int64);
    let string = EdmType::Primitive(PrimitiveKind::String);
    assert!(TypeSegment::with_expected_type(&f.model, int64.clone(), &int64, None).is_ok());
    assert!(matches!(
        TypeSegment::with_expected_type(&f.model, string, &int64, None),
        Err(SemanticError::UnrelatedTypes { .. })
    ));
}

// ============================================================================
// Navigation and properties
// ============================================================================

#[test]
fn test_navigation_segment_to_many() {
    let f = fixture();
    let segment = NavigationPropertySegment::new(&f.model, f.trips, Some(f.trips_set)).unwrap();
    assert_eq!(segment.identifier(), "Trips");
    assert!(!segment.is_single_result());
    assert_eq!(segment.target_edm_type(), Some(&EdmType::Entity(f.trip)));
    assert_eq!(segment.target_navigation_source(), Some(f.trips_set));
}

#[test]
fn test_navigation_link_targets_link() {
    let f = fixture();
    let segment = NavigationPropertyLinkSegment::new(&f.model, f.best_friend, Some(f.people)).unwrap();
    assert_eq!(segment.target_kind(), TargetKind::Link);
    assert!(segment.is_single_result());
}

#[test]
fn test_navigation_segment_on_structural_property_rejected() {
    let f = fixture();
    assert!(matches!(
        NavigationPropertySegment::new(&f.model, f.name, None),
        Err(SemanticError::InvalidPropertyKind { .. })
    ));
}

#[test]
fn test_property_segment_kinds() {
    let f = fixture();
    let name = PropertySegment::new(&f.model, f.name).unwrap();
    assert_eq!(name.target_kind(), TargetKind::Primitive);
    let emails = PropertySegment::new(&f.model, f.emails).unwrap();
    assert_eq!(emails.target_kind(), TargetKind::Collection);
    assert!(!emails.is_single_result());
    let address = PropertySegment::new(&f.model, f.home_address).unwrap();
    assert_eq!(address.target_kind(), TargetKind::Resource);
}

#[test]
fn test_property_segment_on_navigation_rejected() {
    let f = fixture();
    assert!(matches!(
        PropertySegment::new(&f.model, f.trips),
        Err(SemanticError::InvalidPropertyKind { .. })
    ));
}

#[test]
fn test_dynamic_segment_without_type() {
    let segment = DynamicPathSegment::new("Nickname", None, None, true).unwrap();
    assert_eq!(segment.edm_type(), None);
    assert_eq!(segment.target_kind(), TargetKind::Dynamic);
    assert!(DynamicPathSegment::new("", None, None, true).is_err());
}

// ============================================================================
// $count, $value and $each
// ============================================================================

#[test]
fn test_count_segment_is_int32() {
    let segment = CountSegment::new();
    assert_eq!(segment.identifier(), "$count");
    assert_eq!(segment.edm_type(), Some(&EdmType::Primitive(PrimitiveKind::Int32)));
    assert!(segment.is_single_result());
}

#[test]
fn test_value_segment_after_primitive() {
    let previous = EdmType::Primitive(PrimitiveKind::String);
    let segment = ValueSegment::new(Some(&previous)).unwrap();
    assert_eq!(segment.target_kind(), TargetKind::PrimitiveValue);
    assert_eq!(segment.edm_type(), Some(&previous));
}

#[test]
fn test_value_segment_after_entity_is_media_resource() {
    let f = fixture();
    let segment = ValueSegment::new(Some(&EdmType::Entity(f.person))).unwrap();
    assert_eq!(segment.target_kind(), TargetKind::MediaResource);
    assert_eq!(segment.edm_type(), Some(&EdmType::Primitive(PrimitiveKind::Stream)));
}

#[test]
fn test_value_segment_after_unknown_is_dynamic() {
    let segment = ValueSegment::new(None).unwrap();
    assert_eq!(segment.target_kind(), TargetKind::DynamicValue);
}

#[test]
fn test_value_segment_after_collection_rejected() {
    let previous = EdmType::Collection(Box::new(TypeRef::primitive(PrimitiveKind::String, true)));
    assert!(matches!(
        ValueSegment::new(Some(&previous)),
        Err(SemanticError::InvalidSegment(_))
    ));
}

#[test]
fn test_each_requires_collection() {
    let f = fixture();
    assert!(matches!(
        EachSegment::new(EdmType::Entity(f.person), Some(f.people)),
        Err(SemanticError::InvalidSegment(_))
    ));
    let many = EdmType::Collection(Box::new(TypeRef::entity(f.person, false)));
    let each = EachSegment::new(many, Some(f.people)).unwrap();
    assert_eq!(each.identifier(), "$each");
}

// ============================================================================
// Operations
// ============================================================================

#[test]
fn test_operation_segment_return_type() {
    let f = fixture();
    let segment = OperationSegment::new(&f.model, vec![f.get_friends], Some(f.people)).unwrap();
    assert_eq!(segment.identifier(), "NS.GetFriends");
    assert!(!segment.is_single_result());
    assert_eq!(
        segment.edm_type().unwrap(),
        &EdmType::Collection(Box::new(TypeRef::entity(f.person, false)))
    );
}

#[test]
fn test_operation_overloads_disagreeing_on_return_type() {
    let f = fixture();
    let segment =
        OperationSegment::new(&f.model, vec![f.get_age_int, f.get_age_string], None).unwrap();
    assert_eq!(
        segment.edm_type().unwrap_err(),
        SemanticError::AmbiguousOverloads("NS.GetAge".to_string())
    );
    let segment = PathSegment::from(segment);
    assert!(segment.edm_type().is_err());
}

#[test]
fn test_action_without_return_type_is_void() {
    let f = fixture();
    let segment = OperationSegment::new(&f.model, vec![f.reset], None).unwrap();
    assert_eq!(segment.target_kind(), TargetKind::VoidOperation);
}

#[test]
fn test_operation_segment_requires_candidates() {
    let f = fixture();
    assert_eq!(
        OperationSegment::new(&f.model, vec![], None).unwrap_err(),
        SemanticError::ArgumentNullOrEmpty("operations")
    );
}

#[test]
fn test_operation_import_uses_declared_entity_set() {
    let f = fixture();
    let segment = OperationImportSegment::new(&f.model, vec![f.top_people_import], None).unwrap();
    assert_eq!(segment.identifier(), "TopPeople");
    assert_eq!(segment.entity_set(), Some(f.people));
}

#[test]
fn test_operation_import_with_entity_set_path_not_supported() {
    let mut f = fixture();
    let friends = f.model.add_operation_import(
        "Friends",
        f.get_friends,
        Some(EntitySetExpression::Path("person/BestFriend".to_string())),
    );
    let err = OperationImportSegment::new(&f.model, vec![friends], None).unwrap_err();
    assert!(matches!(err, SemanticError::NotSupported(_)));
}

#[test]
fn test_operation_import_entity_set_unrelated_to_return_type() {
    let f = fixture();
    let err =
        OperationImportSegment::new(&f.model, vec![f.top_people_import], Some(f.trips_set)).unwrap_err();
    assert!(matches!(err, SemanticError::UnrelatedTypes { .. }));
}

#[test]
fn test_operation_segment_primitive_result_with_entity_set_rejected() {
    let f = fixture();
    let err = OperationSegment::new(&f.model, vec![f.get_age_int], Some(f.people)).unwrap_err();
    assert_eq!(
        err,
        SemanticError::UnrelatedTypes {
            expected: "NS.Person".to_string(),
            actual: "Edm.Int32".to_string(),
        }
    );
    assert!(OperationSegment::new(&f.model, vec![f.get_age_int], None).is_ok());
}

#[test]
fn test_operation_import_primitive_result_with_entity_set_rejected() {
    let mut f = fixture();
    let age = f.model.add_operation_import(
        "Age",
        f.get_age_int,
        Some(EntitySetExpression::Static(f.people)),
    );
    let err = OperationImportSegment::new(&f.model, vec![age], None).unwrap_err();
    assert!(matches!(err, SemanticError::UnrelatedTypes { .. }));

    let void = OperationImportSegment::new(&f.model, vec![f.reset_import], Some(f.airlines));
    assert!(void.is_ok());
}

#[test]
fn test_operation_import_overloads_with_different_entity_sets() {
    let mut f = fixture();
    let top_people = f.model.operation_import(f.top_people_import).unwrap().operation;
    let vip = f.model.add_entity_set("VipPeople", f.person);
    let top_vip = f.model.add_operation_import(
        "TopPeople",
        top_people,
        Some(EntitySetExpression::Static(vip)),
    );

    let err = OperationImportSegment::new(&f.model, vec![f.top_people_import, top_vip], None)
        .unwrap_err();
    assert_eq!(err, SemanticError::AmbiguousOverloads("TopPeople".to_string()));

    let segment =
        OperationImportSegment::new(&f.model, vec![f.top_people_import, top_vip], Some(vip)).unwrap();
    assert_eq!(segment.entity_set(), Some(vip));
}

// ============================================================================
// Batch and special segments
// ============================================================================

#[test]
fn test_batch_reference_content_ids() {
    let f = fixture();
    let person = EdmType::Entity(f.person);
    for id in ["1", "$1", "abc-1.2_x~"] {
        let segment = BatchReferenceSegment::new(id, person.clone(), Some(f.people)).unwrap();
        assert_eq!(segment.content_id(), id);
        assert!(segment.is_single_result());
    }
    for id in ["1/bad", "a b", "$"] {
        assert!(
            matches!(
                BatchReferenceSegment::new(id, person.clone(), None),
                Err(SemanticError::MalformedContentId(_))
            ),
            "{id} should be rejected"
        );
    }
    assert!(matches!(
        BatchReferenceSegment::new("", person, None),
        Err(SemanticError::ArgumentNullOrEmpty(_))
    ));
}

#[test]
fn test_batch_and_metadata_have_no_type() {
    let batch = PathSegment::from(BatchSegment::new());
    assert_eq!(batch.identifier(), "$batch");
    assert_eq!(batch.edm_type().unwrap(), None);
    assert_eq!(batch.target_kind(), TargetKind::Batch);

    let metadata = PathSegment::from(MetadataSegment::new());
    assert_eq!(metadata.identifier(), "$metadata");
    assert_eq!(metadata.target_kind(), TargetKind::Metadata);
}

#[test]
fn test_path_template_keeps_literal() {
    let segment = PathTemplateSegment::new("{id}").unwrap();
    assert_eq!(segment.literal_text(), "{id}");
    assert_eq!(segment.target_kind(), TargetKind::Nothing);
}
