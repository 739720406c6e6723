mod common;

use std::rc::Rc;

use common::{Fixture, constant, fixture};
use odata_semantic::apply::*;
use odata_semantic::edm::{PrimitiveKind, TypeRef};
use odata_semantic::nodes::*;
use odata_semantic::{ODataValue, SemanticError};

fn people_source(f: &Fixture) -> TransformationSource {
    let collection = CollectionNode::from((*f.people_node()).clone());
    TransformationSource::from(Rc::new(collection))
}

fn aggregated(f: &Fixture, property: odata_semantic::edm::PropertyId) -> Rc<SingleValueNode> {
    Rc::new(SingleValueNode::from(
        AggregatedCollectionPropertyNode::new(&f.model, f.people_node(), property).unwrap(),
    ))
}

fn count_all() -> Rc<SingleValueNode> {
    Rc::new(SingleValueNode::from(CountVirtualPropertyNode::new()))
}

fn adults(f: &Fixture) -> FilterClause {
    let predicate = Rc::new(SingleValueNode::from(BinaryOperatorNode::new(
        BinaryOperatorKind::GreaterThanOrEqual,
        f.property(f.age),
        constant(ODataValue::Int32(18)),
    )));
    FilterClause::new(predicate, f.it()).unwrap()
}

fn totals(f: &Fixture) -> AggregateTransformationNode {
    AggregateTransformationNode::new(
        people_source(f),
        vec![
            AggregateExpression::new(aggregated(f, f.age), AggregationMethod::Sum, "TotalAge", None)
                .unwrap(),
            AggregateExpression::new(count_all(), AggregationMethod::VirtualPropertyCount, "Count", None)
                .unwrap(),
        ],
    )
    .unwrap()
}

// ============================================================================
// Aggregate
// ============================================================================

#[test]
fn test_aggregate_result_types() {
    let f = fixture();
    let node = totals(&f);
    let [total, count] = node.expressions() else {
        panic!("expected two statements");
    };
    assert_eq!(
        total.type_reference(),
        Some(&TypeRef::primitive(PrimitiveKind::Int64, true))
    );
    assert_eq!(count.type_reference(), Some(&TypeRef::int64()));
    assert_eq!(count.method().keyword(), "$count");
}

#[test]
fn test_aggregate_replaces_shape_with_aliases() {
    let f = fixture();
    let node = totals(&f);
    assert_eq!(node.item_shape().base, None);
    assert_eq!(node.item_shape().property_names(), vec!["TotalAge", "Count"]);
}

#[test]
fn test_min_max_keep_input_type() {
    let f = fixture();
    let min = AggregateExpression::new(aggregated(&f, f.name), AggregationMethod::Min, "First", None)
        .unwrap();
    assert_eq!(
        min.type_reference(),
        Some(&TypeRef::primitive(PrimitiveKind::String, true))
    );
}

#[test]
fn test_explicit_aggregate_type_wins() {
    let f = fixture();
    let decimal = TypeRef::primitive(PrimitiveKind::Decimal, true);
    let sum = AggregateExpression::new(
        aggregated(&f, f.age),
        AggregationMethod::Sum,
        "Total",
        Some(decimal.clone()),
    )
    .unwrap();
    assert_eq!(sum.type_reference(), Some(&decimal));
}

#[test]
fn test_sum_of_string_rejected() {
    let f = fixture();
    let err = AggregateExpression::new(aggregated(&f, f.name), AggregationMethod::Sum, "Total", None)
        .unwrap_err();
    assert!(matches!(err, SemanticError::InvalidAggregation(_)));
}

#[test]
fn test_count_of_property_rejected() {
    let f = fixture();
    let err = AggregateExpression::new(
        aggregated(&f, f.age),
        AggregationMethod::VirtualPropertyCount,
        "Count",
        None,
    )
    .unwrap_err();
    assert!(matches!(err, SemanticError::InvalidAggregation(_)));
}

#[test]
fn test_custom_method_has_no_inferred_type() {
    let f = fixture();
    let custom = AggregateExpression::new(
        aggregated(&f, f.age),
        AggregationMethod::Custom("NS.Median".to_string()),
        "Median",
        None,
    )
    .unwrap();
    assert_eq!(custom.type_reference(), None);
    assert_eq!(custom.method().keyword(), "NS.Median");

    let unnamed = AggregateExpression::new(
        aggregated(&f, f.age),
        AggregationMethod::Custom(String::new()),
        "Median",
        None,
    );
    assert!(matches!(unnamed, Err(SemanticError::ArgumentNullOrEmpty(_))));
}

#[test]
fn test_aggregate_from() {
    let f = fixture();
    let statement =
        AggregateExpression::new(aggregated(&f, f.age), AggregationMethod::Average, "Avg", None)
            .unwrap()
            .with_from(f.property(f.name));
    assert!(statement.from().is_some());
    assert_eq!(
        statement.type_reference(),
        Some(&TypeRef::primitive(PrimitiveKind::Double, true))
    );
}

#[test]
fn test_aggregate_requires_statements_and_unique_aliases() {
    let f = fixture();
    assert_eq!(
        AggregateTransformationNode::new(people_source(&f), vec![]).unwrap_err(),
        SemanticError::ArgumentNullOrEmpty("expressions")
    );

    let statement = || {
        AggregateExpression::new(count_all(), AggregationMethod::VirtualPropertyCount, "N", None)
            .unwrap()
    };
    let err = AggregateTransformationNode::new(people_source(&f), vec![statement(), statement()])
        .unwrap_err();
    assert_eq!(err, SemanticError::DuplicateAlias("N".to_string()));
}

// ============================================================================
// GroupBy
// ============================================================================

#[test]
fn test_group_by_with_aggregate_shape() {
    let f = fixture();
    let city = GroupByPropertyNode::parent(
        "HomeAddress",
        Some(TypeRef::complex(f.address, true)),
    )
    .unwrap()
    .with_child(GroupByPropertyNode::new("City", constant(ODataValue::String("x".into()))).unwrap());
    let name = GroupByPropertyNode::new("Name", f.property(f.name)).unwrap();
    let node = GroupByTransformationNode::new(
        people_source(&f),
        vec![name, city],
        Some(totals(&f).into()),
    )
    .unwrap();

    assert_eq!(node.grouping_item_shape().property_names(), vec!["Name", "HomeAddress"]);
    assert_eq!(
        node.item_shape().property_names(),
        vec!["Name", "HomeAddress", "TotalAge", "Count"]
    );
    let address = node.item_shape().property("HomeAddress").unwrap();
    assert_eq!(address.children.len(), 1);
    assert_eq!(address.children[0].name, "City");
    assert_eq!(
        node.child_transformation().map(|c| c.kind()),
        Some(TransformationNodeKind::Aggregate)
    );
}

#[test]
fn test_group_by_without_aggregate() {
    let f = fixture();
    let name = GroupByPropertyNode::new("Name", f.property(f.name)).unwrap();
    let node = GroupByTransformationNode::new(people_source(&f), vec![name], None).unwrap();
    assert_eq!(node.item_shape(), node.grouping_item_shape());
    assert!(node.child_transformation().is_none());
}

#[test]
fn test_group_by_requires_properties() {
    let f = fixture();
    let err = GroupByTransformationNode::new(people_source(&f), vec![], None).unwrap_err();
    assert_eq!(err, SemanticError::ArgumentNullOrEmpty("grouping_properties"));
}

#[test]
fn test_group_by_child_must_be_aggregate() {
    let f = fixture();
    let name = GroupByPropertyNode::new("Name", f.property(f.name)).unwrap();
    let filter = FilterTransformationNode::new(people_source(&f), adults(&f));
    let err = GroupByTransformationNode::new(people_source(&f), vec![name], Some(filter.into()))
        .unwrap_err();
    assert!(matches!(err, SemanticError::InvalidAggregation(_)));
}

#[test]
fn test_group_by_alias_clashing_with_grouping_name() {
    let f = fixture();
    let name = GroupByPropertyNode::new("Name", f.property(f.name)).unwrap();
    let aggregate = AggregateTransformationNode::new(
        people_source(&f),
        vec![
            AggregateExpression::new(count_all(), AggregationMethod::VirtualPropertyCount, "Name", None)
                .unwrap(),
        ],
    )
    .unwrap();
    let err = GroupByTransformationNode::new(people_source(&f), vec![name], Some(aggregate.into()))
        .unwrap_err();
    assert_eq!(err, SemanticError::DuplicateAlias("Name".to_string()));
}

// ============================================================================
// Filter, compute and pipelines
// ============================================================================

#[test]
fn test_filter_keeps_input_shape() {
    let f = fixture();
    let node = FilterTransformationNode::new(people_source(&f), adults(&f));
    assert_eq!(node.item_shape().base, Some(TypeRef::entity(f.person, false)));
    assert!(node.item_shape().dynamic.is_empty());
}

#[test]
fn test_compute_adds_aliases() {
    let f = fixture();
    let doubled = Rc::new(SingleValueNode::from(BinaryOperatorNode::new(
        BinaryOperatorKind::Multiply,
        f.property(f.age),
        constant(ODataValue::Int32(2)),
    )));
    let node = ComputeTransformationNode::new(
        people_source(&f),
        vec![ComputeExpression::new(doubled, "DoubleAge", None).unwrap()],
    )
    .unwrap();
    let shape = node.item_shape();
    assert_eq!(shape.base, Some(TypeRef::entity(f.person, false)));
    assert_eq!(
        shape.property("DoubleAge").and_then(|p| p.type_ref.clone()),
        Some(TypeRef::primitive(PrimitiveKind::Int32, true))
    );
}

#[test]
fn test_compute_rejects_duplicates_and_empty() {
    let f = fixture();
    let expression = || ComputeExpression::new(f.property(f.age), "A", None).unwrap();
    assert!(matches!(
        ComputeTransformationNode::new(people_source(&f), vec![expression(), expression()]),
        Err(SemanticError::DuplicateAlias(_))
    ));
    assert!(matches!(
        ComputeTransformationNode::new(people_source(&f), vec![]),
        Err(SemanticError::ArgumentNullOrEmpty(_))
    ));
}

#[test]
fn test_pipeline_shape_flows_between_stages() {
    let f = fixture();
    let filter = Rc::new(TransformationNode::from(FilterTransformationNode::new(
        people_source(&f),
        adults(&f),
    )));
    let aggregate = Rc::new(TransformationNode::from(
        AggregateTransformationNode::new(
            TransformationSource::from(filter.clone()),
            vec![
                AggregateExpression::new(count_all(), AggregationMethod::VirtualPropertyCount, "N", None)
                    .unwrap(),
            ],
        )
        .unwrap(),
    ));
    let compute = Rc::new(TransformationNode::from(
        ComputeTransformationNode::new(
            TransformationSource::from(aggregate.clone()),
            vec![ComputeExpression::new(constant(ODataValue::Boolean(true)), "Flag", None).unwrap()],
        )
        .unwrap(),
    ));

    let clause = ApplyClause::new(vec![filter, aggregate, compute.clone()]);
    assert_eq!(clause.len(), 3);
    assert_eq!(clause.item_shape().map(ItemShape::property_names), Some(vec!["N", "Flag"]));
    assert_eq!(clause.item_shape().and_then(|s| s.base.clone()), None);

    let root = compute.source().root_collection();
    assert_eq!(root.kind(), QueryNodeKind::EntitySet);
    let kinds: Vec<_> = clause.iter().map(|stage| stage.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TransformationNodeKind::Filter,
            TransformationNodeKind::Aggregate,
            TransformationNodeKind::Compute,
        ]
    );
}

#[test]
fn test_empty_apply_clause() {
    let clause = ApplyClause::default();
    assert!(clause.is_empty());
    assert!(clause.item_shape().is_none());
    assert!(clause.last_stage().is_none());
}
