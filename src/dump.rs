//! JSON rendering of bound trees.
//!
//! [`TreeDumper`] walks query nodes, paths, select items and `$apply`
//! stages and renders each as a JSON object with a `kind`, a `type` where
//! one exists, and the node's own fields. Metadata handles are rendered by
//! name through the model. Output is deterministic: object keys are sorted.
//!
//! # Examples
//!
//! ```
//! use odata_semantic::ODataValue;
//! use odata_semantic::dump::{to_json, to_json_pretty};
//! use odata_semantic::edm::InMemoryModel;
//! use odata_semantic::nodes::{ConstantNode, QueryNode, SingleValueNode};
//!
//! let model = InMemoryModel::new();
//! let node = QueryNode::from(SingleValueNode::from(ConstantNode::new(ODataValue::Int32(42))));
//!
//! let json = to_json(&model, &node);
//! assert_eq!(json["kind"], "ConstantNode");
//! assert_eq!(json["type"], "Edm.Int32");
//! assert_eq!(json["value"], 42);
//!
//! assert!(to_json_pretty(&model, &node).contains('\n'));
//! ```

use std::rc::Rc;

use serde_json::{Map, Value, json};

use crate::apply::{ApplyClause, GroupByPropertyNode, ItemShape, TransformationNode};
use crate::edm::{EdmModel, NavigationSourceId, PropertyId, TypeRef};
use crate::nodes::*;
use crate::path::*;
use crate::select_expand::{
    ExpandedCountSelectItem, ExpandedNavigationSelectItem, ExpandedReferenceSelectItem,
    NamespaceQualifiedWildcardSelectItem, PathCountSelectItem, PathSelectItem, SelectExpandClause,
    SelectExpandOptions, SelectItem, WildcardSelectItem,
};
use crate::visitor::{PathSegmentTranslator, QueryNodeVisitor, SelectItemTranslator};

/// Renders `node` as a JSON value.
pub fn to_json(model: &dyn EdmModel, node: &QueryNode) -> Value {
    TreeDumper::new(model).dump_node(node)
}

/// Renders `node` as indented JSON text.
pub fn to_json_pretty(model: &dyn EdmModel, node: &QueryNode) -> String {
    format!("{:#}", to_json(model, node))
}

pub struct TreeDumper<'m> {
    model: &'m dyn EdmModel,
}

impl<'m> TreeDumper<'m> {
    pub fn new(model: &'m dyn EdmModel) -> Self {
        TreeDumper { model }
    }

    pub fn dump_node(&mut self, node: &QueryNode) -> Value {
        let fields = node.accept(self);
        self.wrap(node.kind().name(), node.type_reference(), fields)
    }

    pub fn dump_single(&mut self, node: &SingleValueNode) -> Value {
        let fields = node.accept(self);
        self.wrap(node.kind().name(), node.type_reference(), fields)
    }

    pub fn dump_single_resource(&mut self, node: &SingleResourceNode) -> Value {
        let fields = node.accept(self);
        self.wrap(node.kind().name(), Some(node.structured_type_ref()), fields)
    }

    pub fn dump_collection(&mut self, node: &CollectionNode) -> Value {
        let fields = node.accept(self);
        self.wrap(node.kind().name(), Some(node.collection_type()), fields)
    }

    pub fn dump_collection_resource(&mut self, node: &CollectionResourceNode) -> Value {
        let fields = node.accept(self);
        self.wrap(node.kind().name(), Some(node.collection_type()), fields)
    }

    /// One object per segment, in path order.
    pub fn dump_path(&mut self, path: &ODataPath) -> Value {
        Value::Array(path.iter().map(|segment| self.dump_segment(segment)).collect())
    }

    pub fn dump_segment(&mut self, segment: &PathSegment) -> Value {
        let fields = segment.translate_with(self);
        let mut object = Map::new();
        object.insert("kind".into(), json!(segment.kind_name()));
        object.insert("identifier".into(), json!(segment.identifier()));
        object.insert(
            "type".into(),
            segment
                .target_edm_type()
                .map_or(Value::Null, |t| json!(self.model.type_name(t))),
        );
        object.insert("single".into(), json!(segment.is_single_result()));
        merge(&mut object, fields);
        Value::Object(object)
    }

    pub fn dump_select_expand(&mut self, clause: &SelectExpandClause) -> Value {
        let items: Vec<Value> = clause
            .iter()
            .map(|item| self.dump_select_item(item))
            .collect();
        json!({
            "all_selected": clause.all_selected(),
            "items": items,
        })
    }

    pub fn dump_select_item(&mut self, item: &SelectItem) -> Value {
        let fields = item.translate_with(self);
        let mut object = Map::new();
        object.insert("kind".into(), json!(format!("{:?}", item.kind())));
        merge(&mut object, fields);
        Value::Object(object)
    }

    pub fn dump_apply(&mut self, apply: &ApplyClause) -> Value {
        Value::Array(
            apply
                .iter()
                .map(|stage| self.dump_transformation(stage))
                .collect(),
        )
    }

    pub fn dump_transformation(&mut self, stage: &TransformationNode) -> Value {
        let mut object = Map::new();
        object.insert("kind".into(), json!(format!("{:?}", stage.kind())));
        let fields = match stage {
            TransformationNode::Filter(node) => json!({ "filter": self.dump_filter(node.filter()) }),
            TransformationNode::GroupBy(node) => {
                let grouping: Vec<Value> = node
                    .grouping_properties()
                    .iter()
                    .map(|p| self.dump_grouping_property(p))
                    .collect();
                let child = node
                    .child_transformation()
                    .map(|child| self.dump_transformation(child));
                json!({ "grouping": grouping, "aggregate": child })
            }
            TransformationNode::Aggregate(node) => {
                let expressions: Vec<Value> = node
                    .expressions()
                    .iter()
                    .map(|e| {
                        json!({
                            "alias": e.alias(),
                            "method": e.method().keyword(),
                            "type": self.type_name(e.type_reference()),
                            "expression": self.dump_single(e.expression()),
                            "from": e.from().map(|f| self.dump_single(f)),
                        })
                    })
                    .collect();
                json!({ "expressions": expressions })
            }
            TransformationNode::Compute(node) => {
                json!({ "expressions": self.dump_compute_expressions(node.expressions()) })
            }
        };
        merge(&mut object, fields);
        object.insert("shape".into(), self.dump_shape(stage.item_shape()));
        Value::Object(object)
    }

    pub fn dump_filter(&mut self, filter: &FilterClause) -> Value {
        json!({
            "range_variable": filter.range_variable().name(),
            "expression": self.dump_single(filter.expression()),
        })
    }

    pub fn dump_order_by(&mut self, order_by: &OrderByClause) -> Value {
        Value::Array(
            order_by
                .iter()
                .map(|clause| {
                    json!({
                        "direction": clause.direction().keyword(),
                        "expression": self.dump_single(clause.expression()),
                    })
                })
                .collect(),
        )
    }

    fn dump_compute_expressions(&mut self, expressions: &[ComputeExpression]) -> Vec<Value> {
        expressions
            .iter()
            .map(|e| {
                json!({
                    "alias": e.alias(),
                    "type": self.type_name(e.type_reference()),
                    "expression": self.dump_single(e.expression()),
                })
            })
            .collect()
    }

    fn dump_grouping_property(&mut self, property: &GroupByPropertyNode) -> Value {
        let children: Vec<Value> = property
            .children()
            .iter()
            .map(|c| self.dump_grouping_property(c))
            .collect();
        json!({
            "name": property.name(),
            "type": self.type_name(property.type_reference()),
            "expression": property.expression().map(|e| self.dump_single(e)),
            "children": children,
        })
    }

    fn dump_shape(&self, shape: &ItemShape) -> Value {
        json!({
            "base": self.type_name(shape.base.as_ref()),
            "dynamic": shape.property_names(),
        })
    }

    fn dump_options(&mut self, options: &SelectExpandOptions) -> Value {
        let mut object = Map::new();
        if let Some(filter) = &options.filter {
            object.insert("filter".into(), self.dump_filter(filter));
        }
        if let Some(order_by) = &options.order_by {
            object.insert("orderby".into(), self.dump_order_by(order_by));
        }
        if let Some(top) = options.top {
            object.insert("top".into(), json!(top));
        }
        if let Some(skip) = options.skip {
            object.insert("skip".into(), json!(skip));
        }
        if let Some(count) = options.count {
            object.insert("count".into(), json!(count));
        }
        if let Some(search) = &options.search {
            object.insert("search".into(), self.dump_single(search.expression()));
        }
        if let Some(compute) = &options.compute {
            object.insert(
                "compute".into(),
                json!(self.dump_compute_expressions(compute.expressions())),
            );
        }
        Value::Object(object)
    }

    fn wrap(&self, kind: &str, type_ref: Option<&TypeRef>, fields: Value) -> Value {
        let mut object = Map::new();
        object.insert("kind".into(), json!(kind));
        object.insert("type".into(), self.type_name(type_ref));
        merge(&mut object, fields);
        Value::Object(object)
    }

    fn type_name(&self, type_ref: Option<&TypeRef>) -> Value {
        type_ref.map_or(Value::Null, |t| json!(self.model.type_name(&t.definition)))
    }

    fn property_name(&self, property: PropertyId) -> Value {
        match self.model.property(property) {
            Some(def) => json!(def.name),
            None => json!(format!("#{}", property.0)),
        }
    }

    fn source_name(&self, source: Option<NavigationSourceId>) -> Value {
        match source {
            Some(id) => match self.model.navigation_source(id) {
                Some(def) => json!(def.name),
                None => json!(format!("#{}", id.0)),
            },
            None => Value::Null,
        }
    }

    fn call(&mut self, name: &str, parameters: &[QueryNode], source: Option<&Rc<QueryNode>>) -> Value {
        let parameters: Vec<Value> = parameters.iter().map(|p| self.dump_node(p)).collect();
        json!({
            "name": name,
            "parameters": parameters,
            "source": source.map(|s| self.dump_node(s)),
        })
    }

    fn lambda(
        &mut self,
        range_variables: &[Rc<RangeVariable>],
        current: Option<&Rc<RangeVariable>>,
        body: &SingleValueNode,
        source: &CollectionNode,
    ) -> Value {
        let names: Vec<&str> = range_variables.iter().map(|rv| rv.name()).collect();
        json!({
            "range_variables": names,
            "current": current.map(|rv| rv.name()),
            "body": self.dump_single(body),
            "source": self.dump_collection(source),
        })
    }

    fn select_path(path: &ODataSelectPath) -> Value {
        json!(path.iter().map(PathSegment::identifier).collect::<Vec<_>>())
    }

    fn expand_path(path: &ODataExpandPath) -> Value {
        json!(path.iter().map(PathSegment::identifier).collect::<Vec<_>>())
    }

    fn operation_parameters(&mut self, parameters: &[OperationSegmentParameter]) -> Value {
        let mut object = Map::new();
        for parameter in parameters {
            object.insert(parameter.name().to_string(), self.dump_node(parameter.value()));
        }
        json!({ "parameters": object })
    }
}

fn merge(object: &mut Map<String, Value>, fields: Value) {
    if let Value::Object(fields) = fields {
        object.extend(fields);
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}

impl QueryNodeVisitor<Value> for TreeDumper<'_> {
    fn visit_constant(&mut self, node: &ConstantNode) -> Value {
        json!({ "value": node.value().to_json(), "literal": node.literal_text() })
    }

    fn visit_convert(&mut self, node: &ConvertNode) -> Value {
        json!({ "source": self.dump_single(node.source()) })
    }

    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> Value {
        json!({
            "operator": node.operator().keyword(),
            "left": self.dump_single(node.left()),
            "right": self.dump_single(node.right()),
        })
    }

    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> Value {
        json!({
            "operator": node.operator().keyword(),
            "operand": self.dump_single(node.operand()),
        })
    }

    fn visit_in(&mut self, node: &InNode) -> Value {
        json!({
            "left": self.dump_single(node.left()),
            "right": self.dump_collection(node.right()),
        })
    }

    fn visit_single_value_property_access(&mut self, node: &SingleValuePropertyAccessNode) -> Value {
        json!({
            "property": self.property_name(node.property()),
            "source": self.dump_single(node.source()),
        })
    }

    fn visit_single_value_open_property_access(&mut self, node: &SingleValueOpenPropertyAccessNode) -> Value {
        json!({ "name": node.name(), "source": self.dump_single(node.source()) })
    }

    fn visit_single_value_cast(&mut self, node: &SingleValueCastNode) -> Value {
        json!({ "source": self.dump_single(node.source()) })
    }

    fn visit_single_value_function_call(&mut self, node: &SingleValueFunctionCallNode) -> Value {
        self.call(node.name(), node.parameters(), node.source())
    }

    fn visit_count(&mut self, node: &CountNode) -> Value {
        json!({
            "source": self.dump_collection_resource(node.source()),
            "filter": node.filter().map(|f| self.dump_filter(f)),
            "search": node.search().map(|s| self.dump_single(s.expression())),
        })
    }

    fn visit_collection_count(&mut self, node: &CollectionCountNode) -> Value {
        json!({ "source": self.dump_collection(node.source()) })
    }

    fn visit_count_virtual_property(&mut self, _node: &CountVirtualPropertyNode) -> Value {
        empty()
    }

    fn visit_non_resource_range_variable_reference(
        &mut self,
        node: &NonResourceRangeVariableReferenceNode,
    ) -> Value {
        json!({ "range_variable": node.name() })
    }

    fn visit_parameter_alias(&mut self, node: &ParameterAliasNode) -> Value {
        json!({ "alias": node.alias() })
    }

    fn visit_named_function_parameter(&mut self, node: &NamedFunctionParameterNode) -> Value {
        json!({ "name": node.name(), "value": self.dump_node(node.value()) })
    }

    fn visit_search_term(&mut self, node: &SearchTermNode) -> Value {
        json!({ "text": node.text() })
    }

    fn visit_any(&mut self, node: &AnyNode) -> Value {
        self.lambda(
            node.range_variables(),
            node.current_range_variable(),
            node.body(),
            node.source(),
        )
    }

    fn visit_all(&mut self, node: &AllNode) -> Value {
        self.lambda(
            node.range_variables(),
            node.current_range_variable(),
            node.body(),
            node.source(),
        )
    }

    fn visit_aggregated_collection_property(&mut self, node: &AggregatedCollectionPropertyNode) -> Value {
        json!({
            "property": self.property_name(node.property()),
            "source": self.dump_collection_resource(node.source()),
        })
    }

    fn visit_resource_range_variable_reference(
        &mut self,
        node: &ResourceRangeVariableReferenceNode,
    ) -> Value {
        json!({
            "range_variable": node.name(),
            "navigation_source": self.source_name(node.navigation_source()),
        })
    }

    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> Value {
        json!({
            "property": self.property_name(node.property()),
            "multiplicity": node.target_multiplicity().to_string(),
            "binding_path": node.binding_path().map(|b| b.as_str()),
            "navigation_source": self.source_name(node.navigation_source()),
            "source": self.dump_single_resource(node.source()),
        })
    }

    fn visit_single_complex(&mut self, node: &SingleComplexNode) -> Value {
        json!({
            "property": self.property_name(node.property()),
            "source": self.dump_single_resource(node.source()),
        })
    }

    fn visit_single_resource_cast(&mut self, node: &SingleResourceCastNode) -> Value {
        json!({
            "navigation_source": self.source_name(node.navigation_source()),
            "source": node.source().map(|s| self.dump_single_resource(s)),
        })
    }

    fn visit_single_resource_function_call(&mut self, node: &SingleResourceFunctionCallNode) -> Value {
        self.call(node.name(), node.parameters(), node.source())
    }

    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> Value {
        json!({
            "property": self.property_name(node.property()),
            "source": self.dump_single(node.source()),
        })
    }

    fn visit_collection_open_property_access(&mut self, node: &CollectionOpenPropertyAccessNode) -> Value {
        json!({ "name": node.name(), "source": self.dump_single(node.source()) })
    }

    fn visit_collection_constant(&mut self, node: &CollectionConstantNode) -> Value {
        let items: Vec<Value> = node.items().iter().map(|c| c.value().to_json()).collect();
        json!({ "items": items, "literal": node.literal_text() })
    }

    fn visit_collection_function_call(&mut self, node: &CollectionFunctionCallNode) -> Value {
        self.call(node.name(), node.parameters(), node.source())
    }

    fn visit_entity_set(&mut self, node: &EntitySetNode) -> Value {
        json!({ "navigation_source": self.source_name(Some(node.navigation_source())) })
    }

    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> Value {
        json!({
            "property": self.property_name(node.property()),
            "binding_path": node.binding_path().map(|b| b.as_str()),
            "navigation_source": self.source_name(node.navigation_source()),
            "source": self.dump_single_resource(node.source()),
        })
    }

    fn visit_collection_complex(&mut self, node: &CollectionComplexNode) -> Value {
        json!({
            "property": self.property_name(node.property()),
            "source": self.dump_single_resource(node.source()),
        })
    }

    fn visit_collection_resource_cast(&mut self, node: &CollectionResourceCastNode) -> Value {
        json!({
            "navigation_source": self.source_name(node.navigation_source()),
            "source": self.dump_collection_resource(node.source()),
        })
    }

    fn visit_collection_resource_function_call(
        &mut self,
        node: &CollectionResourceFunctionCallNode,
    ) -> Value {
        self.call(node.name(), node.parameters(), node.source())
    }
}

impl PathSegmentTranslator<Value> for TreeDumper<'_> {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> Value {
        json!({ "navigation_source": self.source_name(Some(segment.entity_set())) })
    }

    fn translate_singleton(&mut self, segment: &SingletonSegment) -> Value {
        json!({ "navigation_source": self.source_name(Some(segment.singleton())) })
    }

    fn translate_key(&mut self, segment: &KeySegment) -> Value {
        let keys: Map<String, Value> = segment
            .keys()
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        json!({ "keys": keys })
    }

    fn translate_navigation_property(&mut self, segment: &NavigationPropertySegment) -> Value {
        json!({ "navigation_source": self.source_name(segment.target_navigation_source()) })
    }

    fn translate_navigation_property_link(&mut self, segment: &NavigationPropertyLinkSegment) -> Value {
        json!({ "navigation_source": self.source_name(segment.target_navigation_source()) })
    }

    fn translate_type(&mut self, _segment: &TypeSegment) -> Value {
        empty()
    }

    fn translate_operation(&mut self, segment: &OperationSegment) -> Value {
        self.operation_parameters(segment.parameters())
    }

    fn translate_operation_import(&mut self, segment: &OperationImportSegment) -> Value {
        self.operation_parameters(segment.parameters())
    }

    fn translate_property(&mut self, segment: &PropertySegment) -> Value {
        json!({ "property": self.property_name(segment.property()) })
    }

    fn translate_dynamic_path(&mut self, _segment: &DynamicPathSegment) -> Value {
        empty()
    }

    fn translate_count(&mut self, _segment: &CountSegment) -> Value {
        empty()
    }

    fn translate_value(&mut self, _segment: &ValueSegment) -> Value {
        empty()
    }

    fn translate_batch(&mut self, _segment: &BatchSegment) -> Value {
        empty()
    }

    fn translate_metadata(&mut self, _segment: &MetadataSegment) -> Value {
        empty()
    }

    fn translate_batch_reference(&mut self, segment: &BatchReferenceSegment) -> Value {
        json!({ "content_id": segment.content_id() })
    }

    fn translate_filter(&mut self, segment: &FilterSegment) -> Value {
        json!({
            "range_variable": segment.range_variable().name(),
            "expression": self.dump_single(segment.expression()),
        })
    }

    fn translate_each(&mut self, _segment: &EachSegment) -> Value {
        empty()
    }

    fn translate_path_template(&mut self, segment: &PathTemplateSegment) -> Value {
        json!({ "literal": segment.literal_text() })
    }
}

impl SelectItemTranslator<Value> for TreeDumper<'_> {
    fn translate_path_select(&mut self, item: &PathSelectItem) -> Value {
        json!({
            "path": Self::select_path(item.selected_path()),
            "navigation_source": self.source_name(item.navigation_source()),
            "options": self.dump_options(item.options()),
            "select_expand": item.select_and_expand().map(|c| self.dump_select_expand(c)),
        })
    }

    fn translate_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) -> Value {
        json!({
            "path": Self::expand_path(item.path_to_navigation_property()),
            "navigation_source": self.source_name(item.navigation_source()),
            "options": self.dump_options(item.options()),
            "levels": item.levels().map(|l| json!({ "max": l.is_max_level, "level": l.level })),
            "apply": item.apply().map(|a| self.dump_apply(a)),
            "select_expand": self.dump_select_expand(item.select_and_expand()),
        })
    }

    fn translate_expanded_reference(&mut self, item: &ExpandedReferenceSelectItem) -> Value {
        json!({
            "path": Self::expand_path(item.path_to_navigation_property()),
            "navigation_source": self.source_name(item.navigation_source()),
            "options": self.dump_options(item.options()),
        })
    }

    fn translate_expanded_count(&mut self, item: &ExpandedCountSelectItem) -> Value {
        json!({
            "path": Self::expand_path(item.path_to_navigation_property()),
            "navigation_source": self.source_name(item.navigation_source()),
            "options": self.dump_options(item.options()),
        })
    }

    fn translate_wildcard(&mut self, item: &WildcardSelectItem) -> Value {
        let subsumed: Vec<Value> = item
            .subsumed_items()
            .iter()
            .map(|p| Self::select_path(p.selected_path()))
            .collect();
        json!({ "subsumed": subsumed })
    }

    fn translate_namespace_qualified_wildcard(&mut self, item: &NamespaceQualifiedWildcardSelectItem) -> Value {
        json!({ "namespace": item.namespace() })
    }

    fn translate_path_count(&mut self, item: &PathCountSelectItem) -> Value {
        json!({
            "path": Self::select_path(item.selected_path()),
            "filter": item.filter().map(|f| self.dump_filter(f)),
            "search": item.search().map(|s| self.dump_single(s.expression())),
        })
    }
}
