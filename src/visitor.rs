//! Typed callbacks over the three node lineages.
//!
//! Each lineage has a value-returning trait (`*Visitor` / `*Translator`) and
//! a side-effecting one (`*Handler`), with one required method per concrete
//! variant. Dispatch is an exhaustive `match` in `accept`, `translate_with`
//! and `handle_with`, so adding a variant is a compile error in every
//! consumer until it is handled.
//!
//! Traversal is the consumer's business: a visitor that wants children calls
//! `accept` on them itself.

use crate::nodes::*;
use crate::path::*;
use crate::select_expand::{
    ExpandedCountSelectItem, ExpandedNavigationSelectItem, ExpandedReferenceSelectItem,
    NamespaceQualifiedWildcardSelectItem, PathCountSelectItem, PathSelectItem, SelectItem,
    WildcardSelectItem,
};

// ============================================================================
// Query nodes
// ============================================================================

/// Value-returning visitor over [`QueryNode`] variants.
pub trait QueryNodeVisitor<T> {
    fn visit_constant(&mut self, node: &ConstantNode) -> T;
    fn visit_convert(&mut self, node: &ConvertNode) -> T;
    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> T;
    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> T;
    fn visit_in(&mut self, node: &InNode) -> T;
    fn visit_single_value_property_access(&mut self, node: &SingleValuePropertyAccessNode) -> T;
    fn visit_single_value_open_property_access(&mut self, node: &SingleValueOpenPropertyAccessNode) -> T;
    fn visit_single_value_cast(&mut self, node: &SingleValueCastNode) -> T;
    fn visit_single_value_function_call(&mut self, node: &SingleValueFunctionCallNode) -> T;
    fn visit_count(&mut self, node: &CountNode) -> T;
    fn visit_collection_count(&mut self, node: &CollectionCountNode) -> T;
    fn visit_count_virtual_property(&mut self, node: &CountVirtualPropertyNode) -> T;
    fn visit_non_resource_range_variable_reference(
        &mut self,
        node: &NonResourceRangeVariableReferenceNode,
    ) -> T;
    fn visit_parameter_alias(&mut self, node: &ParameterAliasNode) -> T;
    fn visit_named_function_parameter(&mut self, node: &NamedFunctionParameterNode) -> T;
    fn visit_search_term(&mut self, node: &SearchTermNode) -> T;
    fn visit_any(&mut self, node: &AnyNode) -> T;
    fn visit_all(&mut self, node: &AllNode) -> T;
    fn visit_aggregated_collection_property(&mut self, node: &AggregatedCollectionPropertyNode) -> T;

    fn visit_resource_range_variable_reference(
        &mut self,
        node: &ResourceRangeVariableReferenceNode,
    ) -> T;
    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> T;
    fn visit_single_complex(&mut self, node: &SingleComplexNode) -> T;
    fn visit_single_resource_cast(&mut self, node: &SingleResourceCastNode) -> T;
    fn visit_single_resource_function_call(&mut self, node: &SingleResourceFunctionCallNode) -> T;

    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> T;
    fn visit_collection_open_property_access(&mut self, node: &CollectionOpenPropertyAccessNode) -> T;
    fn visit_collection_constant(&mut self, node: &CollectionConstantNode) -> T;
    fn visit_collection_function_call(&mut self, node: &CollectionFunctionCallNode) -> T;

    fn visit_entity_set(&mut self, node: &EntitySetNode) -> T;
    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> T;
    fn visit_collection_complex(&mut self, node: &CollectionComplexNode) -> T;
    fn visit_collection_resource_cast(&mut self, node: &CollectionResourceCastNode) -> T;
    fn visit_collection_resource_function_call(
        &mut self,
        node: &CollectionResourceFunctionCallNode,
    ) -> T;
}

/// Side-effecting counterpart of [`QueryNodeVisitor`].
pub trait QueryNodeHandler {
    fn handle_constant(&mut self, node: &ConstantNode);
    fn handle_convert(&mut self, node: &ConvertNode);
    fn handle_binary_operator(&mut self, node: &BinaryOperatorNode);
    fn handle_unary_operator(&mut self, node: &UnaryOperatorNode);
    fn handle_in(&mut self, node: &InNode);
    fn handle_single_value_property_access(&mut self, node: &SingleValuePropertyAccessNode);
    fn handle_single_value_open_property_access(&mut self, node: &SingleValueOpenPropertyAccessNode);
    fn handle_single_value_cast(&mut self, node: &SingleValueCastNode);
    fn handle_single_value_function_call(&mut self, node: &SingleValueFunctionCallNode);
    fn handle_count(&mut self, node: &CountNode);
    fn handle_collection_count(&mut self, node: &CollectionCountNode);
    fn handle_count_virtual_property(&mut self, node: &CountVirtualPropertyNode);
    fn handle_non_resource_range_variable_reference(
        &mut self,
        node: &NonResourceRangeVariableReferenceNode,
    );
    fn handle_parameter_alias(&mut self, node: &ParameterAliasNode);
    fn handle_named_function_parameter(&mut self, node: &NamedFunctionParameterNode);
    fn handle_search_term(&mut self, node: &SearchTermNode);
    fn handle_any(&mut self, node: &AnyNode);
    fn handle_all(&mut self, node: &AllNode);
    fn handle_aggregated_collection_property(&mut self, node: &AggregatedCollectionPropertyNode);

    fn handle_resource_range_variable_reference(&mut self, node: &ResourceRangeVariableReferenceNode);
    fn handle_single_navigation(&mut self, node: &SingleNavigationNode);
    fn handle_single_complex(&mut self, node: &SingleComplexNode);
    fn handle_single_resource_cast(&mut self, node: &SingleResourceCastNode);
    fn handle_single_resource_function_call(&mut self, node: &SingleResourceFunctionCallNode);

    fn handle_collection_property_access(&mut self, node: &CollectionPropertyAccessNode);
    fn handle_collection_open_property_access(&mut self, node: &CollectionOpenPropertyAccessNode);
    fn handle_collection_constant(&mut self, node: &CollectionConstantNode);
    fn handle_collection_function_call(&mut self, node: &CollectionFunctionCallNode);

    fn handle_entity_set(&mut self, node: &EntitySetNode);
    fn handle_collection_navigation(&mut self, node: &CollectionNavigationNode);
    fn handle_collection_complex(&mut self, node: &CollectionComplexNode);
    fn handle_collection_resource_cast(&mut self, node: &CollectionResourceCastNode);
    fn handle_collection_resource_function_call(&mut self, node: &CollectionResourceFunctionCallNode);
}

impl QueryNode {
    pub fn accept<T, V: QueryNodeVisitor<T> + ?Sized>(&self, visitor: &mut V) -> T {
        match self {
            QueryNode::Single(node) => node.accept(visitor),
            QueryNode::Collection(node) => node.accept(visitor),
        }
    }

    pub fn handle_with<H: QueryNodeHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            QueryNode::Single(node) => node.handle_with(handler),
            QueryNode::Collection(node) => node.handle_with(handler),
        }
    }
}

impl SingleValueNode {
    pub fn accept<T, V: QueryNodeVisitor<T> + ?Sized>(&self, visitor: &mut V) -> T {
        use SingleValueNode::*;
        match self {
            Constant(n) => visitor.visit_constant(n),
            Convert(n) => visitor.visit_convert(n),
            BinaryOperator(n) => visitor.visit_binary_operator(n),
            UnaryOperator(n) => visitor.visit_unary_operator(n),
            In(n) => visitor.visit_in(n),
            PropertyAccess(n) => visitor.visit_single_value_property_access(n),
            OpenPropertyAccess(n) => visitor.visit_single_value_open_property_access(n),
            Cast(n) => visitor.visit_single_value_cast(n),
            FunctionCall(n) => visitor.visit_single_value_function_call(n),
            Count(n) => visitor.visit_count(n),
            CollectionCount(n) => visitor.visit_collection_count(n),
            CountVirtualProperty(n) => visitor.visit_count_virtual_property(n),
            NonResourceRangeVariableReference(n) => {
                visitor.visit_non_resource_range_variable_reference(n)
            }
            ParameterAlias(n) => visitor.visit_parameter_alias(n),
            NamedFunctionParameter(n) => visitor.visit_named_function_parameter(n),
            SearchTerm(n) => visitor.visit_search_term(n),
            Any(n) => visitor.visit_any(n),
            All(n) => visitor.visit_all(n),
            AggregatedCollectionProperty(n) => visitor.visit_aggregated_collection_property(n),
            Resource(n) => n.accept(visitor),
        }
    }

    pub fn handle_with<H: QueryNodeHandler + ?Sized>(&self, handler: &mut H) {
        use SingleValueNode::*;
        match self {
            Constant(n) => handler.handle_constant(n),
            Convert(n) => handler.handle_convert(n),
            BinaryOperator(n) => handler.handle_binary_operator(n),
            UnaryOperator(n) => handler.handle_unary_operator(n),
            In(n) => handler.handle_in(n),
            PropertyAccess(n) => handler.handle_single_value_property_access(n),
            OpenPropertyAccess(n) => handler.handle_single_value_open_property_access(n),
            Cast(n) => handler.handle_single_value_cast(n),
            FunctionCall(n) => handler.handle_single_value_function_call(n),
            Count(n) => handler.handle_count(n),
            CollectionCount(n) => handler.handle_collection_count(n),
            CountVirtualProperty(n) => handler.handle_count_virtual_property(n),
            NonResourceRangeVariableReference(n) => {
                handler.handle_non_resource_range_variable_reference(n)
            }
            ParameterAlias(n) => handler.handle_parameter_alias(n),
            NamedFunctionParameter(n) => handler.handle_named_function_parameter(n),
            SearchTerm(n) => handler.handle_search_term(n),
            Any(n) => handler.handle_any(n),
            All(n) => handler.handle_all(n),
            AggregatedCollectionProperty(n) => handler.handle_aggregated_collection_property(n),
            Resource(n) => n.handle_with(handler),
        }
    }
}

impl SingleResourceNode {
    pub fn accept<T, V: QueryNodeVisitor<T> + ?Sized>(&self, visitor: &mut V) -> T {
        match self {
            SingleResourceNode::ResourceRangeVariableReference(n) => {
                visitor.visit_resource_range_variable_reference(n)
            }
            SingleResourceNode::SingleNavigation(n) => visitor.visit_single_navigation(n),
            SingleResourceNode::SingleComplex(n) => visitor.visit_single_complex(n),
            SingleResourceNode::SingleResourceCast(n) => visitor.visit_single_resource_cast(n),
            SingleResourceNode::SingleResourceFunctionCall(n) => {
                visitor.visit_single_resource_function_call(n)
            }
        }
    }

    pub fn handle_with<H: QueryNodeHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            SingleResourceNode::ResourceRangeVariableReference(n) => {
                handler.handle_resource_range_variable_reference(n)
            }
            SingleResourceNode::SingleNavigation(n) => handler.handle_single_navigation(n),
            SingleResourceNode::SingleComplex(n) => handler.handle_single_complex(n),
            SingleResourceNode::SingleResourceCast(n) => handler.handle_single_resource_cast(n),
            SingleResourceNode::SingleResourceFunctionCall(n) => {
                handler.handle_single_resource_function_call(n)
            }
        }
    }
}

impl CollectionNode {
    pub fn accept<T, V: QueryNodeVisitor<T> + ?Sized>(&self, visitor: &mut V) -> T {
        match self {
            CollectionNode::PropertyAccess(n) => visitor.visit_collection_property_access(n),
            CollectionNode::OpenPropertyAccess(n) => {
                visitor.visit_collection_open_property_access(n)
            }
            CollectionNode::Constant(n) => visitor.visit_collection_constant(n),
            CollectionNode::FunctionCall(n) => visitor.visit_collection_function_call(n),
            CollectionNode::Resource(n) => n.accept(visitor),
        }
    }

    pub fn handle_with<H: QueryNodeHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            CollectionNode::PropertyAccess(n) => handler.handle_collection_property_access(n),
            CollectionNode::OpenPropertyAccess(n) => {
                handler.handle_collection_open_property_access(n)
            }
            CollectionNode::Constant(n) => handler.handle_collection_constant(n),
            CollectionNode::FunctionCall(n) => handler.handle_collection_function_call(n),
            CollectionNode::Resource(n) => n.handle_with(handler),
        }
    }
}

impl CollectionResourceNode {
    pub fn accept<T, V: QueryNodeVisitor<T> + ?Sized>(&self, visitor: &mut V) -> T {
        match self {
            CollectionResourceNode::EntitySet(n) => visitor.visit_entity_set(n),
            CollectionResourceNode::CollectionNavigation(n) => visitor.visit_collection_navigation(n),
            CollectionResourceNode::CollectionComplex(n) => visitor.visit_collection_complex(n),
            CollectionResourceNode::CollectionResourceCast(n) => {
                visitor.visit_collection_resource_cast(n)
            }
            CollectionResourceNode::CollectionResourceFunctionCall(n) => {
                visitor.visit_collection_resource_function_call(n)
            }
        }
    }

    pub fn handle_with<H: QueryNodeHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            CollectionResourceNode::EntitySet(n) => handler.handle_entity_set(n),
            CollectionResourceNode::CollectionNavigation(n) => handler.handle_collection_navigation(n),
            CollectionResourceNode::CollectionComplex(n) => handler.handle_collection_complex(n),
            CollectionResourceNode::CollectionResourceCast(n) => {
                handler.handle_collection_resource_cast(n)
            }
            CollectionResourceNode::CollectionResourceFunctionCall(n) => {
                handler.handle_collection_resource_function_call(n)
            }
        }
    }
}

// ============================================================================
// Path segments
// ============================================================================

/// Value-returning visitor over [`PathSegment`] variants.
pub trait PathSegmentTranslator<T> {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> T;
    fn translate_singleton(&mut self, segment: &SingletonSegment) -> T;
    fn translate_key(&mut self, segment: &KeySegment) -> T;
    fn translate_navigation_property(&mut self, segment: &NavigationPropertySegment) -> T;
    fn translate_navigation_property_link(&mut self, segment: &NavigationPropertyLinkSegment) -> T;
    fn translate_type(&mut self, segment: &TypeSegment) -> T;
    fn translate_operation(&mut self, segment: &OperationSegment) -> T;
    fn translate_operation_import(&mut self, segment: &OperationImportSegment) -> T;
    fn translate_property(&mut self, segment: &PropertySegment) -> T;
    fn translate_dynamic_path(&mut self, segment: &DynamicPathSegment) -> T;
    fn translate_count(&mut self, segment: &CountSegment) -> T;
    fn translate_value(&mut self, segment: &ValueSegment) -> T;
    fn translate_batch(&mut self, segment: &BatchSegment) -> T;
    fn translate_metadata(&mut self, segment: &MetadataSegment) -> T;
    fn translate_batch_reference(&mut self, segment: &BatchReferenceSegment) -> T;
    fn translate_filter(&mut self, segment: &FilterSegment) -> T;
    fn translate_each(&mut self, segment: &EachSegment) -> T;
    fn translate_path_template(&mut self, segment: &PathTemplateSegment) -> T;
}

/// Side-effecting counterpart of [`PathSegmentTranslator`].
pub trait PathSegmentHandler {
    fn handle_entity_set(&mut self, segment: &EntitySetSegment);
    fn handle_singleton(&mut self, segment: &SingletonSegment);
    fn handle_key(&mut self, segment: &KeySegment);
    fn handle_navigation_property(&mut self, segment: &NavigationPropertySegment);
    fn handle_navigation_property_link(&mut self, segment: &NavigationPropertyLinkSegment);
    fn handle_type(&mut self, segment: &TypeSegment);
    fn handle_operation(&mut self, segment: &OperationSegment);
    fn handle_operation_import(&mut self, segment: &OperationImportSegment);
    fn handle_property(&mut self, segment: &PropertySegment);
    fn handle_dynamic_path(&mut self, segment: &DynamicPathSegment);
    fn handle_count(&mut self, segment: &CountSegment);
    fn handle_value(&mut self, segment: &ValueSegment);
    fn handle_batch(&mut self, segment: &BatchSegment);
    fn handle_metadata(&mut self, segment: &MetadataSegment);
    fn handle_batch_reference(&mut self, segment: &BatchReferenceSegment);
    fn handle_filter(&mut self, segment: &FilterSegment);
    fn handle_each(&mut self, segment: &EachSegment);
    fn handle_path_template(&mut self, segment: &PathTemplateSegment);
}

impl PathSegment {
    pub fn translate_with<T, V: PathSegmentTranslator<T> + ?Sized>(&self, translator: &mut V) -> T {
        use PathSegment::*;
        match self {
            EntitySet(s) => translator.translate_entity_set(s),
            Singleton(s) => translator.translate_singleton(s),
            Key(s) => translator.translate_key(s),
            NavigationProperty(s) => translator.translate_navigation_property(s),
            NavigationPropertyLink(s) => translator.translate_navigation_property_link(s),
            Type(s) => translator.translate_type(s),
            Operation(s) => translator.translate_operation(s),
            OperationImport(s) => translator.translate_operation_import(s),
            Property(s) => translator.translate_property(s),
            DynamicPath(s) => translator.translate_dynamic_path(s),
            Count(s) => translator.translate_count(s),
            Value(s) => translator.translate_value(s),
            Batch(s) => translator.translate_batch(s),
            Metadata(s) => translator.translate_metadata(s),
            BatchReference(s) => translator.translate_batch_reference(s),
            Filter(s) => translator.translate_filter(s),
            Each(s) => translator.translate_each(s),
            PathTemplate(s) => translator.translate_path_template(s),
        }
    }

    pub fn handle_with<H: PathSegmentHandler + ?Sized>(&self, handler: &mut H) {
        use PathSegment::*;
        match self {
            EntitySet(s) => handler.handle_entity_set(s),
            Singleton(s) => handler.handle_singleton(s),
            Key(s) => handler.handle_key(s),
            NavigationProperty(s) => handler.handle_navigation_property(s),
            NavigationPropertyLink(s) => handler.handle_navigation_property_link(s),
            Type(s) => handler.handle_type(s),
            Operation(s) => handler.handle_operation(s),
            OperationImport(s) => handler.handle_operation_import(s),
            Property(s) => handler.handle_property(s),
            DynamicPath(s) => handler.handle_dynamic_path(s),
            Count(s) => handler.handle_count(s),
            Value(s) => handler.handle_value(s),
            Batch(s) => handler.handle_batch(s),
            Metadata(s) => handler.handle_metadata(s),
            BatchReference(s) => handler.handle_batch_reference(s),
            Filter(s) => handler.handle_filter(s),
            Each(s) => handler.handle_each(s),
            PathTemplate(s) => handler.handle_path_template(s),
        }
    }
}

// ============================================================================
// Select items
// ============================================================================

/// Value-returning visitor over [`SelectItem`] variants.
pub trait SelectItemTranslator<T> {
    fn translate_path_select(&mut self, item: &PathSelectItem) -> T;
    fn translate_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) -> T;
    fn translate_expanded_reference(&mut self, item: &ExpandedReferenceSelectItem) -> T;
    fn translate_expanded_count(&mut self, item: &ExpandedCountSelectItem) -> T;
    fn translate_wildcard(&mut self, item: &WildcardSelectItem) -> T;
    fn translate_namespace_qualified_wildcard(&mut self, item: &NamespaceQualifiedWildcardSelectItem) -> T;
    fn translate_path_count(&mut self, item: &PathCountSelectItem) -> T;
}

/// Side-effecting counterpart of [`SelectItemTranslator`].
pub trait SelectItemHandler {
    fn handle_path_select(&mut self, item: &PathSelectItem);
    fn handle_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem);
    fn handle_expanded_reference(&mut self, item: &ExpandedReferenceSelectItem);
    fn handle_expanded_count(&mut self, item: &ExpandedCountSelectItem);
    fn handle_wildcard(&mut self, item: &WildcardSelectItem);
    fn handle_namespace_qualified_wildcard(&mut self, item: &NamespaceQualifiedWildcardSelectItem);
    fn handle_path_count(&mut self, item: &PathCountSelectItem);
}

impl SelectItem {
    pub fn translate_with<T, V: SelectItemTranslator<T> + ?Sized>(&self, translator: &mut V) -> T {
        match self {
            SelectItem::Path(item) => translator.translate_path_select(item),
            SelectItem::ExpandedNavigation(item) => translator.translate_expanded_navigation(item),
            SelectItem::ExpandedReference(item) => translator.translate_expanded_reference(item),
            SelectItem::ExpandedCount(item) => translator.translate_expanded_count(item),
            SelectItem::Wildcard(item) => translator.translate_wildcard(item),
            SelectItem::NamespaceQualifiedWildcard(item) => {
                translator.translate_namespace_qualified_wildcard(item)
            }
            SelectItem::PathCount(item) => translator.translate_path_count(item),
        }
    }

    pub fn handle_with<H: SelectItemHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            SelectItem::Path(item) => handler.handle_path_select(item),
            SelectItem::ExpandedNavigation(item) => handler.handle_expanded_navigation(item),
            SelectItem::ExpandedReference(item) => handler.handle_expanded_reference(item),
            SelectItem::ExpandedCount(item) => handler.handle_expanded_count(item),
            SelectItem::Wildcard(item) => handler.handle_wildcard(item),
            SelectItem::NamespaceQualifiedWildcard(item) => {
                handler.handle_namespace_qualified_wildcard(item)
            }
            SelectItem::PathCount(item) => handler.handle_path_count(item),
        }
    }
}
