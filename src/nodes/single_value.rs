use std::cell::OnceCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::edm::{EdmModel, PrimitiveKind, PropertyId, TypeRef};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::checks::{collection_property, is_assignable, structural_property};
use crate::nodes::operators::{BinaryOperatorKind, UnaryOperatorKind, binary_result_type};
use crate::nodes::{
    AllNode, AnyNode, CollectionNode, CollectionResourceNode, FilterClause, ParameterAliasNode,
    QueryNode, QueryNodeKind, RangeVariable, SearchClause, SingleResourceNode, SingleValueFunctionCallNode,
};
use crate::value::ODataValue;

/// A node that evaluates to a single value.
///
/// Each variant's constructor enforces that variant's type and cardinality
/// rules; nodes are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleValueNode {
    Constant(ConstantNode),
    Convert(ConvertNode),
    BinaryOperator(BinaryOperatorNode),
    UnaryOperator(UnaryOperatorNode),
    In(InNode),
    PropertyAccess(SingleValuePropertyAccessNode),
    OpenPropertyAccess(SingleValueOpenPropertyAccessNode),
    Cast(SingleValueCastNode),
    FunctionCall(SingleValueFunctionCallNode),
    Count(CountNode),
    CollectionCount(CollectionCountNode),
    CountVirtualProperty(CountVirtualPropertyNode),
    NonResourceRangeVariableReference(NonResourceRangeVariableReferenceNode),
    ParameterAlias(ParameterAliasNode),
    NamedFunctionParameter(NamedFunctionParameterNode),
    SearchTerm(SearchTermNode),
    Any(AnyNode),
    All(AllNode),
    AggregatedCollectionProperty(AggregatedCollectionPropertyNode),
    /// Entity or complex value.
    Resource(SingleResourceNode),
}

impl SingleValueNode {
    pub fn kind(&self) -> QueryNodeKind {
        use SingleValueNode::*;
        match self {
            Constant(_) => QueryNodeKind::Constant,
            Convert(_) => QueryNodeKind::Convert,
            BinaryOperator(_) => QueryNodeKind::BinaryOperator,
            UnaryOperator(_) => QueryNodeKind::UnaryOperator,
            In(_) => QueryNodeKind::In,
            PropertyAccess(_) => QueryNodeKind::SingleValuePropertyAccess,
            OpenPropertyAccess(_) => QueryNodeKind::SingleValueOpenPropertyAccess,
            Cast(_) => QueryNodeKind::SingleValueCast,
            FunctionCall(_) => QueryNodeKind::SingleValueFunctionCall,
            Count(_) => QueryNodeKind::Count,
            CollectionCount(_) => QueryNodeKind::CollectionCount,
            CountVirtualProperty(_) => QueryNodeKind::CountVirtualProperty,
            NonResourceRangeVariableReference(_) => {
                QueryNodeKind::NonResourceRangeVariableReference
            }
            ParameterAlias(_) => QueryNodeKind::ParameterAlias,
            NamedFunctionParameter(_) => QueryNodeKind::NamedFunctionParameter,
            SearchTerm(_) => QueryNodeKind::SearchTerm,
            Any(_) => QueryNodeKind::Any,
            All(_) => QueryNodeKind::All,
            AggregatedCollectionProperty(_) => QueryNodeKind::AggregatedCollectionProperty,
            Resource(node) => node.kind(),
        }
    }

    /// Resolved type of the value; `None` when it cannot be known (null
    /// literal, open property, unresolved alias).
    pub fn type_reference(&self) -> Option<&TypeRef> {
        use SingleValueNode::*;
        match self {
            Constant(node) => node.type_reference(),
            Convert(node) => Some(node.type_reference()),
            BinaryOperator(node) => node.type_reference(),
            UnaryOperator(node) => node.type_reference(),
            In(node) => Some(node.type_reference()),
            PropertyAccess(node) => Some(node.type_reference()),
            OpenPropertyAccess(_) => None,
            Cast(node) => Some(node.type_reference()),
            FunctionCall(node) => node.type_reference(),
            Count(node) => Some(node.type_reference()),
            CollectionCount(node) => Some(node.type_reference()),
            CountVirtualProperty(node) => Some(node.type_reference()),
            NonResourceRangeVariableReference(node) => node.type_reference(),
            ParameterAlias(node) => node.type_reference(),
            NamedFunctionParameter(node) => node.type_reference(),
            SearchTerm(node) => Some(node.type_reference()),
            Any(node) => Some(node.type_reference()),
            All(node) => Some(node.type_reference()),
            AggregatedCollectionProperty(node) => Some(node.type_reference()),
            Resource(node) => Some(node.structured_type_ref()),
        }
    }

    pub fn as_resource(&self) -> Option<&SingleResourceNode> {
        match self {
            SingleValueNode::Resource(node) => Some(node),
            _ => None,
        }
    }
}

macro_rules! single_value_from {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for SingleValueNode {
                fn from(node: $node) -> Self {
                    SingleValueNode::$variant(node)
                }
            }
        )*
    };
}

single_value_from! {
    ConstantNode => Constant,
    ConvertNode => Convert,
    BinaryOperatorNode => BinaryOperator,
    UnaryOperatorNode => UnaryOperator,
    InNode => In,
    SingleValuePropertyAccessNode => PropertyAccess,
    SingleValueOpenPropertyAccessNode => OpenPropertyAccess,
    SingleValueCastNode => Cast,
    SingleValueFunctionCallNode => FunctionCall,
    CountNode => Count,
    CollectionCountNode => CollectionCount,
    CountVirtualPropertyNode => CountVirtualProperty,
    NonResourceRangeVariableReferenceNode => NonResourceRangeVariableReference,
    ParameterAliasNode => ParameterAlias,
    NamedFunctionParameterNode => NamedFunctionParameter,
    SearchTermNode => SearchTerm,
    AnyNode => Any,
    AllNode => All,
    AggregatedCollectionPropertyNode => AggregatedCollectionProperty,
    SingleResourceNode => Resource,
}

// ============================================================================
// Literals and conversions
// ============================================================================

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantNode {
    value: ODataValue,
    literal_text: Option<String>,
    type_ref: Option<TypeRef>,
}

impl ConstantNode {
    /// A constant typed after its value; `null` stays untyped.
    pub fn new(value: ODataValue) -> Self {
        let type_ref = value.type_ref();
        ConstantNode {
            value,
            literal_text: None,
            type_ref,
        }
    }

    /// A constant with the literal text it was parsed from and an explicit
    /// type, e.g. a typed `null` after conversion.
    pub fn with_type(value: ODataValue, literal_text: Option<&str>, type_ref: Option<TypeRef>) -> Self {
        ConstantNode {
            value,
            literal_text: literal_text.map(str::to_string),
            type_ref,
        }
    }

    pub fn value(&self) -> &ODataValue {
        &self.value
    }

    pub fn literal_text(&self) -> Option<&str> {
        self.literal_text.as_deref()
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// Implicit conversion of a value to another type, inserted by the binder
/// for type promotion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertNode {
    source: Rc<SingleValueNode>,
    type_ref: TypeRef,
}

impl ConvertNode {
    pub fn new(source: Rc<SingleValueNode>, type_ref: TypeRef) -> Self {
        ConvertNode { source, type_ref }
    }

    pub fn source(&self) -> &Rc<SingleValueNode> {
        &self.source
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// Explicit `cast(value, Edm.Primitive)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValueCastNode {
    source: Rc<SingleValueNode>,
    type_ref: TypeRef,
}

impl SingleValueCastNode {
    pub fn new(source: Rc<SingleValueNode>, type_ref: TypeRef) -> Result<Self> {
        if !type_ref.is_primitive() {
            debug!(target_type = %type_ref.definition, "single value cast to non-primitive type");
            return Err(SemanticError::TypeMismatch {
                expected: "a primitive type".to_string(),
                actual: type_ref.definition.to_string(),
            });
        }
        Ok(SingleValueCastNode { source, type_ref })
    }

    pub fn source(&self) -> &Rc<SingleValueNode> {
        &self.source
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

// ============================================================================
// Operators
// ============================================================================

/// `left op right`.
///
/// The result type is either supplied by the binder or computed from the
/// operands on first read and cached in the node.
#[derive(Debug, Clone)]
pub struct BinaryOperatorNode {
    operator: BinaryOperatorKind,
    left: Rc<SingleValueNode>,
    right: Rc<SingleValueNode>,
    type_ref: OnceCell<Option<TypeRef>>,
}

impl BinaryOperatorNode {
    pub fn new(
        operator: BinaryOperatorKind,
        left: Rc<SingleValueNode>,
        right: Rc<SingleValueNode>,
    ) -> Self {
        BinaryOperatorNode {
            operator,
            left,
            right,
            type_ref: OnceCell::new(),
        }
    }

    pub fn with_type_reference(
        operator: BinaryOperatorKind,
        left: Rc<SingleValueNode>,
        right: Rc<SingleValueNode>,
        type_ref: Option<TypeRef>,
    ) -> Self {
        BinaryOperatorNode {
            operator,
            left,
            right,
            type_ref: OnceCell::from(type_ref),
        }
    }

    pub fn operator(&self) -> BinaryOperatorKind {
        self.operator
    }

    pub fn left(&self) -> &Rc<SingleValueNode> {
        &self.left
    }

    pub fn right(&self) -> &Rc<SingleValueNode> {
        &self.right
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref
            .get_or_init(|| {
                trace!(operator = self.operator.keyword(), "computing binary operator result type");
                binary_result_type(
                    self.operator,
                    self.left.type_reference(),
                    self.right.type_reference(),
                )
            })
            .as_ref()
    }
}

impl PartialEq for BinaryOperatorNode {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator
            && self.left == other.left
            && self.right == other.right
            && self.type_reference() == other.type_reference()
    }
}

/// `-operand` or `not operand`; the result has the operand's type.
#[derive(Debug, Clone)]
pub struct UnaryOperatorNode {
    operator: UnaryOperatorKind,
    operand: Rc<SingleValueNode>,
    type_ref: OnceCell<Option<TypeRef>>,
}

impl UnaryOperatorNode {
    pub fn new(operator: UnaryOperatorKind, operand: Rc<SingleValueNode>) -> Self {
        UnaryOperatorNode {
            operator,
            operand,
            type_ref: OnceCell::new(),
        }
    }

    pub fn operator(&self) -> UnaryOperatorKind {
        self.operator
    }

    pub fn operand(&self) -> &Rc<SingleValueNode> {
        &self.operand
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref
            .get_or_init(|| {
                trace!(operator = self.operator.keyword(), "caching unary operator result type");
                self.operand.type_reference().cloned()
            })
            .as_ref()
    }
}

impl PartialEq for UnaryOperatorNode {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.operand == other.operand
    }
}

/// `left in (collection)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InNode {
    left: Rc<SingleValueNode>,
    right: Rc<CollectionNode>,
    type_ref: TypeRef,
}

impl InNode {
    /// Fails unless the left type and the collection's item type are
    /// assignable in at least one direction. Untyped sides are accepted.
    pub fn new(
        model: &dyn EdmModel,
        left: Rc<SingleValueNode>,
        right: Rc<CollectionNode>,
    ) -> Result<Self> {
        if let (Some(left_type), Some(item_type)) = (left.type_reference(), right.item_type())
            && !is_assignable(Some(model), left_type, item_type)
            && !is_assignable(Some(model), item_type, left_type)
        {
            let expected = model.type_name(&item_type.definition);
            let actual = model.type_name(&left_type.definition);
            debug!(%expected, %actual, "in operator operand types do not match");
            return Err(SemanticError::TypeMismatch { expected, actual });
        }
        Ok(InNode {
            left,
            right,
            type_ref: TypeRef::boolean(),
        })
    }

    pub fn left(&self) -> &Rc<SingleValueNode> {
        &self.left
    }

    pub fn right(&self) -> &Rc<CollectionNode> {
        &self.right
    }

    /// Always `Edm.Boolean`.
    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

// ============================================================================
// Property access
// ============================================================================

/// Access to a primitive or enum property of a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValuePropertyAccessNode {
    source: Rc<SingleValueNode>,
    property: PropertyId,
    type_ref: TypeRef,
}

impl SingleValuePropertyAccessNode {
    pub fn new(model: &dyn EdmModel, source: Rc<SingleValueNode>, property: PropertyId) -> Result<Self> {
        const NODE: &str = "SingleValuePropertyAccessNode";
        let def = structural_property(model, property, NODE)?;
        collection_property(def, false, NODE)?;
        if def.type_ref.is_structured() {
            debug!(property = %def.name, "complex property accessed as a single value");
            return Err(SemanticError::InvalidPropertyKind {
                property: def.name.clone(),
                expected: "primitive or enum property",
            });
        }
        Ok(SingleValuePropertyAccessNode {
            source,
            property,
            type_ref: def.type_ref.clone(),
        })
    }

    pub fn source(&self) -> &Rc<SingleValueNode> {
        &self.source
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// Access to an undeclared property of an open type.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValueOpenPropertyAccessNode {
    source: Rc<SingleValueNode>,
    name: String,
}

impl SingleValueOpenPropertyAccessNode {
    pub fn new(source: Rc<SingleValueNode>, name: &str) -> Result<Self> {
        require_non_empty(name, "name")?;
        Ok(SingleValueOpenPropertyAccessNode {
            source,
            name: name.to_string(),
        })
    }

    pub fn source(&self) -> &Rc<SingleValueNode> {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A structural property of the items of a resource collection, used as the
/// input of an aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCollectionPropertyNode {
    source: Rc<CollectionResourceNode>,
    property: PropertyId,
    type_ref: TypeRef,
}

impl AggregatedCollectionPropertyNode {
    pub fn new(
        model: &dyn EdmModel,
        source: Rc<CollectionResourceNode>,
        property: PropertyId,
    ) -> Result<Self> {
        let def = structural_property(model, property, "AggregatedCollectionPropertyNode")?;
        Ok(AggregatedCollectionPropertyNode {
            source,
            property,
            type_ref: def.type_ref.clone(),
        })
    }

    pub fn source(&self) -> &Rc<CollectionResourceNode> {
        &self.source
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

// ============================================================================
// Counts
// ============================================================================

/// `Collection/$count`, optionally with nested `$filter` and `$search`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountNode {
    source: Rc<CollectionResourceNode>,
    filter: Option<FilterClause>,
    search: Option<SearchClause>,
    type_ref: TypeRef,
}

impl CountNode {
    pub fn new(
        source: Rc<CollectionResourceNode>,
        filter: Option<FilterClause>,
        search: Option<SearchClause>,
    ) -> Self {
        CountNode {
            source,
            filter,
            search,
            type_ref: TypeRef::int64(),
        }
    }

    pub fn source(&self) -> &Rc<CollectionResourceNode> {
        &self.source
    }

    pub fn filter(&self) -> Option<&FilterClause> {
        self.filter.as_ref()
    }

    pub fn search(&self) -> Option<&SearchClause> {
        self.search.as_ref()
    }

    /// Always non-nullable `Edm.Int64`.
    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// `$count` of a collection of primitive, enum or complex values.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionCountNode {
    source: Rc<CollectionNode>,
    type_ref: TypeRef,
}

impl CollectionCountNode {
    pub fn new(source: Rc<CollectionNode>) -> Self {
        CollectionCountNode {
            source,
            type_ref: TypeRef::int64(),
        }
    }

    pub fn source(&self) -> &Rc<CollectionNode> {
        &self.source
    }

    /// Always non-nullable `Edm.Int64`.
    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// The `$count` virtual property inside `$apply` aggregations.
#[derive(Debug, Clone, PartialEq)]
pub struct CountVirtualPropertyNode {
    type_ref: TypeRef,
}

impl Default for CountVirtualPropertyNode {
    fn default() -> Self {
        CountVirtualPropertyNode {
            type_ref: TypeRef::int64(),
        }
    }
}

impl CountVirtualPropertyNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

// ============================================================================
// References and search
// ============================================================================

/// Reference to a range variable over non-resource values.
#[derive(Debug, Clone, PartialEq)]
pub struct NonResourceRangeVariableReferenceNode {
    range_variable: Rc<RangeVariable>,
}

impl NonResourceRangeVariableReferenceNode {
    pub fn new(range_variable: Rc<RangeVariable>) -> Result<Self> {
        if range_variable.is_resource() {
            return Err(SemanticError::TypeMismatch {
                expected: "non-resource range variable".to_string(),
                actual: format!("resource range variable `{}`", range_variable.name()),
            });
        }
        Ok(NonResourceRangeVariableReferenceNode { range_variable })
    }

    pub fn name(&self) -> &str {
        self.range_variable.name()
    }

    pub fn range_variable(&self) -> &Rc<RangeVariable> {
        &self.range_variable
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.range_variable.type_reference()
    }
}

/// A function argument passed by name, e.g. `distance(to=@p)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFunctionParameterNode {
    name: String,
    value: Rc<QueryNode>,
}

impl NamedFunctionParameterNode {
    pub fn new(name: &str, value: Rc<QueryNode>) -> Result<Self> {
        require_non_empty(name, "name")?;
        Ok(NamedFunctionParameterNode {
            name: name.to_string(),
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Rc<QueryNode> {
        &self.value
    }

    /// Type of the bound argument value.
    pub fn type_reference(&self) -> Option<&TypeRef> {
        match self.value.as_ref() {
            QueryNode::Single(node) => node.type_reference(),
            QueryNode::Collection(node) => Some(node.collection_type()),
        }
    }
}

/// A `$search` term.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTermNode {
    text: String,
    type_ref: TypeRef,
}

impl SearchTermNode {
    pub fn new(text: &str) -> Result<Self> {
        require_non_empty(text, "text")?;
        Ok(SearchTermNode {
            text: text.to_string(),
            type_ref: TypeRef::primitive(PrimitiveKind::Boolean, false),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}
