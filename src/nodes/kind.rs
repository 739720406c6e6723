/// Discriminant of every concrete query node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryNodeKind {
    // Single values
    Constant,
    Convert,
    BinaryOperator,
    UnaryOperator,
    In,
    SingleValuePropertyAccess,
    SingleValueOpenPropertyAccess,
    SingleValueCast,
    SingleValueFunctionCall,
    Count,
    CollectionCount,
    CountVirtualProperty,
    NonResourceRangeVariableReference,
    ParameterAlias,
    NamedFunctionParameter,
    SearchTerm,
    Any,
    All,
    AggregatedCollectionProperty,

    // Single resources
    ResourceRangeVariableReference,
    SingleNavigation,
    SingleComplex,
    SingleResourceCast,
    SingleResourceFunctionCall,

    // Collections
    CollectionPropertyAccess,
    CollectionOpenPropertyAccess,
    CollectionConstant,
    CollectionFunctionCall,

    // Resource collections
    EntitySet,
    CollectionNavigation,
    CollectionComplex,
    CollectionResourceCast,
    CollectionResourceFunctionCall,
}

impl QueryNodeKind {
    /// Name of the node type, e.g. `InNode`.
    pub fn name(&self) -> &'static str {
        use QueryNodeKind::*;
        match self {
            Constant => "ConstantNode",
            Convert => "ConvertNode",
            BinaryOperator => "BinaryOperatorNode",
            UnaryOperator => "UnaryOperatorNode",
            In => "InNode",
            SingleValuePropertyAccess => "SingleValuePropertyAccessNode",
            SingleValueOpenPropertyAccess => "SingleValueOpenPropertyAccessNode",
            SingleValueCast => "SingleValueCastNode",
            SingleValueFunctionCall => "SingleValueFunctionCallNode",
            Count => "CountNode",
            CollectionCount => "CollectionCountNode",
            CountVirtualProperty => "CountVirtualPropertyNode",
            NonResourceRangeVariableReference => "NonResourceRangeVariableReferenceNode",
            ParameterAlias => "ParameterAliasNode",
            NamedFunctionParameter => "NamedFunctionParameterNode",
            SearchTerm => "SearchTermNode",
            Any => "AnyNode",
            All => "AllNode",
            AggregatedCollectionProperty => "AggregatedCollectionPropertyNode",
            ResourceRangeVariableReference => "ResourceRangeVariableReferenceNode",
            SingleNavigation => "SingleNavigationNode",
            SingleComplex => "SingleComplexNode",
            SingleResourceCast => "SingleResourceCastNode",
            SingleResourceFunctionCall => "SingleResourceFunctionCallNode",
            CollectionPropertyAccess => "CollectionPropertyAccessNode",
            CollectionOpenPropertyAccess => "CollectionOpenPropertyAccessNode",
            CollectionConstant => "CollectionConstantNode",
            CollectionFunctionCall => "CollectionFunctionCallNode",
            EntitySet => "EntitySetNode",
            CollectionNavigation => "CollectionNavigationNode",
            CollectionComplex => "CollectionComplexNode",
            CollectionResourceCast => "CollectionResourceCastNode",
            CollectionResourceFunctionCall => "CollectionResourceFunctionCallNode",
        }
    }

    /// True for variants of the single-value lineage, resources included.
    pub fn is_single_value(&self) -> bool {
        use QueryNodeKind::*;
        !matches!(
            self,
            CollectionPropertyAccess
                | CollectionOpenPropertyAccess
                | CollectionConstant
                | CollectionFunctionCall
                | EntitySet
                | CollectionNavigation
                | CollectionComplex
                | CollectionResourceCast
                | CollectionResourceFunctionCall
        )
    }
}
