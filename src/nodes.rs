//! # Query nodes
//!
//! The bound expression tree of `$filter`, `$orderby`, `$search`, `$compute`
//! and `$apply`.
//!
//! ## Architecture Overview
//!
//! Nodes form two lineages joined by [`QueryNode`]:
//!
//! - **[single_value]** - [`SingleValueNode`]: literals, operators, property
//!   access, counts, lambdas and the [`SingleResourceNode`] refinement
//! - **[resource]** - [`SingleResourceNode`]: range variable references,
//!   single navigation, complex access and casts
//! - **[collection]** - [`CollectionNode`]: value collections and the
//!   [`CollectionResourceNode`] refinement
//! - **[collection_resource]** - entity sets, collection navigation, complex
//!   collections and casts
//! - **[function]** - function calls, one node per result shape
//! - **[lambda]** - `any` and `all`
//! - **[range_variable]** - [`RangeVariable`] and the `$it`/`$this` names
//! - **[clauses]** - `$filter`, `$orderby`, `$search`, `$compute`, `$levels`
//! - **[alias]** - parameter aliases and their lazily bound values
//!
//! ## Construction
//!
//! Trees are built bottom-up. Every constructor checks the rules of its node
//! (property kind, multiplicity, type relationships) against the
//! [`EdmModel`](crate::edm::EdmModel) and either returns the finished node or
//! a [`SemanticError`](crate::SemanticError). Children are shared through
//! `Rc` and never mutated.
//!
//! ```
//! use std::rc::Rc;
//! use odata_semantic::ODataValue;
//! use odata_semantic::nodes::{BinaryOperatorKind, BinaryOperatorNode, ConstantNode, SingleValueNode};
//!
//! let one = Rc::new(SingleValueNode::from(ConstantNode::new(ODataValue::Int32(1))));
//! let two = Rc::new(SingleValueNode::from(ConstantNode::new(ODataValue::Int32(2))));
//! let lt = BinaryOperatorNode::new(BinaryOperatorKind::LessThan, one, two);
//! assert!(lt.type_reference().is_some_and(|t| t.is_boolean()));
//! ```

mod checks;

pub mod alias;
pub mod clauses;
pub mod collection;
pub mod collection_resource;
pub mod function;
pub mod kind;
pub mod lambda;
pub mod operators;
pub mod range_variable;
pub mod resource;
pub mod single_value;

pub use alias::{ParameterAliasNode, ParameterAliasValueAccessor};
pub use clauses::{
    ComputeClause, ComputeExpression, FilterClause, LevelsClause, OrderByClause,
    OrderByDirection, SearchClause,
};
pub use collection::{
    CollectionConstantNode, CollectionNode, CollectionOpenPropertyAccessNode,
    CollectionPropertyAccessNode,
};
pub use collection_resource::{
    CollectionComplexNode, CollectionNavigationNode, CollectionResourceCastNode,
    CollectionResourceNode, EntitySetNode,
};
pub use function::{
    CollectionFunctionCallNode, CollectionResourceFunctionCallNode, SingleResourceFunctionCallNode,
    SingleValueFunctionCallNode,
};
pub use kind::QueryNodeKind;
pub use lambda::{AllNode, AnyNode};
pub use operators::{BinaryOperatorKind, UnaryOperatorKind};
pub use range_variable::{IT, NonResourceRangeVariable, RangeVariable, ResourceRangeVariable, THIS};
pub use resource::{
    ResourceRangeVariableReferenceNode, SingleComplexNode, SingleNavigationNode,
    SingleResourceCastNode, SingleResourceNode,
};
pub use single_value::{
    AggregatedCollectionPropertyNode, BinaryOperatorNode, CollectionCountNode, ConstantNode,
    ConvertNode, CountNode, CountVirtualPropertyNode, InNode, NamedFunctionParameterNode,
    NonResourceRangeVariableReferenceNode, SearchTermNode, SingleValueCastNode,
    SingleValueNode, SingleValueOpenPropertyAccessNode, SingleValuePropertyAccessNode,
    UnaryOperatorNode,
};

pub(crate) use clauses::ensure_unique_aliases;
pub(crate) use checks::{is_assignable, structured_type_ref};

use crate::edm::TypeRef;

/// Any bound query node.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Single(SingleValueNode),
    Collection(CollectionNode),
}

impl QueryNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            QueryNode::Single(node) => node.kind(),
            QueryNode::Collection(node) => node.kind(),
        }
    }

    /// The value type for single values, the collection type otherwise.
    pub fn type_reference(&self) -> Option<&TypeRef> {
        match self {
            QueryNode::Single(node) => node.type_reference(),
            QueryNode::Collection(node) => Some(node.collection_type()),
        }
    }

    pub fn as_single_value(&self) -> Option<&SingleValueNode> {
        match self {
            QueryNode::Single(node) => Some(node),
            QueryNode::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionNode> {
        match self {
            QueryNode::Collection(node) => Some(node),
            QueryNode::Single(_) => None,
        }
    }
}

impl From<SingleValueNode> for QueryNode {
    fn from(node: SingleValueNode) -> Self {
        QueryNode::Single(node)
    }
}

impl From<CollectionNode> for QueryNode {
    fn from(node: CollectionNode) -> Self {
        QueryNode::Collection(node)
    }
}
