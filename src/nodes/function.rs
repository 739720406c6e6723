//! Bound function calls, one node per result shape.
//!
//! The binder resolves the candidate overloads and binds the arguments; these
//! nodes only check that the declared return type fits the node.

use std::rc::Rc;

use tracing::debug;

use crate::edm::{EdmType, NavigationSourceId, OperationId, TypeRef};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::QueryNode;

/// Parts shared by every function call node.
#[derive(Debug, Clone, PartialEq)]
struct FunctionCall {
    name: String,
    functions: Vec<OperationId>,
    parameters: Vec<QueryNode>,
    source: Option<Rc<QueryNode>>,
}

impl FunctionCall {
    fn new(
        name: &str,
        functions: Vec<OperationId>,
        parameters: Vec<QueryNode>,
        source: Option<Rc<QueryNode>>,
    ) -> Result<Self> {
        require_non_empty(name, "name")?;
        Ok(FunctionCall {
            name: name.to_string(),
            functions,
            parameters,
            source,
        })
    }
}

macro_rules! function_call_accessors {
    ($($node:ident),*) => {
        $(
            impl $node {
                /// Function name as written, e.g. `contains` or `NS.Fn`.
                pub fn name(&self) -> &str {
                    &self.call.name
                }

                /// Candidate overloads; empty for built-in functions.
                pub fn functions(&self) -> &[OperationId] {
                    &self.call.functions
                }

                pub fn parameters(&self) -> &[QueryNode] {
                    &self.call.parameters
                }

                /// Binding parameter of a bound function.
                pub fn source(&self) -> Option<&Rc<QueryNode>> {
                    self.call.source.as_ref()
                }
            }
        )*
    };
}

function_call_accessors!(
    SingleValueFunctionCallNode,
    SingleResourceFunctionCallNode,
    CollectionFunctionCallNode,
    CollectionResourceFunctionCallNode
);

fn invalid_return(node: &'static str, type_ref: &TypeRef) -> SemanticError {
    debug!(node, return_type = %type_ref.definition, "function return type rejected");
    SemanticError::InvalidReturnType {
        node,
        type_name: type_ref.definition.to_string(),
    }
}

fn element_of(node: &'static str, type_ref: &TypeRef) -> Result<TypeRef> {
    type_ref
        .element_type()
        .cloned()
        .ok_or_else(|| invalid_return(node, type_ref))
}

/// Function returning a single primitive, enum, complex or untyped value.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValueFunctionCallNode {
    call: FunctionCall,
    type_ref: Option<TypeRef>,
}

impl SingleValueFunctionCallNode {
    pub fn new(
        name: &str,
        functions: Vec<OperationId>,
        parameters: Vec<QueryNode>,
        return_type: Option<TypeRef>,
        source: Option<Rc<QueryNode>>,
    ) -> Result<Self> {
        const NODE: &str = "SingleValueFunctionCallNode";
        let call = FunctionCall::new(name, functions, parameters, source)?;
        if let Some(t) = &return_type
            && matches!(t.definition, EdmType::Entity(_) | EdmType::Collection(_))
        {
            return Err(invalid_return(NODE, t));
        }
        Ok(SingleValueFunctionCallNode {
            call,
            type_ref: return_type,
        })
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// Function returning a single entity or complex instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleResourceFunctionCallNode {
    call: FunctionCall,
    type_ref: TypeRef,
    navigation_source: Option<NavigationSourceId>,
}

impl SingleResourceFunctionCallNode {
    pub fn new(
        name: &str,
        functions: Vec<OperationId>,
        parameters: Vec<QueryNode>,
        return_type: TypeRef,
        navigation_source: Option<NavigationSourceId>,
        source: Option<Rc<QueryNode>>,
    ) -> Result<Self> {
        let call = FunctionCall::new(name, functions, parameters, source)?;
        if !return_type.is_structured() {
            return Err(invalid_return("SingleResourceFunctionCallNode", &return_type));
        }
        Ok(SingleResourceFunctionCallNode {
            call,
            type_ref: return_type,
            navigation_source,
        })
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.navigation_source
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// Function returning a collection of primitive, enum or complex values.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionFunctionCallNode {
    call: FunctionCall,
    item_type: TypeRef,
    collection_type: TypeRef,
}

impl CollectionFunctionCallNode {
    pub fn new(
        name: &str,
        functions: Vec<OperationId>,
        parameters: Vec<QueryNode>,
        return_type: TypeRef,
        source: Option<Rc<QueryNode>>,
    ) -> Result<Self> {
        const NODE: &str = "CollectionFunctionCallNode";
        let call = FunctionCall::new(name, functions, parameters, source)?;
        let item_type = element_of(NODE, &return_type)?;
        if item_type.is_entity() || item_type.is_collection() {
            return Err(invalid_return(NODE, &return_type));
        }
        Ok(CollectionFunctionCallNode {
            call,
            item_type,
            collection_type: return_type,
        })
    }

    pub fn item_type(&self) -> &TypeRef {
        &self.item_type
    }

    pub fn collection_type(&self) -> &TypeRef {
        &self.collection_type
    }
}

/// Function returning a collection of entities or complex instances.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResourceFunctionCallNode {
    call: FunctionCall,
    item_type: TypeRef,
    collection_type: TypeRef,
    navigation_source: Option<NavigationSourceId>,
}

impl CollectionResourceFunctionCallNode {
    pub fn new(
        name: &str,
        functions: Vec<OperationId>,
        parameters: Vec<QueryNode>,
        return_type: TypeRef,
        navigation_source: Option<NavigationSourceId>,
        source: Option<Rc<QueryNode>>,
    ) -> Result<Self> {
        const NODE: &str = "CollectionResourceFunctionCallNode";
        let call = FunctionCall::new(name, functions, parameters, source)?;
        let item_type = element_of(NODE, &return_type)?;
        if !item_type.is_structured() {
            return Err(invalid_return(NODE, &return_type));
        }
        Ok(CollectionResourceFunctionCallNode {
            call,
            item_type,
            collection_type: return_type,
            navigation_source,
        })
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.navigation_source
    }

    pub fn item_type(&self) -> &TypeRef {
        &self.item_type
    }

    pub fn collection_type(&self) -> &TypeRef {
        &self.collection_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::{PrimitiveKind, StructuredTypeId};

    #[test]
    fn test_single_value_call_rejects_collection_return() {
        let ret = TypeRef::collection(TypeRef::primitive(PrimitiveKind::String, false));
        let err = SingleValueFunctionCallNode::new("f", Vec::new(), Vec::new(), Some(ret), None)
            .unwrap_err();
        assert!(matches!(err, SemanticError::InvalidReturnType { .. }));
    }

    #[test]
    fn test_built_in_call_without_overloads() {
        let node = SingleValueFunctionCallNode::new(
            "length",
            Vec::new(),
            Vec::new(),
            Some(TypeRef::primitive(PrimitiveKind::Int32, false)),
            None,
        )
        .unwrap();
        assert_eq!(node.name(), "length");
        assert!(node.functions().is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = SingleValueFunctionCallNode::new("", Vec::new(), Vec::new(), None, None)
            .unwrap_err();
        assert_eq!(err, SemanticError::ArgumentNullOrEmpty("name"));
    }

    #[test]
    fn test_collection_resource_call_requires_structured_items() {
        let ret = TypeRef::collection(TypeRef::primitive(PrimitiveKind::Int32, false));
        let err = CollectionResourceFunctionCallNode::new("f", Vec::new(), Vec::new(), ret, None, None)
            .unwrap_err();
        assert!(matches!(err, SemanticError::InvalidReturnType { .. }));

        let ret = TypeRef::collection(TypeRef::entity(StructuredTypeId(0), false));
        assert!(
            CollectionResourceFunctionCallNode::new("f", Vec::new(), Vec::new(), ret, None, None)
                .is_ok()
        );
    }
}
