use std::rc::Rc;

use tracing::debug;

use crate::edm::{
    BindingPath, EdmModel, Multiplicity, NavigationSourceId, PropertyId, StructuredTypeId, TypeRef,
};
use crate::error::{Result, SemanticError};
use crate::nodes::checks::{
    collection_property, navigation_property, related_types, structural_property,
    structured_type_ref,
};
use crate::nodes::{QueryNodeKind, RangeVariable, SingleResourceFunctionCallNode};

/// A single entity or complex instance.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleResourceNode {
    ResourceRangeVariableReference(ResourceRangeVariableReferenceNode),
    SingleNavigation(SingleNavigationNode),
    SingleComplex(SingleComplexNode),
    SingleResourceCast(SingleResourceCastNode),
    SingleResourceFunctionCall(SingleResourceFunctionCallNode),
}

impl SingleResourceNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            SingleResourceNode::ResourceRangeVariableReference(_) => {
                QueryNodeKind::ResourceRangeVariableReference
            }
            SingleResourceNode::SingleNavigation(_) => QueryNodeKind::SingleNavigation,
            SingleResourceNode::SingleComplex(_) => QueryNodeKind::SingleComplex,
            SingleResourceNode::SingleResourceCast(_) => QueryNodeKind::SingleResourceCast,
            SingleResourceNode::SingleResourceFunctionCall(_) => {
                QueryNodeKind::SingleResourceFunctionCall
            }
        }
    }

    /// The navigation source the resource comes from, when known.
    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        match self {
            SingleResourceNode::ResourceRangeVariableReference(node) => node.navigation_source(),
            SingleResourceNode::SingleNavigation(node) => node.navigation_source(),
            SingleResourceNode::SingleComplex(node) => node.navigation_source(),
            SingleResourceNode::SingleResourceCast(node) => node.navigation_source(),
            SingleResourceNode::SingleResourceFunctionCall(node) => node.navigation_source(),
        }
    }

    /// Entity or complex type of the resource.
    pub fn structured_type_ref(&self) -> &TypeRef {
        match self {
            SingleResourceNode::ResourceRangeVariableReference(node) => node.type_reference(),
            SingleResourceNode::SingleNavigation(node) => node.type_reference(),
            SingleResourceNode::SingleComplex(node) => node.type_reference(),
            SingleResourceNode::SingleResourceCast(node) => node.type_reference(),
            SingleResourceNode::SingleResourceFunctionCall(node) => node.type_reference(),
        }
    }

    /// The type when the resource is an entity.
    pub fn entity_type_ref(&self) -> Option<&TypeRef> {
        Some(self.structured_type_ref()).filter(|t| t.is_entity())
    }

    pub fn structured_type_id(&self) -> Option<StructuredTypeId> {
        self.structured_type_ref().structured_id()
    }
}

macro_rules! single_resource_from {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for SingleResourceNode {
                fn from(node: $node) -> Self {
                    SingleResourceNode::$variant(node)
                }
            }

            impl From<$node> for crate::nodes::SingleValueNode {
                fn from(node: $node) -> Self {
                    crate::nodes::SingleValueNode::Resource(SingleResourceNode::$variant(node))
                }
            }
        )*
    };
}

single_resource_from! {
    ResourceRangeVariableReferenceNode => ResourceRangeVariableReference,
    SingleNavigationNode => SingleNavigation,
    SingleComplexNode => SingleComplex,
    SingleResourceCastNode => SingleResourceCast,
    SingleResourceFunctionCallNode => SingleResourceFunctionCall,
}

/// Reference to a resource range variable such as `$it` or a lambda variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRangeVariableReferenceNode {
    range_variable: Rc<RangeVariable>,
    type_ref: TypeRef,
    navigation_source: Option<NavigationSourceId>,
}

impl ResourceRangeVariableReferenceNode {
    pub fn new(range_variable: Rc<RangeVariable>) -> Result<Self> {
        let Some(resource) = range_variable.as_resource() else {
            return Err(SemanticError::TypeMismatch {
                expected: "resource range variable".to_string(),
                actual: format!("non-resource range variable `{}`", range_variable.name()),
            });
        };
        let type_ref = resource.type_ref().clone();
        let navigation_source = resource.navigation_source();
        Ok(ResourceRangeVariableReferenceNode {
            range_variable,
            type_ref,
            navigation_source,
        })
    }

    pub fn name(&self) -> &str {
        self.range_variable.name()
    }

    pub fn range_variable(&self) -> &Rc<RangeVariable> {
        &self.range_variable
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.navigation_source
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// Navigation to an entity through a 0..1 or 1 navigation property.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleNavigationNode {
    source: Rc<SingleResourceNode>,
    property: PropertyId,
    multiplicity: Multiplicity,
    binding_path: Option<BindingPath>,
    navigation_source: Option<NavigationSourceId>,
    type_ref: TypeRef,
}

impl SingleNavigationNode {
    /// Builds the node and resolves its target navigation source.
    ///
    /// With `binding_path` the binding declared for that path is used,
    /// without it the first binding of the property.
    pub fn new(
        model: &dyn EdmModel,
        source: Rc<SingleResourceNode>,
        property: PropertyId,
        binding_path: Option<&BindingPath>,
    ) -> Result<Self> {
        let def = navigation_property(model, property, false, "SingleNavigationNode")?;
        let multiplicity = def.multiplicity().unwrap_or(Multiplicity::ZeroOrOne);
        let navigation_source = source
            .navigation_source()
            .and_then(|ns| model.find_navigation_target(ns, property, binding_path));
        Ok(SingleNavigationNode {
            source,
            property,
            multiplicity,
            binding_path: binding_path.cloned(),
            navigation_source,
            type_ref: def.type_ref.clone(),
        })
    }

    pub fn source(&self) -> &Rc<SingleResourceNode> {
        &self.source
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    pub fn target_multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    pub fn binding_path(&self) -> Option<&BindingPath> {
        self.binding_path.as_ref()
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.navigation_source
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// Access to a single complex-typed property.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleComplexNode {
    source: Rc<SingleResourceNode>,
    property: PropertyId,
    type_ref: TypeRef,
}

impl SingleComplexNode {
    pub fn new(model: &dyn EdmModel, source: Rc<SingleResourceNode>, property: PropertyId) -> Result<Self> {
        const NODE: &str = "SingleComplexNode";
        let def = structural_property(model, property, NODE)?;
        collection_property(def, false, NODE)?;
        if !def.type_ref.is_complex() {
            debug!(property = %def.name, "non-complex property bound as complex");
            return Err(SemanticError::InvalidPropertyKind {
                property: def.name.clone(),
                expected: "complex property",
            });
        }
        Ok(SingleComplexNode {
            source,
            property,
            type_ref: def.type_ref.clone(),
        })
    }

    pub fn source(&self) -> &Rc<SingleResourceNode> {
        &self.source
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    /// Complex values live in the navigation source of their owner.
    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.source.navigation_source()
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}

/// `Source/NS.DerivedType` on a single resource.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleResourceCastNode {
    source: Option<Rc<SingleResourceNode>>,
    type_ref: TypeRef,
}

impl SingleResourceCastNode {
    /// Fails when the target is unrelated to the source's type.
    pub fn new(
        model: &dyn EdmModel,
        source: Option<Rc<SingleResourceNode>>,
        target: StructuredTypeId,
    ) -> Result<Self> {
        let nullable = source
            .as_ref()
            .is_some_and(|s| s.structured_type_ref().nullable);
        let type_ref = structured_type_ref(model, target, nullable)?;
        if let Some(source_type) = source.as_ref().and_then(|s| s.structured_type_id()) {
            related_types(model, source_type, target)?;
        }
        Ok(SingleResourceCastNode { source, type_ref })
    }

    pub fn source(&self) -> Option<&Rc<SingleResourceNode>> {
        self.source.as_ref()
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.source.as_ref().and_then(|s| s.navigation_source())
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_ref
    }
}
