use std::rc::Rc;

use tracing::debug;

use crate::edm::{
    BindingPath, EdmModel, NavigationSourceId, NavigationSourceKind, PropertyId,
    StructuredTypeId, TypeRef,
};
use crate::error::{Result, SemanticError};
use crate::nodes::checks::{
    collection_property, navigation_property, related_types, structural_property,
    structured_type_ref,
};
use crate::nodes::{CollectionResourceFunctionCallNode, QueryNodeKind, SingleResourceNode};

/// A collection of entities or complex instances.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionResourceNode {
    EntitySet(EntitySetNode),
    CollectionNavigation(CollectionNavigationNode),
    CollectionComplex(CollectionComplexNode),
    CollectionResourceCast(CollectionResourceCastNode),
    CollectionResourceFunctionCall(CollectionResourceFunctionCallNode),
}

impl CollectionResourceNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            CollectionResourceNode::EntitySet(_) => QueryNodeKind::EntitySet,
            CollectionResourceNode::CollectionNavigation(_) => QueryNodeKind::CollectionNavigation,
            CollectionResourceNode::CollectionComplex(_) => QueryNodeKind::CollectionComplex,
            CollectionResourceNode::CollectionResourceCast(_) => {
                QueryNodeKind::CollectionResourceCast
            }
            CollectionResourceNode::CollectionResourceFunctionCall(_) => {
                QueryNodeKind::CollectionResourceFunctionCall
            }
        }
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        match self {
            CollectionResourceNode::EntitySet(node) => Some(node.navigation_source()),
            CollectionResourceNode::CollectionNavigation(node) => node.navigation_source(),
            CollectionResourceNode::CollectionComplex(node) => node.navigation_source(),
            CollectionResourceNode::CollectionResourceCast(node) => node.navigation_source(),
            CollectionResourceNode::CollectionResourceFunctionCall(node) => {
                node.navigation_source()
            }
        }
    }

    /// Entity or complex type of the items.
    pub fn item_structured_type(&self) -> &TypeRef {
        match self {
            CollectionResourceNode::EntitySet(node) => &node.item_type,
            CollectionResourceNode::CollectionNavigation(node) => &node.item_type,
            CollectionResourceNode::CollectionComplex(node) => &node.item_type,
            CollectionResourceNode::CollectionResourceCast(node) => &node.item_type,
            CollectionResourceNode::CollectionResourceFunctionCall(node) => node.item_type(),
        }
    }

    /// The item type when the items are entities.
    pub fn entity_item_type(&self) -> Option<&TypeRef> {
        Some(self.item_structured_type()).filter(|t| t.is_entity())
    }

    pub fn collection_type(&self) -> &TypeRef {
        match self {
            CollectionResourceNode::EntitySet(node) => &node.collection_type,
            CollectionResourceNode::CollectionNavigation(node) => &node.collection_type,
            CollectionResourceNode::CollectionComplex(node) => &node.collection_type,
            CollectionResourceNode::CollectionResourceCast(node) => &node.collection_type,
            CollectionResourceNode::CollectionResourceFunctionCall(node) => {
                node.collection_type()
            }
        }
    }

    pub fn item_structured_type_id(&self) -> Option<StructuredTypeId> {
        self.item_structured_type().structured_id()
    }
}

macro_rules! collection_resource_from {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for CollectionResourceNode {
                fn from(node: $node) -> Self {
                    CollectionResourceNode::$variant(node)
                }
            }

            impl From<$node> for crate::nodes::CollectionNode {
                fn from(node: $node) -> Self {
                    crate::nodes::CollectionNode::Resource(CollectionResourceNode::$variant(node))
                }
            }
        )*
    };
}

collection_resource_from! {
    EntitySetNode => EntitySet,
    CollectionNavigationNode => CollectionNavigation,
    CollectionComplexNode => CollectionComplex,
    CollectionResourceCastNode => CollectionResourceCast,
    CollectionResourceFunctionCallNode => CollectionResourceFunctionCall,
}

/// All entities of an entity set.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySetNode {
    navigation_source: NavigationSourceId,
    item_type: TypeRef,
    collection_type: TypeRef,
}

impl EntitySetNode {
    pub fn new(model: &dyn EdmModel, entity_set: NavigationSourceId) -> Result<Self> {
        let def = model.require_navigation_source(entity_set)?;
        if def.kind != NavigationSourceKind::EntitySet {
            debug!(source = %def.name, kind = ?def.kind, "navigation source is not an entity set");
            return Err(SemanticError::TypeMismatch {
                expected: "entity set".to_string(),
                actual: format!("{:?} `{}`", def.kind, def.name),
            });
        }
        let item_type = TypeRef::entity(def.entity_type, false);
        Ok(EntitySetNode {
            navigation_source: entity_set,
            collection_type: TypeRef::collection(item_type.clone()),
            item_type,
        })
    }

    pub fn navigation_source(&self) -> NavigationSourceId {
        self.navigation_source
    }
}

/// Navigation to a set of entities through a `*` navigation property.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionNavigationNode {
    source: Rc<SingleResourceNode>,
    property: PropertyId,
    binding_path: Option<BindingPath>,
    navigation_source: Option<NavigationSourceId>,
    item_type: TypeRef,
    collection_type: TypeRef,
}

impl CollectionNavigationNode {
    /// Builds the node and resolves its target navigation source, path-aware
    /// when `binding_path` is given.
    pub fn new(
        model: &dyn EdmModel,
        source: Rc<SingleResourceNode>,
        property: PropertyId,
        binding_path: Option<&BindingPath>,
    ) -> Result<Self> {
        let def = navigation_property(model, property, true, "CollectionNavigationNode")?;
        let Some(item_type) = def.type_ref.element_type().cloned() else {
            return Err(SemanticError::CollectionMismatch {
                property: def.name.clone(),
                expected_collection: true,
            });
        };
        let navigation_source = source
            .navigation_source()
            .and_then(|ns| model.find_navigation_target(ns, property, binding_path));
        Ok(CollectionNavigationNode {
            source,
            property,
            binding_path: binding_path.cloned(),
            navigation_source,
            item_type,
            collection_type: def.type_ref.clone(),
        })
    }

    pub fn source(&self) -> &Rc<SingleResourceNode> {
        &self.source
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    pub fn binding_path(&self) -> Option<&BindingPath> {
        self.binding_path.as_ref()
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.navigation_source
    }
}

/// Access to a collection-of-complex property.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionComplexNode {
    source: Rc<SingleResourceNode>,
    property: PropertyId,
    item_type: TypeRef,
    collection_type: TypeRef,
}

impl CollectionComplexNode {
    pub fn new(model: &dyn EdmModel, source: Rc<SingleResourceNode>, property: PropertyId) -> Result<Self> {
        const NODE: &str = "CollectionComplexNode";
        let def = structural_property(model, property, NODE)?;
        collection_property(def, true, NODE)?;
        let item_type = match def.type_ref.element_type() {
            Some(element) if element.is_complex() => element.clone(),
            _ => {
                debug!(property = %def.name, "property is not a collection of complex values");
                return Err(SemanticError::InvalidPropertyKind {
                    property: def.name.clone(),
                    expected: "collection of complex property",
                });
            }
        };
        Ok(CollectionComplexNode {
            source,
            property,
            item_type,
            collection_type: def.type_ref.clone(),
        })
    }

    pub fn source(&self) -> &Rc<SingleResourceNode> {
        &self.source
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.source.navigation_source()
    }
}

/// `Collection/NS.DerivedType`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResourceCastNode {
    source: Rc<CollectionResourceNode>,
    item_type: TypeRef,
    collection_type: TypeRef,
}

impl CollectionResourceCastNode {
    pub fn new(
        model: &dyn EdmModel,
        source: Rc<CollectionResourceNode>,
        target: StructuredTypeId,
    ) -> Result<Self> {
        if let Some(source_type) = source.item_structured_type_id() {
            related_types(model, source_type, target)?;
        }
        let item_type = structured_type_ref(model, target, false)?;
        Ok(CollectionResourceCastNode {
            source,
            collection_type: TypeRef::collection(item_type.clone()),
            item_type,
        })
    }

    pub fn source(&self) -> &Rc<CollectionResourceNode> {
        &self.source
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.source.navigation_source()
    }
}
