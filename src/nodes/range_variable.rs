use std::rc::Rc;

use crate::edm::{EdmModel, NavigationSourceId, TypeRef};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::{CollectionNode, CollectionResourceNode};

/// Name of the implicit range variable of `$filter` and `$orderby`.
pub const IT: &str = "$it";

/// Name of the range variable of nested `$filter`/`$orderby` on collections
/// of primitive or complex values.
pub const THIS: &str = "$this";

/// A named iteration variable, introduced by a lambda (`any`/`all`) or by a
/// `$filter`/`$orderby` clause.
///
/// Range variables are shared through `Rc`: the introducing clause or lambda
/// and every reference node hold a handle. The variable lives as long as the
/// longest of them.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeVariable {
    Resource(ResourceRangeVariable),
    NonResource(NonResourceRangeVariable),
}

impl RangeVariable {
    pub fn name(&self) -> &str {
        match self {
            RangeVariable::Resource(v) => &v.name,
            RangeVariable::NonResource(v) => &v.name,
        }
    }

    /// Type of the values the variable ranges over.
    pub fn type_reference(&self) -> Option<&TypeRef> {
        match self {
            RangeVariable::Resource(v) => Some(&v.type_ref),
            RangeVariable::NonResource(v) => v.type_ref.as_ref(),
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, RangeVariable::Resource(_))
    }

    pub fn as_resource(&self) -> Option<&ResourceRangeVariable> {
        match self {
            RangeVariable::Resource(v) => Some(v),
            RangeVariable::NonResource(_) => None,
        }
    }

    pub fn as_non_resource(&self) -> Option<&NonResourceRangeVariable> {
        match self {
            RangeVariable::NonResource(v) => Some(v),
            RangeVariable::Resource(_) => None,
        }
    }
}

/// Range variable over entities or complex instances.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRangeVariable {
    name: String,
    type_ref: TypeRef,
    collection: Option<Rc<CollectionResourceNode>>,
    navigation_source: Option<NavigationSourceId>,
}

impl ResourceRangeVariable {
    /// A variable ranging over the items of `collection`; the navigation
    /// source is taken from the collection.
    pub fn new(
        name: &str,
        type_ref: TypeRef,
        collection: Option<Rc<CollectionResourceNode>>,
    ) -> Result<Self> {
        require_non_empty(name, "name")?;
        require_structured(&type_ref)?;
        let navigation_source = collection.as_ref().and_then(|c| c.navigation_source());
        Ok(ResourceRangeVariable {
            name: name.to_string(),
            type_ref,
            collection,
            navigation_source,
        })
    }

    /// A variable ranging over a navigation source without a collection node,
    /// e.g. `$it` of `People?$filter=...`.
    pub fn for_navigation_source(
        name: &str,
        type_ref: TypeRef,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        require_non_empty(name, "name")?;
        require_structured(&type_ref)?;
        Ok(ResourceRangeVariable {
            name: name.to_string(),
            type_ref,
            collection: None,
            navigation_source,
        })
    }

    /// `$it` over the entity type of `navigation_source`.
    pub fn it(model: &dyn EdmModel, navigation_source: NavigationSourceId) -> Result<Self> {
        let source = model.require_navigation_source(navigation_source)?;
        Self::for_navigation_source(
            IT,
            TypeRef::entity(source.entity_type, false),
            Some(navigation_source),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn collection(&self) -> Option<&Rc<CollectionResourceNode>> {
        self.collection.as_ref()
    }

    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.navigation_source
    }
}

/// Range variable over primitive, enum or untyped values.
#[derive(Debug, Clone, PartialEq)]
pub struct NonResourceRangeVariable {
    name: String,
    type_ref: Option<TypeRef>,
    collection: Option<Rc<CollectionNode>>,
}

impl NonResourceRangeVariable {
    pub fn new(
        name: &str,
        type_ref: Option<TypeRef>,
        collection: Option<Rc<CollectionNode>>,
    ) -> Result<Self> {
        require_non_empty(name, "name")?;
        if let Some(t) = &type_ref
            && t.is_structured()
        {
            return Err(SemanticError::InvalidItemType {
                node: "NonResourceRangeVariable",
                expected: "non-structured",
                type_name: t.definition.to_string(),
            });
        }
        Ok(NonResourceRangeVariable {
            name: name.to_string(),
            type_ref,
            collection,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }

    pub fn collection(&self) -> Option<&Rc<CollectionNode>> {
        self.collection.as_ref()
    }
}

fn require_structured(type_ref: &TypeRef) -> Result<()> {
    if !type_ref.is_structured() {
        return Err(SemanticError::InvalidItemType {
            node: "ResourceRangeVariable",
            expected: "entity or complex",
            type_name: type_ref.definition.to_string(),
        });
    }
    Ok(())
}
