use std::rc::Rc;

use tracing::debug;

use crate::edm::{EdmModel, EdmType, PropertyId, TypeRef};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::checks::{collection_property, is_assignable, structural_property};
use crate::nodes::{
    CollectionFunctionCallNode, CollectionResourceNode, ConstantNode, QueryNodeKind,
    SingleValueNode,
};
use crate::value::ODataValue;

/// A node that evaluates to a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionNode {
    PropertyAccess(CollectionPropertyAccessNode),
    OpenPropertyAccess(CollectionOpenPropertyAccessNode),
    Constant(CollectionConstantNode),
    FunctionCall(CollectionFunctionCallNode),
    /// Collection of entities or complex instances.
    Resource(CollectionResourceNode),
}

impl CollectionNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            CollectionNode::PropertyAccess(_) => QueryNodeKind::CollectionPropertyAccess,
            CollectionNode::OpenPropertyAccess(_) => QueryNodeKind::CollectionOpenPropertyAccess,
            CollectionNode::Constant(_) => QueryNodeKind::CollectionConstant,
            CollectionNode::FunctionCall(_) => QueryNodeKind::CollectionFunctionCall,
            CollectionNode::Resource(node) => node.kind(),
        }
    }

    /// Type of the items; `None` for undeclared collections.
    pub fn item_type(&self) -> Option<&TypeRef> {
        match self {
            CollectionNode::PropertyAccess(node) => Some(&node.item_type),
            CollectionNode::OpenPropertyAccess(_) => None,
            CollectionNode::Constant(node) => Some(&node.item_type),
            CollectionNode::FunctionCall(node) => Some(node.item_type()),
            CollectionNode::Resource(node) => Some(node.item_structured_type()),
        }
    }

    /// `Collection(item type)`; undeclared collections report
    /// `Collection(Edm.Untyped)`.
    pub fn collection_type(&self) -> &TypeRef {
        match self {
            CollectionNode::PropertyAccess(node) => &node.collection_type,
            CollectionNode::OpenPropertyAccess(node) => &node.collection_type,
            CollectionNode::Constant(node) => &node.collection_type,
            CollectionNode::FunctionCall(node) => node.collection_type(),
            CollectionNode::Resource(node) => node.collection_type(),
        }
    }

    pub fn as_resource(&self) -> Option<&CollectionResourceNode> {
        match self {
            CollectionNode::Resource(node) => Some(node),
            _ => None,
        }
    }
}

impl From<CollectionResourceNode> for CollectionNode {
    fn from(node: CollectionResourceNode) -> Self {
        CollectionNode::Resource(node)
    }
}

impl From<CollectionPropertyAccessNode> for CollectionNode {
    fn from(node: CollectionPropertyAccessNode) -> Self {
        CollectionNode::PropertyAccess(node)
    }
}

impl From<CollectionOpenPropertyAccessNode> for CollectionNode {
    fn from(node: CollectionOpenPropertyAccessNode) -> Self {
        CollectionNode::OpenPropertyAccess(node)
    }
}

impl From<CollectionConstantNode> for CollectionNode {
    fn from(node: CollectionConstantNode) -> Self {
        CollectionNode::Constant(node)
    }
}

impl From<CollectionFunctionCallNode> for CollectionNode {
    fn from(node: CollectionFunctionCallNode) -> Self {
        CollectionNode::FunctionCall(node)
    }
}

/// Access to a collection of primitive or enum values.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPropertyAccessNode {
    source: Rc<SingleValueNode>,
    property: PropertyId,
    item_type: TypeRef,
    collection_type: TypeRef,
}

impl CollectionPropertyAccessNode {
    pub fn new(model: &dyn EdmModel, source: Rc<SingleValueNode>, property: PropertyId) -> Result<Self> {
        const NODE: &str = "CollectionPropertyAccessNode";
        let def = structural_property(model, property, NODE)?;
        collection_property(def, true, NODE)?;
        let item_type = match def.type_ref.element_type() {
            Some(element) if !element.is_structured() => element.clone(),
            _ => {
                debug!(property = %def.name, "collection of complex accessed as value collection");
                return Err(SemanticError::InvalidPropertyKind {
                    property: def.name.clone(),
                    expected: "collection of primitive or enum property",
                });
            }
        };
        Ok(CollectionPropertyAccessNode {
            source,
            property,
            item_type,
            collection_type: def.type_ref.clone(),
        })
    }

    pub fn source(&self) -> &Rc<SingleValueNode> {
        &self.source
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }
}

/// Access to an undeclared collection-valued property of an open type.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionOpenPropertyAccessNode {
    source: Rc<SingleValueNode>,
    name: String,
    collection_type: TypeRef,
}

impl CollectionOpenPropertyAccessNode {
    pub fn new(source: Rc<SingleValueNode>, name: &str) -> Result<Self> {
        require_non_empty(name, "name")?;
        Ok(CollectionOpenPropertyAccessNode {
            source,
            name: name.to_string(),
            collection_type: TypeRef::collection(TypeRef::untyped()),
        })
    }

    pub fn source(&self) -> &Rc<SingleValueNode> {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A literal collection, e.g. the right operand of `in`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConstantNode {
    items: Vec<ConstantNode>,
    literal_text: String,
    item_type: TypeRef,
    collection_type: TypeRef,
}

impl CollectionConstantNode {
    /// Every non-null value must fit the element type of `collection_type`.
    pub fn new(values: Vec<ODataValue>, literal_text: &str, collection_type: TypeRef) -> Result<Self> {
        let Some(item_type) = collection_type.element_type().cloned() else {
            return Err(SemanticError::InvalidItemType {
                node: "CollectionConstantNode",
                expected: "a collection type with",
                type_name: collection_type.definition.to_string(),
            });
        };
        for value in &values {
            check_item(value, &item_type)?;
        }
        let items = values
            .into_iter()
            .map(|value| ConstantNode::with_type(value, None, Some(item_type.clone())))
            .collect();
        Ok(CollectionConstantNode {
            items,
            literal_text: literal_text.to_string(),
            item_type,
            collection_type,
        })
    }

    /// Builds the node from a JSON array such as `[1,2,3]` or `["a","b"]`.
    ///
    /// Strings are read as the element type's literal form when the element
    /// is a GUID, date, timestamp or duration.
    #[cfg(feature = "json")]
    pub fn from_json(json: &serde_json::Value, collection_type: TypeRef) -> Result<Self> {
        let serde_json::Value::Array(elements) = json else {
            return Err(SemanticError::TypeMismatch {
                expected: "JSON array".to_string(),
                actual: json.to_string(),
            });
        };
        let element_kind = collection_type.element_type().and_then(TypeRef::primitive_kind);
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let Some(value) = ODataValue::from_json(element) else {
                return Err(SemanticError::TypeMismatch {
                    expected: "primitive JSON value".to_string(),
                    actual: element.to_string(),
                });
            };
            values.push(coerce_literal(value, element_kind));
        }
        Self::new(values, &json.to_string(), collection_type)
    }

    pub fn items(&self) -> &[ConstantNode] {
        &self.items
    }

    pub fn literal_text(&self) -> &str {
        &self.literal_text
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn check_item(value: &ODataValue, item_type: &TypeRef) -> Result<()> {
    let fits = match (value, &item_type.definition) {
        (ODataValue::Null, _) => true,
        (_, EdmType::Untyped | EdmType::Unknown) => true,
        (ODataValue::Enum { type_id, .. }, EdmType::Enum(expected)) => type_id == expected,
        (value, _) => value
            .type_ref()
            .is_some_and(|actual| is_assignable(None, &actual, item_type)),
    };
    if !fits {
        debug!(literal = %value.to_literal(), item_type = %item_type.definition, "collection constant item mismatch");
        return Err(SemanticError::TypeMismatch {
            expected: item_type.definition.to_string(),
            actual: value.to_literal(),
        });
    }
    Ok(())
}

#[cfg(feature = "json")]
fn coerce_literal(value: ODataValue, kind: Option<crate::edm::PrimitiveKind>) -> ODataValue {
    use crate::edm::PrimitiveKind;
    match (value, kind) {
        (ODataValue::String(s), Some(PrimitiveKind::Guid)) => ODataValue::Guid(s),
        (ODataValue::String(s), Some(PrimitiveKind::Date)) => ODataValue::Date(s),
        (ODataValue::String(s), Some(PrimitiveKind::DateTimeOffset)) => ODataValue::DateTimeOffset(s),
        (ODataValue::String(s), Some(PrimitiveKind::Duration)) => ODataValue::Duration(s),
        (value, _) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::PrimitiveKind;

    #[test]
    fn test_constant_items_widen_to_element_type() {
        let ty = TypeRef::collection(TypeRef::primitive(PrimitiveKind::Int64, false));
        let node = CollectionConstantNode::new(
            vec![ODataValue::Int32(1), ODataValue::Int64(2), ODataValue::Null],
            "(1,2,null)",
            ty,
        )
        .unwrap();
        assert_eq!(node.len(), 3);
        assert_eq!(
            node.items()[0].type_reference(),
            Some(&TypeRef::primitive(PrimitiveKind::Int64, false))
        );
    }

    #[test]
    fn test_constant_rejects_mismatched_item() {
        let ty = TypeRef::collection(TypeRef::primitive(PrimitiveKind::Int32, false));
        let err = CollectionConstantNode::new(
            vec![ODataValue::String("x".to_string())],
            "('x')",
            ty,
        )
        .unwrap_err();
        assert!(matches!(err, SemanticError::TypeMismatch { .. }));
    }

    #[test]
    fn test_constant_requires_collection_type() {
        let err = CollectionConstantNode::new(
            Vec::new(),
            "()",
            TypeRef::primitive(PrimitiveKind::Int32, false),
        )
        .unwrap_err();
        assert!(matches!(err, SemanticError::InvalidItemType { .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_reads_guid_strings() {
        let ty = TypeRef::collection(TypeRef::primitive(PrimitiveKind::Guid, false));
        let json = serde_json::json!(["00000000-0000-0000-0000-000000000001"]);
        let node = CollectionConstantNode::from_json(&json, ty).unwrap();
        assert!(matches!(node.items()[0].value(), ODataValue::Guid(_)));
    }
}
