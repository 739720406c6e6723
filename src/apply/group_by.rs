use std::rc::Rc;

use tracing::debug;

use crate::apply::{ItemShape, ShapeProperty, TransformationNode, TransformationSource};
use crate::edm::TypeRef;
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::{SingleValueNode, ensure_unique_aliases};

/// One grouping property; nested paths such as `Address/City` become a
/// parent with children.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByPropertyNode {
    name: String,
    expression: Option<Rc<SingleValueNode>>,
    type_ref: Option<TypeRef>,
    children: Vec<GroupByPropertyNode>,
}

impl GroupByPropertyNode {
    /// A leaf grouping on `expression`.
    pub fn new(name: &str, expression: Rc<SingleValueNode>) -> Result<Self> {
        require_non_empty(name, "name")?;
        let type_ref = expression.type_reference().cloned();
        Ok(GroupByPropertyNode {
            name: name.to_string(),
            expression: Some(expression),
            type_ref,
            children: Vec::new(),
        })
    }

    /// An intermediate node of a nested grouping path.
    pub fn parent(name: &str, type_ref: Option<TypeRef>) -> Result<Self> {
        require_non_empty(name, "name")?;
        Ok(GroupByPropertyNode {
            name: name.to_string(),
            expression: None,
            type_ref,
            children: Vec::new(),
        })
    }

    /// Appends a child; children keep insertion order.
    pub fn add_child(&mut self, child: GroupByPropertyNode) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: GroupByPropertyNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> Option<&Rc<SingleValueNode>> {
        self.expression.as_ref()
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }

    pub fn children(&self) -> &[GroupByPropertyNode] {
        &self.children
    }

    fn to_shape_property(&self) -> ShapeProperty {
        ShapeProperty {
            name: self.name.clone(),
            type_ref: self.type_ref.clone(),
            children: self.children.iter().map(Self::to_shape_property).collect(),
        }
    }
}

/// `groupby((properties), aggregate(...))`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByTransformationNode {
    source: TransformationSource,
    grouping_properties: Vec<GroupByPropertyNode>,
    child_transformation: Option<Rc<TransformationNode>>,
    grouping_item_shape: ItemShape,
    item_shape: ItemShape,
}

impl GroupByTransformationNode {
    /// The optional child must be an aggregate stage; its aliases are added
    /// to the grouping shape and must not repeat a grouping name.
    pub fn new(
        source: TransformationSource,
        grouping_properties: Vec<GroupByPropertyNode>,
        child_transformation: Option<TransformationNode>,
    ) -> Result<Self> {
        if grouping_properties.is_empty() {
            return Err(SemanticError::ArgumentNullOrEmpty("grouping_properties"));
        }
        let grouping_item_shape = ItemShape::of(None).with_properties(
            grouping_properties
                .iter()
                .map(GroupByPropertyNode::to_shape_property),
        );
        let item_shape = match &child_transformation {
            None => grouping_item_shape.clone(),
            Some(TransformationNode::Aggregate(aggregate)) => {
                let grouped = grouping_properties.iter().map(GroupByPropertyNode::name);
                let aliases = aggregate.expressions().iter().map(|e| e.alias());
                ensure_unique_aliases(grouped.chain(aliases))?;
                grouping_item_shape
                    .clone()
                    .with_properties(aggregate.item_shape().dynamic.iter().cloned())
            }
            Some(other) => {
                debug!(child = ?other.kind(), "groupby child is not an aggregate");
                return Err(SemanticError::InvalidAggregation(format!(
                    "groupby child transformation must be aggregate, got {:?}",
                    other.kind()
                )));
            }
        };
        Ok(GroupByTransformationNode {
            source,
            grouping_properties,
            child_transformation: child_transformation.map(Rc::new),
            grouping_item_shape,
            item_shape,
        })
    }

    pub fn source(&self) -> &TransformationSource {
        &self.source
    }

    pub fn grouping_properties(&self) -> &[GroupByPropertyNode] {
        &self.grouping_properties
    }

    pub fn child_transformation(&self) -> Option<&Rc<TransformationNode>> {
        self.child_transformation.as_ref()
    }

    /// Shape after grouping, before the child aggregate.
    pub fn grouping_item_shape(&self) -> &ItemShape {
        &self.grouping_item_shape
    }

    /// Shape after grouping and the child aggregate.
    pub fn item_shape(&self) -> &ItemShape {
        &self.item_shape
    }
}
