//! # `$apply` transformations
//!
//! A `$apply` pipeline is an ordered list of stages. The first stage reads a
//! bound collection; every later stage reads the stage before it. Each stage
//! reports the [`ItemShape`] of the items it produces so the next stage (and
//! the binder of later clauses) knows which properties exist.
//!
//! - **[stages]** - `filter(...)` and `compute(...)`
//! - **[group_by]** - `groupby((...), aggregate(...))`
//! - **[aggregate]** - `aggregate(...)` statements and verbs
//! - **[shape]** - the item shape flowing between stages

pub mod aggregate;
pub mod group_by;
pub mod shape;
pub mod stages;

use std::rc::Rc;

pub use aggregate::{AggregateExpression, AggregateTransformationNode, AggregationMethod};
pub use group_by::{GroupByPropertyNode, GroupByTransformationNode};
pub use shape::{ItemShape, ShapeProperty};
pub use stages::{ComputeTransformationNode, FilterTransformationNode};

use crate::nodes::CollectionNode;

/// Discriminant of [`TransformationNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformationNodeKind {
    Filter,
    GroupBy,
    Aggregate,
    Compute,
}

/// Where a stage reads its items from.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformationSource {
    /// The bound collection the pipeline starts on.
    Collection(Rc<CollectionNode>),
    /// The previous stage.
    Stage(Rc<TransformationNode>),
}

impl TransformationSource {
    /// Shape of the items this source yields.
    pub fn input_shape(&self) -> ItemShape {
        match self {
            TransformationSource::Collection(collection) => {
                ItemShape::of(collection.item_type().cloned())
            }
            TransformationSource::Stage(stage) => stage.item_shape().clone(),
        }
    }

    /// The collection at the root of the pipeline.
    pub fn root_collection(&self) -> &Rc<CollectionNode> {
        match self {
            TransformationSource::Collection(collection) => collection,
            TransformationSource::Stage(stage) => stage.source().root_collection(),
        }
    }
}

impl From<Rc<CollectionNode>> for TransformationSource {
    fn from(collection: Rc<CollectionNode>) -> Self {
        TransformationSource::Collection(collection)
    }
}

impl From<Rc<TransformationNode>> for TransformationSource {
    fn from(stage: Rc<TransformationNode>) -> Self {
        TransformationSource::Stage(stage)
    }
}

/// One `$apply` stage.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformationNode {
    Filter(FilterTransformationNode),
    GroupBy(GroupByTransformationNode),
    Aggregate(AggregateTransformationNode),
    Compute(ComputeTransformationNode),
}

impl TransformationNode {
    pub fn kind(&self) -> TransformationNodeKind {
        match self {
            TransformationNode::Filter(_) => TransformationNodeKind::Filter,
            TransformationNode::GroupBy(_) => TransformationNodeKind::GroupBy,
            TransformationNode::Aggregate(_) => TransformationNodeKind::Aggregate,
            TransformationNode::Compute(_) => TransformationNodeKind::Compute,
        }
    }

    pub fn source(&self) -> &TransformationSource {
        match self {
            TransformationNode::Filter(node) => node.source(),
            TransformationNode::GroupBy(node) => node.source(),
            TransformationNode::Aggregate(node) => node.source(),
            TransformationNode::Compute(node) => node.source(),
        }
    }

    /// Shape of the items this stage produces.
    pub fn item_shape(&self) -> &ItemShape {
        match self {
            TransformationNode::Filter(node) => node.item_shape(),
            TransformationNode::GroupBy(node) => node.item_shape(),
            TransformationNode::Aggregate(node) => node.item_shape(),
            TransformationNode::Compute(node) => node.item_shape(),
        }
    }
}

macro_rules! transformation_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for TransformationNode {
                fn from(node: $ty) -> Self {
                    TransformationNode::$variant(node)
                }
            }
        )*
    };
}

transformation_from!(
    Filter(FilterTransformationNode),
    GroupBy(GroupByTransformationNode),
    Aggregate(AggregateTransformationNode),
    Compute(ComputeTransformationNode),
);

/// The ordered stages of one `$apply` option.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplyClause {
    transformations: Vec<Rc<TransformationNode>>,
}

impl ApplyClause {
    pub fn new(transformations: Vec<Rc<TransformationNode>>) -> Self {
        ApplyClause { transformations }
    }

    pub fn transformations(&self) -> &[Rc<TransformationNode>] {
        &self.transformations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<TransformationNode>> {
        self.transformations.iter()
    }

    pub fn last_stage(&self) -> Option<&Rc<TransformationNode>> {
        self.transformations.last()
    }

    /// Shape after the last stage, `None` for an empty pipeline.
    pub fn item_shape(&self) -> Option<&ItemShape> {
        self.last_stage().map(|stage| stage.item_shape())
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }
}
