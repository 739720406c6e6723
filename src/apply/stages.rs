use crate::apply::{ItemShape, ShapeProperty, TransformationSource};
use crate::error::{Result, SemanticError};
use crate::nodes::{ComputeExpression, FilterClause, ensure_unique_aliases};

/// `filter(expression)`: keeps the input shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTransformationNode {
    source: TransformationSource,
    filter: FilterClause,
    item_shape: ItemShape,
}

impl FilterTransformationNode {
    pub fn new(source: TransformationSource, filter: FilterClause) -> Self {
        let item_shape = source.input_shape();
        FilterTransformationNode {
            source,
            filter,
            item_shape,
        }
    }

    pub fn source(&self) -> &TransformationSource {
        &self.source
    }

    pub fn filter(&self) -> &FilterClause {
        &self.filter
    }

    pub fn item_shape(&self) -> &ItemShape {
        &self.item_shape
    }
}

/// `compute(expression as alias, ...)`: adds the aliases to the input shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeTransformationNode {
    source: TransformationSource,
    expressions: Vec<ComputeExpression>,
    item_shape: ItemShape,
}

impl ComputeTransformationNode {
    pub fn new(source: TransformationSource, expressions: Vec<ComputeExpression>) -> Result<Self> {
        if expressions.is_empty() {
            return Err(SemanticError::ArgumentNullOrEmpty("expressions"));
        }
        ensure_unique_aliases(expressions.iter().map(ComputeExpression::alias))?;
        let item_shape = source.input_shape().with_properties(
            expressions
                .iter()
                .map(|e| ShapeProperty::new(e.alias(), e.type_reference().cloned())),
        );
        Ok(ComputeTransformationNode {
            source,
            expressions,
            item_shape,
        })
    }

    pub fn source(&self) -> &TransformationSource {
        &self.source
    }

    pub fn expressions(&self) -> &[ComputeExpression] {
        &self.expressions
    }

    pub fn item_shape(&self) -> &ItemShape {
        &self.item_shape
    }
}
