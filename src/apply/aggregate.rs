use std::rc::Rc;

use tracing::debug;

use crate::apply::{ItemShape, ShapeProperty, TransformationSource};
use crate::edm::{PrimitiveKind, TypeRef};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::{SingleValueNode, ensure_unique_aliases};

/// Aggregation verb of `aggregate(expr with verb as alias)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregationMethod {
    Sum,
    Min,
    Max,
    Average,
    CountDistinct,
    /// `$count as alias`.
    VirtualPropertyCount,
    /// A custom aggregation method, by qualified name.
    Custom(String),
}

impl AggregationMethod {
    pub fn keyword(&self) -> &str {
        match self {
            AggregationMethod::Sum => "sum",
            AggregationMethod::Min => "min",
            AggregationMethod::Max => "max",
            AggregationMethod::Average => "average",
            AggregationMethod::CountDistinct => "countdistinct",
            AggregationMethod::VirtualPropertyCount => "$count",
            AggregationMethod::Custom(name) => name,
        }
    }

    /// Result type of the verb over `input`.
    fn result_type(&self, input: Option<&TypeRef>) -> Option<TypeRef> {
        let nullable = input.is_none_or(|t| t.nullable);
        let kind = input.and_then(TypeRef::primitive_kind);
        match self {
            AggregationMethod::CountDistinct | AggregationMethod::VirtualPropertyCount => {
                Some(TypeRef::int64())
            }
            AggregationMethod::Min | AggregationMethod::Max => input.cloned(),
            AggregationMethod::Sum => kind.map(|k| {
                let widened = match k {
                    k if k.is_integral() => PrimitiveKind::Int64,
                    PrimitiveKind::Single => PrimitiveKind::Double,
                    other => other,
                };
                TypeRef::primitive(widened, nullable)
            }),
            AggregationMethod::Average => kind.map(|k| {
                let result = if k == PrimitiveKind::Decimal {
                    PrimitiveKind::Decimal
                } else {
                    PrimitiveKind::Double
                };
                TypeRef::primitive(result, nullable)
            }),
            AggregationMethod::Custom(_) => None,
        }
    }
}

/// One `expression with method as alias` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateExpression {
    expression: Rc<SingleValueNode>,
    method: AggregationMethod,
    from: Option<Rc<SingleValueNode>>,
    alias: String,
    type_ref: Option<TypeRef>,
}

impl AggregateExpression {
    /// Without an explicit `type_ref` the result type is inferred from the
    /// verb: counts are `Edm.Int64`, `min`/`max` keep the input type, `sum`
    /// widens integers to `Edm.Int64` and `average` yields `Edm.Double` (or
    /// `Edm.Decimal` for decimal input).
    pub fn new(
        expression: Rc<SingleValueNode>,
        method: AggregationMethod,
        alias: &str,
        type_ref: Option<TypeRef>,
    ) -> Result<Self> {
        require_non_empty(alias, "alias")?;
        let input = expression.type_reference();
        match &method {
            AggregationMethod::Sum | AggregationMethod::Average => {
                if let Some(t) = input
                    && !t.is_untyped()
                    && !t.primitive_kind().is_some_and(|k| k.is_numeric())
                {
                    debug!(alias, method = method.keyword(), input = %t.definition, "non-numeric aggregation input");
                    return Err(SemanticError::InvalidAggregation(format!(
                        "`{}` requires a numeric expression, got {}",
                        method.keyword(),
                        t.definition
                    )));
                }
            }
            AggregationMethod::VirtualPropertyCount => {
                if !matches!(expression.as_ref(), SingleValueNode::CountVirtualProperty(_)) {
                    return Err(SemanticError::InvalidAggregation(format!(
                        "`$count as {alias}` must aggregate the $count virtual property"
                    )));
                }
            }
            AggregationMethod::Custom(name) => require_non_empty(name, "method")?,
            _ => {}
        }
        let type_ref = type_ref.or_else(|| method.result_type(input));
        Ok(AggregateExpression {
            expression,
            method,
            from: None,
            alias: alias.to_string(),
            type_ref,
        })
    }

    /// Aggregates per value of `from` first, e.g. `Amount with sum from Time
    /// with average as DailyAverage`.
    pub fn with_from(mut self, from: Rc<SingleValueNode>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn expression(&self) -> &Rc<SingleValueNode> {
        &self.expression
    }

    pub fn method(&self) -> &AggregationMethod {
        &self.method
    }

    pub fn from(&self) -> Option<&Rc<SingleValueNode>> {
        self.from.as_ref()
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// `aggregate(...)`: replaces each input set by one item holding the
/// aggregate values.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTransformationNode {
    source: TransformationSource,
    expressions: Vec<AggregateExpression>,
    item_shape: ItemShape,
}

impl AggregateTransformationNode {
    /// Fails on an empty statement list or when two statements share an
    /// alias.
    pub fn new(source: TransformationSource, expressions: Vec<AggregateExpression>) -> Result<Self> {
        if expressions.is_empty() {
            return Err(SemanticError::ArgumentNullOrEmpty("expressions"));
        }
        ensure_unique_aliases(expressions.iter().map(AggregateExpression::alias))?;
        let item_shape = ItemShape::of(None).with_properties(
            expressions
                .iter()
                .map(|e| ShapeProperty::new(e.alias(), e.type_reference().cloned())),
        );
        Ok(AggregateTransformationNode {
            source,
            expressions,
            item_shape,
        })
    }

    pub fn source(&self) -> &TransformationSource {
        &self.source
    }

    pub fn expressions(&self) -> &[AggregateExpression] {
        &self.expressions
    }

    pub fn item_shape(&self) -> &ItemShape {
        &self.item_shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_widens_integers() {
        let input = TypeRef::primitive(PrimitiveKind::Int32, false);
        assert_eq!(
            AggregationMethod::Sum.result_type(Some(&input)),
            Some(TypeRef::primitive(PrimitiveKind::Int64, false))
        );
    }

    #[test]
    fn test_average_of_decimal_stays_decimal() {
        let input = TypeRef::primitive(PrimitiveKind::Decimal, true);
        assert_eq!(
            AggregationMethod::Average.result_type(Some(&input)),
            Some(TypeRef::primitive(PrimitiveKind::Decimal, true))
        );
        let input = TypeRef::primitive(PrimitiveKind::Int16, true);
        assert_eq!(
            AggregationMethod::Average.result_type(Some(&input)),
            Some(TypeRef::primitive(PrimitiveKind::Double, true))
        );
    }

    #[test]
    fn test_count_distinct_is_int64() {
        assert_eq!(
            AggregationMethod::CountDistinct.result_type(None),
            Some(TypeRef::int64())
        );
    }
}
