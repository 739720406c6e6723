use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use crate::edm::TypeRef;
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::{RangeVariable, SingleValueNode};

/// A bound `$filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    expression: Rc<SingleValueNode>,
    range_variable: Rc<RangeVariable>,
}

impl FilterClause {
    /// The expression must be boolean (or of unknown type).
    pub fn new(expression: Rc<SingleValueNode>, range_variable: Rc<RangeVariable>) -> Result<Self> {
        if let Some(t) = expression.type_reference()
            && !t.is_boolean()
            && !t.is_untyped()
        {
            debug!(expression_type = %t.definition, "filter expression is not boolean");
            return Err(SemanticError::TypeMismatch {
                expected: "Edm.Boolean".to_string(),
                actual: t.definition.to_string(),
            });
        }
        Ok(FilterClause {
            expression,
            range_variable,
        })
    }

    pub fn expression(&self) -> &Rc<SingleValueNode> {
        &self.expression
    }

    pub fn range_variable(&self) -> &Rc<RangeVariable> {
        &self.range_variable
    }

    /// Type of the filtered items.
    pub fn item_type(&self) -> Option<&TypeRef> {
        self.range_variable.type_reference()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderByDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            OrderByDirection::Ascending => "asc",
            OrderByDirection::Descending => "desc",
        }
    }
}

/// One `$orderby` key, linked to the keys that break its ties.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    expression: Rc<SingleValueNode>,
    direction: OrderByDirection,
    range_variable: Rc<RangeVariable>,
    then_by: Option<Box<OrderByClause>>,
}

impl OrderByClause {
    pub fn new(
        then_by: Option<OrderByClause>,
        expression: Rc<SingleValueNode>,
        direction: OrderByDirection,
        range_variable: Rc<RangeVariable>,
    ) -> Self {
        OrderByClause {
            expression,
            direction,
            range_variable,
            then_by: then_by.map(Box::new),
        }
    }

    pub fn expression(&self) -> &Rc<SingleValueNode> {
        &self.expression
    }

    pub fn direction(&self) -> OrderByDirection {
        self.direction
    }

    pub fn range_variable(&self) -> &Rc<RangeVariable> {
        &self.range_variable
    }

    pub fn then_by(&self) -> Option<&OrderByClause> {
        self.then_by.as_deref()
    }

    /// This key followed by every tie breaker.
    pub fn iter(&self) -> impl Iterator<Item = &OrderByClause> {
        std::iter::successors(Some(self), |clause| clause.then_by())
    }
}

/// A bound `$search`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchClause {
    expression: Rc<SingleValueNode>,
}

impl SearchClause {
    pub fn new(expression: Rc<SingleValueNode>) -> Self {
        SearchClause { expression }
    }

    pub fn expression(&self) -> &Rc<SingleValueNode> {
        &self.expression
    }
}

/// `expression as alias` inside `$compute` or the `compute()` transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeExpression {
    expression: Rc<SingleValueNode>,
    alias: String,
    type_ref: Option<TypeRef>,
}

impl ComputeExpression {
    /// Without an explicit type the expression's type is used.
    pub fn new(expression: Rc<SingleValueNode>, alias: &str, type_ref: Option<TypeRef>) -> Result<Self> {
        require_non_empty(alias, "alias")?;
        let type_ref = type_ref.or_else(|| expression.type_reference().cloned());
        Ok(ComputeExpression {
            expression,
            alias: alias.to_string(),
            type_ref,
        })
    }

    pub fn expression(&self) -> &Rc<SingleValueNode> {
        &self.expression
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// A bound `$compute`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeClause {
    expressions: Vec<ComputeExpression>,
}

impl ComputeClause {
    /// Fails with `DuplicateAlias` when two expressions share an alias.
    pub fn new(expressions: Vec<ComputeExpression>) -> Result<Self> {
        ensure_unique_aliases(expressions.iter().map(ComputeExpression::alias))?;
        Ok(ComputeClause { expressions })
    }

    pub fn expressions(&self) -> &[ComputeExpression] {
        &self.expressions
    }
}

/// `$levels=n` or `$levels=max` on an expanded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelsClause {
    pub is_max_level: bool,
    pub level: i64,
}

impl LevelsClause {
    pub fn new(is_max_level: bool, level: i64) -> Self {
        LevelsClause {
            is_max_level,
            level,
        }
    }

    pub fn max() -> Self {
        LevelsClause::new(true, i64::MAX)
    }
}

pub(crate) fn ensure_unique_aliases<'a>(aliases: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for alias in aliases {
        if !seen.insert(alias) {
            debug!(alias, "duplicate alias");
            return Err(SemanticError::DuplicateAlias(alias.to_string()));
        }
    }
    Ok(())
}
