use crate::edm::TypeRef;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    // Logical
    /// `or`
    Or,
    /// `and`
    And,

    // Comparison
    /// `eq`
    Equal,
    /// `ne`
    NotEqual,
    /// `gt`
    GreaterThan,
    /// `ge`
    GreaterThanOrEqual,
    /// `lt`
    LessThan,
    /// `le`
    LessThanOrEqual,
    /// `has` (enum flags)
    Has,

    // Arithmetic
    /// `add`
    Add,
    /// `sub`
    Subtract,
    /// `mul`
    Multiply,
    /// `div`
    Divide,
    /// `mod`
    Modulo,
}

impl BinaryOperatorKind {
    /// URI keyword of the operator.
    pub fn keyword(&self) -> &'static str {
        use BinaryOperatorKind::*;
        match self {
            Or => "or",
            And => "and",
            Equal => "eq",
            NotEqual => "ne",
            GreaterThan => "gt",
            GreaterThanOrEqual => "ge",
            LessThan => "lt",
            LessThanOrEqual => "le",
            Has => "has",
            Add => "add",
            Subtract => "sub",
            Multiply => "mul",
            Divide => "div",
            Modulo => "mod",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperatorKind::Or | BinaryOperatorKind::And)
    }

    /// Comparison operators, `has` included.
    pub fn is_comparison(&self) -> bool {
        use BinaryOperatorKind::*;
        matches!(
            self,
            Equal | NotEqual | GreaterThan | GreaterThanOrEqual | LessThan | LessThanOrEqual | Has
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        !self.is_logical() && !self.is_comparison()
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperatorKind {
    /// `-`
    Negate,
    /// `not`
    Not,
}

impl UnaryOperatorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            UnaryOperatorKind::Negate => "-",
            UnaryOperatorKind::Not => "not",
        }
    }
}

/// Result type of `left op right`.
///
/// Operands are expected to have been promoted to a common type already;
/// arithmetic keeps the left operand's type. An untyped left operand (null
/// literal, open property) yields no type for arithmetic.
pub(crate) fn binary_result_type(
    op: BinaryOperatorKind,
    left: Option<&TypeRef>,
    right: Option<&TypeRef>,
) -> Option<TypeRef> {
    let nullable = left.is_none_or(|t| t.nullable) || right.is_none_or(|t| t.nullable);
    if op.is_logical() || op.is_comparison() {
        return Some(TypeRef::boolean().with_nullable(nullable));
    }
    left.map(|t| t.with_nullable(nullable))
}
