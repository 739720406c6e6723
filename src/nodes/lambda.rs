use std::rc::Rc;

use tracing::debug;

use crate::edm::TypeRef;
use crate::error::{Result, SemanticError};
use crate::nodes::{CollectionNode, RangeVariable, SingleValueNode};

/// State shared by `any` and `all`.
#[derive(Debug, Clone, PartialEq)]
struct Lambda {
    range_variables: Vec<Rc<RangeVariable>>,
    current_range_variable: Option<Rc<RangeVariable>>,
    body: Rc<SingleValueNode>,
    source: Rc<CollectionNode>,
    type_ref: TypeRef,
}

impl Lambda {
    fn new(
        operator: &'static str,
        range_variables: Vec<Rc<RangeVariable>>,
        current_range_variable: Option<Rc<RangeVariable>>,
        body: Rc<SingleValueNode>,
        source: Rc<CollectionNode>,
    ) -> Result<Self> {
        if let Some(body_type) = body.type_reference()
            && !body_type.is_boolean()
            && !body_type.is_untyped()
        {
            debug!(operator, body_type = %body_type.definition, "lambda body is not boolean");
            return Err(SemanticError::TypeMismatch {
                expected: "Edm.Boolean".to_string(),
                actual: body_type.definition.to_string(),
            });
        }
        Ok(Lambda {
            range_variables,
            current_range_variable,
            body,
            source,
            type_ref: TypeRef::boolean(),
        })
    }
}

macro_rules! lambda_node {
    ($(#[$doc:meta])* $node:ident, $operator:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $node {
            lambda: Lambda,
        }

        impl $node {
            /// `range_variables` are all variables in scope, outermost
            /// first; `current_range_variable` is the one this lambda
            /// introduces.
            pub fn new(
                range_variables: Vec<Rc<RangeVariable>>,
                current_range_variable: Option<Rc<RangeVariable>>,
                body: Rc<SingleValueNode>,
                source: Rc<CollectionNode>,
            ) -> Result<Self> {
                Ok($node {
                    lambda: Lambda::new(
                        $operator,
                        range_variables,
                        current_range_variable,
                        body,
                        source,
                    )?,
                })
            }

            pub fn range_variables(&self) -> &[Rc<RangeVariable>] {
                &self.lambda.range_variables
            }

            pub fn current_range_variable(&self) -> Option<&Rc<RangeVariable>> {
                self.lambda.current_range_variable.as_ref()
            }

            pub fn body(&self) -> &Rc<SingleValueNode> {
                &self.lambda.body
            }

            pub fn source(&self) -> &Rc<CollectionNode> {
                &self.lambda.source
            }

            /// Always `Edm.Boolean`.
            pub fn type_reference(&self) -> &TypeRef {
                &self.lambda.type_ref
            }
        }
    };
}

lambda_node!(
    /// `source/any(x: body)`.
    AnyNode,
    "any"
);

lambda_node!(
    /// `source/all(x: body)`.
    AllNode,
    "all"
);
