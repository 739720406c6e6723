use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::edm::TypeRef;
use crate::error::{Result, require_non_empty};
use crate::nodes::QueryNode;

/// Reference to a parameter alias such as `@p1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAliasNode {
    alias: String,
    type_ref: Option<TypeRef>,
}

impl ParameterAliasNode {
    /// `type_ref` is the type of the aliased value when the binder could
    /// resolve it.
    pub fn new(alias: &str, type_ref: Option<TypeRef>) -> Result<Self> {
        require_non_empty(alias, "alias")?;
        Ok(ParameterAliasNode {
            alias: alias.to_string(),
            type_ref,
        })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn type_reference(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// Raw alias values from the query string and their bound nodes.
///
/// Each alias is bound at most once; later lookups return the cached node.
#[derive(Debug, Clone, Default)]
pub struct ParameterAliasValueAccessor {
    expressions: HashMap<String, String>,
    bound: RefCell<HashMap<String, Option<Rc<QueryNode>>>>,
}

impl ParameterAliasValueAccessor {
    pub fn new(expressions: HashMap<String, String>) -> Self {
        ParameterAliasValueAccessor {
            expressions,
            bound: RefCell::new(HashMap::new()),
        }
    }

    /// Unparsed value text of `alias`.
    pub fn value_expression(&self, alias: &str) -> Option<&str> {
        self.expressions.get(alias).map(String::as_str)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.expressions.keys().map(String::as_str)
    }

    /// The bound node of `alias`, if it has been bound already.
    pub fn bound_value(&self, alias: &str) -> Option<Rc<QueryNode>> {
        self.bound.borrow().get(alias).cloned().flatten()
    }

    /// Binds `alias` with `bind` on first use and caches the result.
    ///
    /// An alias without a value in the query string resolves to `None`
    /// without calling `bind`. A failing `bind` caches nothing.
    pub fn resolve_with<F>(&self, alias: &str, bind: F) -> Result<Option<Rc<QueryNode>>>
    where
        F: FnOnce(&str) -> Result<Option<QueryNode>>,
    {
        if let Some(cached) = self.bound.borrow().get(alias) {
            return Ok(cached.clone());
        }
        let node = match self.expressions.get(alias) {
            Some(text) => bind(text)?.map(Rc::new),
            None => None,
        };
        trace!(alias, bound = node.is_some(), "caching parameter alias value");
        self.bound
            .borrow_mut()
            .insert(alias.to_string(), node.clone());
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::nodes::{ConstantNode, SingleValueNode};
    use crate::value::ODataValue;

    fn accessor() -> ParameterAliasValueAccessor {
        let mut expressions = HashMap::new();
        expressions.insert("@p".to_string(), "42".to_string());
        ParameterAliasValueAccessor::new(expressions)
    }

    fn bind_int(text: &str) -> Result<Option<QueryNode>> {
        let value = text.parse::<i32>().map(ODataValue::Int32).unwrap_or(ODataValue::Null);
        Ok(Some(QueryNode::Single(SingleValueNode::Constant(ConstantNode::new(value)))))
    }

    #[test]
    fn test_alias_is_bound_once() {
        let accessor = accessor();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let node = accessor
                .resolve_with("@p", |text| {
                    calls.set(calls.get() + 1);
                    bind_int(text)
                })
                .unwrap();
            assert!(node.is_some());
        }
        assert_eq!(calls.get(), 1);
        assert!(accessor.bound_value("@p").is_some());
    }

    #[test]
    fn test_unknown_alias_resolves_to_none() {
        let accessor = accessor();
        let node = accessor
            .resolve_with("@missing", |_| panic!("must not bind"))
            .unwrap();
        assert!(node.is_none());
    }

    #[test]
    fn test_empty_alias_name_rejected() {
        assert!(ParameterAliasNode::new("", None).is_err());
    }
}
