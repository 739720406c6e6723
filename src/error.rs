//! Errors raised while constructing semantic nodes.
//!
//! Every constructor in this crate either returns a fully built node or one of
//! these errors; there is no partially built node.

use thiserror::Error;

/// Which path grammar rejected a segment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// `$expand` path.
    Expand,
    /// `$select` path.
    Select,
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathKind::Expand => write!(f, "expand"),
            PathKind::Select => write!(f, "select"),
        }
    }
}

/// Errors that can occur while building the semantic tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// A required argument was empty.
    #[error("argument `{0}` must not be null or empty")]
    ArgumentNullOrEmpty(&'static str),

    /// A metadata handle did not resolve against the model.
    #[error("unresolved metadata: {0}")]
    UnresolvedMetadata(String),

    /// The property is of the wrong kind for the node being built.
    #[error("property `{property}` must be a {expected}")]
    InvalidPropertyKind {
        /// Property name.
        property: String,
        /// What the node requires.
        expected: &'static str,
    },

    /// The property's type is (or is not) a collection, contrary to the node.
    #[error("property `{property}` {}", collection_expectation(.expected_collection))]
    CollectionMismatch {
        /// Property name.
        property: String,
        /// Whether the node expects a collection-valued property.
        expected_collection: bool,
    },

    /// The navigation property's target multiplicity does not fit the node.
    #[error("navigation property `{property}` has multiplicity {actual}, expected {expected}")]
    MultiplicityMismatch {
        /// Navigation property name.
        property: String,
        /// Required multiplicity description.
        expected: &'static str,
        /// Actual multiplicity.
        actual: String,
    },

    /// Two types are not compatible.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: String,
        /// The actual type.
        actual: String,
    },

    /// A cast or key type is not related to the source type.
    #[error("type `{actual}` is not related to `{expected}`")]
    UnrelatedTypes {
        /// The type of the navigation source or cast source.
        expected: String,
        /// The offending type.
        actual: String,
    },

    /// A function call declares a return type the node cannot carry.
    #[error("`{node}` cannot return `{type_name}`")]
    InvalidReturnType {
        /// Node kind.
        node: &'static str,
        /// Offending type name.
        type_name: String,
    },

    /// An item type is not allowed for the node.
    #[error("`{node}` requires {expected} items, got `{type_name}`")]
    InvalidItemType {
        /// Node kind.
        node: &'static str,
        /// What the node requires.
        expected: &'static str,
        /// Offending type name.
        type_name: String,
    },

    /// A path does not fit the `$expand` or `$select` grammar.
    #[error("invalid {kind} path: segment `{segment}` at position {position}: {reason}")]
    InvalidPath {
        /// Which grammar failed.
        kind: PathKind,
        /// Kind of the offending segment.
        segment: &'static str,
        /// Zero-based segment position.
        position: usize,
        /// Rule that was violated.
        reason: &'static str,
    },

    /// A batch content id does not match the lexical rule.
    #[error("malformed content id `{0}`")]
    MalformedContentId(String),

    /// Operation overloads disagree on their return type.
    #[error("overloads of `{0}` have different return types")]
    AmbiguousOverloads(String),

    /// An alias was declared twice in the same stage.
    #[error("alias `{0}` is declared more than once")]
    DuplicateAlias(String),

    /// An aggregate statement is not valid for its expression.
    #[error("invalid aggregation: {0}")]
    InvalidAggregation(String),

    /// A valid input this release does not support.
    #[error("not supported in this release: {0}")]
    NotSupported(String),

    /// A path segment was rejected.
    #[error("invalid segment: {0}")]
    InvalidSegment(String),
}

fn collection_expectation(expected_collection: &bool) -> &'static str {
    if *expected_collection {
        "must be a collection"
    } else {
        "must not be a collection"
    }
}

/// Result type for semantic tree construction.
pub type Result<T> = std::result::Result<T, SemanticError>;

/// Returns `ArgumentNullOrEmpty` when `value` is empty.
pub(crate) fn require_non_empty(value: &str, name: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(SemanticError::ArgumentNullOrEmpty(name));
    }
    Ok(())
}
