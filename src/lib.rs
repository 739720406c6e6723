//! Strongly typed semantic tree for OData query URIs.
//!
//! A binder resolves the syntax of a request URI against an [`edm::EdmModel`]
//! and builds the trees in this crate bottom-up: [`path::ODataPath`] for the
//! resource path, [`nodes`] for `$filter`/`$orderby`/`$search`/`$compute`,
//! [`apply`] for `$apply` and [`select_expand`] for `$select`/`$expand`.
//! Consumers walk the trees with the traits in [`visitor`].

pub mod apply;
#[cfg(feature = "json")]
pub mod dump;
pub mod edm;
pub mod error;
pub mod nodes;
pub mod path;
pub mod select_expand;
pub mod value;
pub mod visitor;

pub use error::{PathKind, Result, SemanticError};
pub use value::ODataValue;
