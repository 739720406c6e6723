//! # Metadata vocabulary
//!
//! The semantic tree is bound to a metadata model but never owns it. Nodes
//! keep lightweight handles ([`StructuredTypeId`], [`PropertyId`],
//! [`NavigationSourceId`], ...) and type references ([`TypeRef`]); the
//! [`EdmModel`] oracle answers every question a constructor needs to ask:
//!
//! - what kind of property a handle names, its type and multiplicity
//! - which navigation source a navigation property leads to
//! - whether two structured types are related by inheritance
//! - which overloads an operation name resolves to
//!
//! [`InMemoryModel`] is a small, vector-backed oracle with a builder API.
pub mod memory;
pub mod model;
pub mod types;

pub use memory::InMemoryModel;
pub use model::{
    BindingPath, EdmModel, EntitySetExpression, EnumTypeDef, Multiplicity, NavigationSourceDef,
    NavigationSourceKind, OperationDef, OperationImportDef, OperationKind, OperationParameter,
    PropertyDef, PropertyKind, StructuredKind, StructuredTypeDef,
};
pub use types::{
    EdmType, EnumTypeId, NavigationSourceId, OperationId, OperationImportId, PrimitiveKind,
    PropertyId, StructuredTypeId, TypeRef,
};
