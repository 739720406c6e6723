use tracing::debug;

use crate::edm::{
    EdmModel, Multiplicity, PropertyDef, PropertyId, StructuredKind, StructuredTypeId, TypeRef,
};
use crate::error::{Result, SemanticError};

/// Looks up `property` and rejects navigation properties.
pub(crate) fn structural_property<'m>(
    model: &'m dyn EdmModel,
    property: PropertyId,
    node: &'static str,
) -> Result<&'m PropertyDef> {
    let def = model.require_property(property)?;
    if def.is_navigation() {
        debug!(node, property = %def.name, "navigation property used as structural property");
        return Err(SemanticError::InvalidPropertyKind {
            property: def.name.clone(),
            expected: "non-entity structural property",
        });
    }
    Ok(def)
}

/// Rejects a property whose collection-ness differs from `expected`.
pub(crate) fn collection_property(def: &PropertyDef, expected: bool, node: &'static str) -> Result<()> {
    if def.type_ref.is_collection() != expected {
        debug!(node, property = %def.name, expected, "property collection-ness mismatch");
        return Err(SemanticError::CollectionMismatch {
            property: def.name.clone(),
            expected_collection: expected,
        });
    }
    Ok(())
}

/// Looks up a navigation property and checks its multiplicity.
pub(crate) fn navigation_property<'m>(
    model: &'m dyn EdmModel,
    property: PropertyId,
    collection: bool,
    node: &'static str,
) -> Result<&'m PropertyDef> {
    let def = model.require_property(property)?;
    let Some(multiplicity) = def.multiplicity() else {
        debug!(node, property = %def.name, "structural property used as navigation property");
        return Err(SemanticError::InvalidPropertyKind {
            property: def.name.clone(),
            expected: "navigation property",
        });
    };
    let fits = if collection {
        multiplicity == Multiplicity::Many
    } else {
        multiplicity != Multiplicity::Many
    };
    if !fits {
        debug!(node, property = %def.name, %multiplicity, "navigation multiplicity mismatch");
        return Err(SemanticError::MultiplicityMismatch {
            property: def.name.clone(),
            expected: if collection { "*" } else { "0..1 or 1" },
            actual: multiplicity.to_string(),
        });
    }
    Ok(def)
}

/// Rejects a structured target type unrelated to the source type.
pub(crate) fn related_types(
    model: &dyn EdmModel,
    source: StructuredTypeId,
    target: StructuredTypeId,
) -> Result<()> {
    if !model.are_related(source, target) {
        let expected = model.type_name(&crate::edm::EdmType::Entity(source));
        let actual = model.type_name(&crate::edm::EdmType::Entity(target));
        debug!(%expected, %actual, "unrelated structured types");
        return Err(SemanticError::UnrelatedTypes { expected, actual });
    }
    Ok(())
}

/// Type reference of a structured type, entity or complex after its
/// definition.
pub(crate) fn structured_type_ref(
    model: &dyn EdmModel,
    id: StructuredTypeId,
    nullable: bool,
) -> Result<TypeRef> {
    let def = model.require_structured_type(id)?;
    Ok(match def.kind {
        StructuredKind::Entity => TypeRef::entity(id, nullable),
        StructuredKind::Complex => TypeRef::complex(id, nullable),
    })
}

/// True when a value of `from` may be used where `to` is expected.
///
/// Untyped references are compatible with everything; structured types must
/// be related by inheritance.
pub(crate) fn is_assignable(model: Option<&dyn EdmModel>, from: &TypeRef, to: &TypeRef) -> bool {
    use crate::edm::EdmType::*;
    match (&from.definition, &to.definition) {
        (Untyped | Unknown, _) | (_, Untyped | Unknown) => true,
        (Primitive(a), Primitive(b)) => a.is_assignable_to(*b),
        (Enum(a), Enum(b)) => a == b,
        (Entity(a), Entity(b)) | (Complex(a), Complex(b)) => match model {
            Some(model) => model.is_derived_from(*a, *b),
            None => a == b,
        },
        (Collection(a), Collection(b)) => is_assignable(model, a, b),
        _ => false,
    }
}
