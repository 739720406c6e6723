use tracing::debug;

use crate::edm::{EdmModel, EdmType, NavigationSourceId, PrimitiveKind, PropertyId};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::path::TargetKind;
use crate::path::segment::SegmentInfo;

/// A declared structural property, e.g. `Name` or `Address`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySegment {
    property: PropertyId,
    info: SegmentInfo,
}

impl PropertySegment {
    pub fn new(model: &dyn EdmModel, property: PropertyId) -> Result<Self> {
        let def = model.require_property(property)?;
        if def.is_navigation() {
            debug!(property = %def.name, "navigation property used as property segment");
            return Err(SemanticError::InvalidPropertyKind {
                property: def.name.clone(),
                expected: "structural property",
            });
        }
        Ok(PropertySegment {
            property,
            info: SegmentInfo::typed(def.name.clone(), def.type_ref.definition.clone(), None),
        })
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }
}

/// An undeclared property of an open type.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicPathSegment {
    info: SegmentInfo,
}

impl DynamicPathSegment {
    /// `edm_type` is `None` when nothing is known about the value.
    pub fn new(
        identifier: &str,
        edm_type: Option<EdmType>,
        navigation_source: Option<NavigationSourceId>,
        single_result: bool,
    ) -> Result<Self> {
        require_non_empty(identifier, "identifier")?;
        Ok(DynamicPathSegment {
            info: SegmentInfo {
                identifier: identifier.to_string(),
                target_edm_type: edm_type.as_ref().map(|t| t.element_or_self().clone()),
                edm_type,
                target_navigation_source: navigation_source,
                single_result,
                target_kind: TargetKind::Dynamic,
            },
        })
    }
}

/// `$count`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountSegment {
    info: SegmentInfo,
}

impl Default for CountSegment {
    fn default() -> Self {
        CountSegment {
            info: SegmentInfo::typed("$count", EdmType::Primitive(PrimitiveKind::Int32), None),
        }
    }
}

impl CountSegment {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `$value`: the raw value of a primitive, enum, dynamic property or the
/// media stream of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSegment {
    info: SegmentInfo,
}

impl ValueSegment {
    /// `previous` is the type of the preceding segment, `None` when it is
    /// unresolved.
    pub fn new(previous: Option<&EdmType>) -> Result<Self> {
        let (edm_type, target_kind) = match previous {
            Some(EdmType::Collection(_)) => {
                debug!("$value applied to a collection");
                return Err(SemanticError::InvalidSegment(
                    "$value cannot be applied to a collection".to_string(),
                ));
            }
            Some(EdmType::Entity(_)) => (
                EdmType::Primitive(PrimitiveKind::Stream),
                TargetKind::MediaResource,
            ),
            Some(ty @ EdmType::Primitive(_)) => (ty.clone(), TargetKind::PrimitiveValue),
            Some(ty @ EdmType::Enum(_)) => (ty.clone(), TargetKind::EnumValue),
            Some(ty) => (ty.clone(), TargetKind::DynamicValue),
            None => (EdmType::Unknown, TargetKind::DynamicValue),
        };
        Ok(ValueSegment {
            info: SegmentInfo::typed("$value", edm_type, None).with_target_kind(target_kind),
        })
    }
}

segment_accessors!(PropertySegment, DynamicPathSegment, CountSegment, ValueSegment);
segment_edm_type!(PropertySegment, DynamicPathSegment, CountSegment, ValueSegment);
