use tracing::debug;

use crate::edm::{
    EdmModel, EdmType, NavigationSourceId, NavigationSourceKind, PropertyId, StructuredKind,
    StructuredTypeId, TypeRef,
};
use crate::error::{Result, SemanticError};
use crate::nodes::is_assignable;
use crate::path::TargetKind;
use crate::path::segment::SegmentInfo;
use crate::value::ODataValue;

fn navigation_source_of_kind(
    model: &dyn EdmModel,
    id: NavigationSourceId,
    kind: NavigationSourceKind,
) -> Result<&crate::edm::NavigationSourceDef> {
    let def = model.require_navigation_source(id)?;
    if def.kind != kind {
        debug!(source = %def.name, expected = ?kind, actual = ?def.kind, "navigation source kind mismatch");
        return Err(SemanticError::InvalidSegment(format!(
            "`{}` is not a {:?}",
            def.name, kind
        )));
    }
    Ok(def)
}

/// An entity set at the start of a path, e.g. `People`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySetSegment {
    entity_set: NavigationSourceId,
    info: SegmentInfo,
}

impl EntitySetSegment {
    /// The segment type is a collection of the set's entity type.
    pub fn new(model: &dyn EdmModel, entity_set: NavigationSourceId) -> Result<Self> {
        let def = navigation_source_of_kind(model, entity_set, NavigationSourceKind::EntitySet)?;
        let edm_type = EdmType::Collection(Box::new(TypeRef::entity(def.entity_type, false)));
        Ok(EntitySetSegment {
            entity_set,
            info: SegmentInfo::typed(def.name.clone(), edm_type, Some(entity_set)),
        })
    }

    pub fn entity_set(&self) -> NavigationSourceId {
        self.entity_set
    }
}

/// A singleton, e.g. `Me`.
#[derive(Debug, Clone, PartialEq)]
pub struct SingletonSegment {
    singleton: NavigationSourceId,
    info: SegmentInfo,
}

impl SingletonSegment {
    pub fn new(model: &dyn EdmModel, singleton: NavigationSourceId) -> Result<Self> {
        let def = navigation_source_of_kind(model, singleton, NavigationSourceKind::Singleton)?;
        Ok(SingletonSegment {
            singleton,
            info: SegmentInfo::typed(def.name.clone(), EdmType::Entity(def.entity_type), Some(singleton)),
        })
    }

    pub fn singleton(&self) -> NavigationSourceId {
        self.singleton
    }
}

/// A key predicate selecting one entity, e.g. `(1)` or `(Id=1,Name='a')`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySegment {
    keys: Vec<(String, ODataValue)>,
    entity_type: StructuredTypeId,
    info: SegmentInfo,
}

impl KeySegment {
    /// `keys` are property name and value pairs in key order.
    ///
    /// When a navigation source is given, `entity_type` must be its entity
    /// type, a subtype or a supertype of it.
    pub fn new(
        model: &dyn EdmModel,
        keys: Vec<(String, ODataValue)>,
        entity_type: StructuredTypeId,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        if keys.is_empty() {
            return Err(SemanticError::ArgumentNullOrEmpty("keys"));
        }
        let def = model.require_structured_type(entity_type)?;
        if def.kind != StructuredKind::Entity {
            return Err(SemanticError::InvalidSegment(format!(
                "key on non-entity type `{}`",
                def.qualified_name()
            )));
        }
        if let Some(ns) = navigation_source {
            let source = model.require_navigation_source(ns)?;
            if !model.are_related(source.entity_type, entity_type) {
                let expected = model.type_name(&EdmType::Entity(source.entity_type));
                let actual = def.qualified_name();
                debug!(%expected, %actual, "key segment type unrelated to navigation source");
                return Err(SemanticError::UnrelatedTypes { expected, actual });
            }
        }
        let identifier = key_predicate(&keys);
        Ok(KeySegment {
            keys,
            entity_type,
            info: SegmentInfo::typed(identifier, EdmType::Entity(entity_type), navigation_source),
        })
    }

    pub fn keys(&self) -> &[(String, ODataValue)] {
        &self.keys
    }

    pub fn entity_type(&self) -> StructuredTypeId {
        self.entity_type
    }
}

fn key_predicate(keys: &[(String, ODataValue)]) -> String {
    if let [(_, value)] = keys {
        return format!("({})", value.to_literal());
    }
    let pairs: Vec<String> = keys
        .iter()
        .map(|(name, value)| format!("{}={}", name, value.to_literal()))
        .collect();
    format!("({})", pairs.join(","))
}

/// Navigation through a navigation property, e.g. `Trips`.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPropertySegment {
    property: PropertyId,
    info: SegmentInfo,
}

impl NavigationPropertySegment {
    /// `navigation_source` is the already resolved target of the navigation.
    pub fn new(
        model: &dyn EdmModel,
        property: PropertyId,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        let info = navigation_info(model, property, navigation_source)?;
        Ok(NavigationPropertySegment { property, info })
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }
}

/// `Navigation/$ref`.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPropertyLinkSegment {
    property: PropertyId,
    info: SegmentInfo,
}

impl NavigationPropertyLinkSegment {
    pub fn new(
        model: &dyn EdmModel,
        property: PropertyId,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        let info = navigation_info(model, property, navigation_source)?.with_target_kind(TargetKind::Link);
        Ok(NavigationPropertyLinkSegment { property, info })
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }
}

fn navigation_info(
    model: &dyn EdmModel,
    property: PropertyId,
    navigation_source: Option<NavigationSourceId>,
) -> Result<SegmentInfo> {
    let def = model.require_property(property)?;
    if !def.is_navigation() {
        debug!(property = %def.name, "structural property used as navigation segment");
        return Err(SemanticError::InvalidPropertyKind {
            property: def.name.clone(),
            expected: "navigation property",
        });
    }
    Ok(SegmentInfo::typed(
        def.name.clone(),
        def.type_ref.definition.clone(),
        navigation_source,
    ))
}

/// A type cast, e.g. `NS.Manager`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSegment {
    info: SegmentInfo,
}

impl TypeSegment {
    /// `target` may be a single or collection type. A structured target must
    /// be related to the entity type of `navigation_source`, when given.
    pub fn new(
        model: &dyn EdmModel,
        target: EdmType,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        if let (Some(ns), Some(target_id)) = (navigation_source, target.structured_id()) {
            let source = model.require_navigation_source(ns)?;
            if !model.are_related(source.entity_type, target_id) {
                let expected = model.type_name(&EdmType::Entity(source.entity_type));
                let actual = model.type_name(target.element_or_self());
                debug!(%expected, %actual, "type segment unrelated to navigation source");
                return Err(SemanticError::UnrelatedTypes { expected, actual });
            }
        }
        let identifier = model.type_name(target.element_or_self());
        Ok(TypeSegment {
            info: SegmentInfo::typed(identifier, target, navigation_source),
        })
    }

    /// Like [`new`](Self::new), additionally requiring the target to be
    /// assignable to `expected`, the type of the segment being cast.
    pub fn with_expected_type(
        model: &dyn EdmModel,
        target: EdmType,
        expected: &EdmType,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        let from = TypeRef::new(target.clone(), true);
        let to = TypeRef::new(expected.clone(), true);
        if !is_assignable(Some(model), &from, &to) {
            return Err(SemanticError::UnrelatedTypes {
                expected: model.type_name(expected),
                actual: model.type_name(&target),
            });
        }
        Self::new(model, target, navigation_source)
    }
}

segment_accessors!(
    EntitySetSegment,
    SingletonSegment,
    KeySegment,
    NavigationPropertySegment,
    NavigationPropertyLinkSegment,
    TypeSegment,
);

segment_edm_type!(
    EntitySetSegment,
    SingletonSegment,
    KeySegment,
    NavigationPropertySegment,
    NavigationPropertyLinkSegment,
    TypeSegment,
);
