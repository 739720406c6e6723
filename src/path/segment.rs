use crate::edm::{EdmType, NavigationSourceId};
use crate::error::Result;
use crate::path::{
    BatchReferenceSegment, BatchSegment, CountSegment, DynamicPathSegment, EachSegment,
    EntitySetSegment, FilterSegment, KeySegment, MetadataSegment, NavigationPropertyLinkSegment,
    NavigationPropertySegment, OperationImportSegment, OperationSegment, PathTemplateSegment,
    PropertySegment, SingletonSegment, TypeSegment, ValueSegment,
};

/// What a path addresses once the segment is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Nothing addressable, e.g. a path template.
    Nothing,
    /// Entity or complex instance(s).
    Resource,
    Primitive,
    /// Raw value of a primitive (`$value`).
    PrimitiveValue,
    Enum,
    /// Raw value of an enum (`$value`).
    EnumValue,
    /// Collection of primitive, enum or complex values.
    Collection,
    Metadata,
    /// Operation without a return type.
    VoidOperation,
    Batch,
    /// Entity reference (`$ref`).
    Link,
    /// Undeclared property.
    Dynamic,
    /// Raw value of an undeclared property.
    DynamicValue,
    /// Media stream of a media entity (`$value`).
    MediaResource,
}

impl TargetKind {
    /// Classification of a value of type `ty`.
    pub(crate) fn for_type(ty: &EdmType) -> TargetKind {
        match ty {
            EdmType::Collection(element) if element.is_structured() => TargetKind::Resource,
            EdmType::Collection(_) => TargetKind::Collection,
            EdmType::Entity(_) | EdmType::Complex(_) => TargetKind::Resource,
            EdmType::Enum(_) => TargetKind::Enum,
            EdmType::Primitive(_) | EdmType::Untyped | EdmType::Unknown => TargetKind::Primitive,
        }
    }
}

/// Fields every segment computes at construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SegmentInfo {
    pub(crate) identifier: String,
    pub(crate) edm_type: Option<EdmType>,
    pub(crate) target_edm_type: Option<EdmType>,
    pub(crate) target_navigation_source: Option<NavigationSourceId>,
    pub(crate) single_result: bool,
    pub(crate) target_kind: TargetKind,
}

impl SegmentInfo {
    /// Info for a segment of type `edm_type`; the target type is its element
    /// type and the cardinality follows collection-ness.
    pub(crate) fn typed(
        identifier: impl Into<String>,
        edm_type: EdmType,
        target_navigation_source: Option<NavigationSourceId>,
    ) -> Self {
        SegmentInfo {
            identifier: identifier.into(),
            target_edm_type: Some(edm_type.element_or_self().clone()),
            target_navigation_source,
            single_result: !edm_type.is_collection(),
            target_kind: TargetKind::for_type(&edm_type),
            edm_type: Some(edm_type),
        }
    }

    pub(crate) fn with_target_kind(mut self, target_kind: TargetKind) -> Self {
        self.target_kind = target_kind;
        self
    }
}

/// One segment of a resource path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    EntitySet(EntitySetSegment),
    Singleton(SingletonSegment),
    Key(KeySegment),
    NavigationProperty(NavigationPropertySegment),
    /// `Navigation/$ref`.
    NavigationPropertyLink(NavigationPropertyLinkSegment),
    Type(TypeSegment),
    Operation(OperationSegment),
    OperationImport(OperationImportSegment),
    Property(PropertySegment),
    DynamicPath(DynamicPathSegment),
    Count(CountSegment),
    Value(ValueSegment),
    Batch(BatchSegment),
    Metadata(MetadataSegment),
    BatchReference(BatchReferenceSegment),
    Filter(FilterSegment),
    Each(EachSegment),
    PathTemplate(PathTemplateSegment),
}

impl PathSegment {
    pub(crate) fn info(&self) -> &SegmentInfo {
        use PathSegment::*;
        match self {
            EntitySet(s) => s.info(),
            Singleton(s) => s.info(),
            Key(s) => s.info(),
            NavigationProperty(s) => s.info(),
            NavigationPropertyLink(s) => s.info(),
            Type(s) => s.info(),
            Operation(s) => s.info(),
            OperationImport(s) => s.info(),
            Property(s) => s.info(),
            DynamicPath(s) => s.info(),
            Count(s) => s.info(),
            Value(s) => s.info(),
            Batch(s) => s.info(),
            Metadata(s) => s.info(),
            BatchReference(s) => s.info(),
            Filter(s) => s.info(),
            Each(s) => s.info(),
            PathTemplate(s) => s.info(),
        }
    }

    /// Name of the segment type, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        use PathSegment::*;
        match self {
            EntitySet(_) => "EntitySetSegment",
            Singleton(_) => "SingletonSegment",
            Key(_) => "KeySegment",
            NavigationProperty(_) => "NavigationPropertySegment",
            NavigationPropertyLink(_) => "NavigationPropertyLinkSegment",
            Type(_) => "TypeSegment",
            Operation(_) => "OperationSegment",
            OperationImport(_) => "OperationImportSegment",
            Property(_) => "PropertySegment",
            DynamicPath(_) => "DynamicPathSegment",
            Count(_) => "CountSegment",
            Value(_) => "ValueSegment",
            Batch(_) => "BatchSegment",
            Metadata(_) => "MetadataSegment",
            BatchReference(_) => "BatchReferenceSegment",
            Filter(_) => "FilterSegment",
            Each(_) => "EachSegment",
            PathTemplate(_) => "PathTemplateSegment",
        }
    }

    pub fn identifier(&self) -> &str {
        &self.info().identifier
    }

    /// Type of the segment.
    ///
    /// `None` for `$batch`, `$metadata` and unresolved dynamic properties.
    /// Fails with `AmbiguousOverloads` for operation segments whose
    /// candidates disagree on their return type.
    pub fn edm_type(&self) -> Result<Option<&EdmType>> {
        match self {
            PathSegment::Operation(s) => s.edm_type().map(Some),
            PathSegment::OperationImport(s) => s.edm_type().map(Some),
            other => Ok(other.info().edm_type.as_ref()),
        }
    }

    pub fn target_edm_type(&self) -> Option<&EdmType> {
        self.info().target_edm_type.as_ref()
    }

    pub fn target_navigation_source(&self) -> Option<NavigationSourceId> {
        self.info().target_navigation_source
    }

    pub fn is_single_result(&self) -> bool {
        self.info().single_result
    }

    pub fn target_kind(&self) -> TargetKind {
        self.info().target_kind
    }

    pub fn is_type(&self) -> bool {
        matches!(self, PathSegment::Type(_))
    }

    pub fn is_key(&self) -> bool {
        matches!(self, PathSegment::Key(_))
    }
}

macro_rules! path_segment_from {
    ($($segment:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$segment> for PathSegment {
                fn from(segment: $segment) -> Self {
                    PathSegment::$variant(segment)
                }
            }
        )*
    };
}

path_segment_from! {
    EntitySetSegment => EntitySet,
    SingletonSegment => Singleton,
    KeySegment => Key,
    NavigationPropertySegment => NavigationProperty,
    NavigationPropertyLinkSegment => NavigationPropertyLink,
    TypeSegment => Type,
    OperationSegment => Operation,
    OperationImportSegment => OperationImport,
    PropertySegment => Property,
    DynamicPathSegment => DynamicPath,
    CountSegment => Count,
    ValueSegment => Value,
    BatchSegment => Batch,
    MetadataSegment => Metadata,
    BatchReferenceSegment => BatchReference,
    FilterSegment => Filter,
    EachSegment => Each,
    PathTemplateSegment => PathTemplate,
}
