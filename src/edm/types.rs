/// Handle of an entity or complex type in an [`EdmModel`](super::EdmModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuredTypeId(pub u32);

/// Handle of an enumeration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumTypeId(pub u32);

/// Handle of a structural or navigation property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

/// Handle of an entity set, singleton or contained navigation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationSourceId(pub u32);

/// Handle of a bound or unbound operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub u32);

/// Handle of an operation import declared on the entity container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationImportId(pub u32);

/// Built-in primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
    Geography,
    Geometry,
}

impl PrimitiveKind {
    /// Namespace-qualified name, e.g. `Edm.Int32`.
    pub fn qualified_name(&self) -> &'static str {
        use PrimitiveKind::*;
        match self {
            Binary => "Edm.Binary",
            Boolean => "Edm.Boolean",
            Byte => "Edm.Byte",
            Date => "Edm.Date",
            DateTimeOffset => "Edm.DateTimeOffset",
            Decimal => "Edm.Decimal",
            Double => "Edm.Double",
            Duration => "Edm.Duration",
            Guid => "Edm.Guid",
            Int16 => "Edm.Int16",
            Int32 => "Edm.Int32",
            Int64 => "Edm.Int64",
            SByte => "Edm.SByte",
            Single => "Edm.Single",
            Stream => "Edm.Stream",
            String => "Edm.String",
            TimeOfDay => "Edm.TimeOfDay",
            Geography => "Edm.Geography",
            Geometry => "Edm.Geometry",
        }
    }

    /// True for the integral and floating point kinds.
    pub fn is_numeric(&self) -> bool {
        self.is_integral()
            || matches!(
                self,
                PrimitiveKind::Decimal | PrimitiveKind::Double | PrimitiveKind::Single
            )
    }

    /// True for `Byte`, `SByte`, `Int16`, `Int32` and `Int64`.
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::SByte
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
        )
    }

    /// Whether a value of `self` can be stored where `target` is expected
    /// without a lossy conversion.
    pub fn is_assignable_to(&self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        if *self == target {
            return true;
        }
        match (self, target) {
            (Byte, Int16 | Int32 | Int64 | Single | Double | Decimal) => true,
            (SByte, Int16 | Int32 | Int64 | Single | Double | Decimal) => true,
            (Int16, Int32 | Int64 | Single | Double | Decimal) => true,
            (Int32, Int64 | Single | Double | Decimal) => true,
            (Int64, Single | Double | Decimal) => true,
            (Single, Double) => true,
            _ => false,
        }
    }
}

/// A type definition as seen by the semantic tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdmType {
    Primitive(PrimitiveKind),
    Entity(StructuredTypeId),
    Complex(StructuredTypeId),
    Enum(EnumTypeId),
    /// Collection of the element type reference.
    Collection(Box<TypeRef>),
    /// `Edm.Untyped`.
    Untyped,
    /// Sentinel for a type the metadata cannot determine.
    Unknown,
}

impl EdmType {
    pub fn is_collection(&self) -> bool {
        matches!(self, EdmType::Collection(_))
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, EdmType::Entity(_) | EdmType::Complex(_))
    }

    /// The element type for collections, `self` otherwise.
    pub fn element_or_self(&self) -> &EdmType {
        match self {
            EdmType::Collection(element) => &element.definition,
            other => other,
        }
    }

    /// The structured type handle of this type or of its element type.
    pub fn structured_id(&self) -> Option<StructuredTypeId> {
        match self.element_or_self() {
            EdmType::Entity(id) | EdmType::Complex(id) => Some(*id),
            _ => None,
        }
    }
}

/// Model-free rendering; structured and enum types show their handle. Use
/// [`EdmModel::type_name`](super::EdmModel::type_name) for qualified names.
impl std::fmt::Display for EdmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdmType::Primitive(kind) => write!(f, "{}", kind.qualified_name()),
            EdmType::Entity(id) => write!(f, "entity type #{}", id.0),
            EdmType::Complex(id) => write!(f, "complex type #{}", id.0),
            EdmType::Enum(id) => write!(f, "enum type #{}", id.0),
            EdmType::Collection(element) => write!(f, "Collection({})", element.definition),
            EdmType::Untyped => write!(f, "Edm.Untyped"),
            EdmType::Unknown => write!(f, "<unknown>"),
        }
    }
}

/// A type together with its nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub definition: EdmType,
    pub nullable: bool,
}

impl TypeRef {
    pub fn new(definition: EdmType, nullable: bool) -> Self {
        TypeRef { definition, nullable }
    }

    pub fn primitive(kind: PrimitiveKind, nullable: bool) -> Self {
        TypeRef::new(EdmType::Primitive(kind), nullable)
    }

    /// Nullable `Edm.Boolean`.
    pub fn boolean() -> Self {
        TypeRef::primitive(PrimitiveKind::Boolean, true)
    }

    /// Non-nullable `Edm.Int64`, the type of every count.
    pub fn int64() -> Self {
        TypeRef::primitive(PrimitiveKind::Int64, false)
    }

    pub fn entity(id: StructuredTypeId, nullable: bool) -> Self {
        TypeRef::new(EdmType::Entity(id), nullable)
    }

    pub fn complex(id: StructuredTypeId, nullable: bool) -> Self {
        TypeRef::new(EdmType::Complex(id), nullable)
    }

    pub fn enumeration(id: EnumTypeId, nullable: bool) -> Self {
        TypeRef::new(EdmType::Enum(id), nullable)
    }

    pub fn untyped() -> Self {
        TypeRef::new(EdmType::Untyped, true)
    }

    /// Non-nullable collection of `element`.
    pub fn collection(element: TypeRef) -> Self {
        TypeRef::new(EdmType::Collection(Box::new(element)), false)
    }

    pub fn is_collection(&self) -> bool {
        self.definition.is_collection()
    }

    pub fn is_structured(&self) -> bool {
        self.definition.is_structured()
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.definition, EdmType::Entity(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.definition, EdmType::Complex(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.definition, EdmType::Primitive(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.definition, EdmType::Enum(_))
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self.definition, EdmType::Untyped | EdmType::Unknown)
    }

    pub fn is_boolean(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Boolean)
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.definition {
            EdmType::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Element type of a collection.
    pub fn element_type(&self) -> Option<&TypeRef> {
        match &self.definition {
            EdmType::Collection(element) => Some(element),
            _ => None,
        }
    }

    /// Structured type handle of this type, not looking through collections.
    pub fn structured_id(&self) -> Option<StructuredTypeId> {
        match self.definition {
            EdmType::Entity(id) | EdmType::Complex(id) => Some(id),
            _ => None,
        }
    }

    /// The same type with a different nullability.
    pub fn with_nullable(&self, nullable: bool) -> Self {
        TypeRef::new(self.definition.clone(), nullable)
    }
}
