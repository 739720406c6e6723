use crate::edm::types::{
    EdmType, EnumTypeId, NavigationSourceId, OperationId, OperationImportId, PropertyId,
    StructuredTypeId, TypeRef,
};
use crate::error::{Result, SemanticError};

/// Whether a structured type is an entity or a complex type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredKind {
    Entity,
    Complex,
}

/// An entity or complex type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredTypeDef {
    pub namespace: String,
    pub name: String,
    pub kind: StructuredKind,
    pub base_type: Option<StructuredTypeId>,
    pub is_abstract: bool,
    pub is_open: bool,
    /// Media entity (`HasStream`).
    pub has_stream: bool,
    /// Declared key properties; empty for complex types and derived entities.
    pub key: Vec<PropertyId>,
    /// Declared properties, in declaration order.
    pub properties: Vec<PropertyId>,
}

impl StructuredTypeDef {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// An enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumTypeDef {
    pub namespace: String,
    pub name: String,
    pub members: Vec<(String, i64)>,
    pub is_flags: bool,
}

impl EnumTypeDef {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// Cardinality of a navigation relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    ZeroOrOne,
    One,
    Many,
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Multiplicity::ZeroOrOne => write!(f, "0..1"),
            Multiplicity::One => write!(f, "1"),
            Multiplicity::Many => write!(f, "*"),
        }
    }
}

/// Structural or navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Structural,
    Navigation {
        multiplicity: Multiplicity,
        contains_target: bool,
        partner: Option<PropertyId>,
    },
}

/// A declared property.
///
/// For navigation properties `type_ref` is the target entity type, wrapped in
/// a collection when the multiplicity is `Many`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub declaring_type: StructuredTypeId,
    pub type_ref: TypeRef,
    pub kind: PropertyKind,
}

impl PropertyDef {
    pub fn is_navigation(&self) -> bool {
        matches!(self.kind, PropertyKind::Navigation { .. })
    }

    pub fn multiplicity(&self) -> Option<Multiplicity> {
        match self.kind {
            PropertyKind::Navigation { multiplicity, .. } => Some(multiplicity),
            PropertyKind::Structural => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSourceKind {
    EntitySet,
    Singleton,
    /// Target of a containment navigation property.
    Contained,
}

/// An entity set, singleton or contained navigation source.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSourceDef {
    pub name: String,
    pub kind: NavigationSourceKind,
    pub entity_type: StructuredTypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Action,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationParameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub optional: bool,
}

/// An action or function overload.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDef {
    pub namespace: String,
    pub name: String,
    pub kind: OperationKind,
    pub is_bound: bool,
    pub is_composable: bool,
    /// For bound operations the first parameter is the binding parameter.
    pub parameters: Vec<OperationParameter>,
    /// `None` for actions without a return type.
    pub return_type: Option<TypeRef>,
    pub entity_set_path: Option<String>,
}

impl OperationDef {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// The entity set an operation import returns entities from.
#[derive(Debug, Clone, PartialEq)]
pub enum EntitySetExpression {
    Static(NavigationSourceId),
    /// A path expression evaluated against the binding parameter.
    Path(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationImportDef {
    pub name: String,
    pub operation: OperationId,
    pub entity_set: Option<EntitySetExpression>,
}

/// Slash separated property path used to disambiguate navigation bindings,
/// e.g. `Address/City`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingPath(pub String);

impl BindingPath {
    pub fn new(path: impl Into<String>) -> Self {
        BindingPath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Metadata oracle consulted while building the semantic tree.
///
/// The tree only stores handles; everything else is looked up here at
/// construction time.
pub trait EdmModel {
    fn structured_type(&self, id: StructuredTypeId) -> Option<&StructuredTypeDef>;

    fn enum_type(&self, id: EnumTypeId) -> Option<&EnumTypeDef>;

    fn property(&self, id: PropertyId) -> Option<&PropertyDef>;

    fn navigation_source(&self, id: NavigationSourceId) -> Option<&NavigationSourceDef>;

    fn operation(&self, id: OperationId) -> Option<&OperationDef>;

    fn operation_import(&self, id: OperationImportId) -> Option<&OperationImportDef>;

    /// Resolves the navigation source reached from `source` through
    /// `property`.
    ///
    /// Without a binding path the first binding declared for the property is
    /// used; with one, only the binding declared for that path matches.
    fn find_navigation_target(
        &self,
        source: NavigationSourceId,
        property: PropertyId,
        binding_path: Option<&BindingPath>,
    ) -> Option<NavigationSourceId>;

    /// All overloads with the given namespace-qualified name.
    fn find_operations(&self, qualified_name: &str) -> Vec<OperationId>;

    fn require_structured_type(&self, id: StructuredTypeId) -> Result<&StructuredTypeDef> {
        self.structured_type(id)
            .ok_or_else(|| SemanticError::UnresolvedMetadata(format!("structured type #{}", id.0)))
    }

    fn require_property(&self, id: PropertyId) -> Result<&PropertyDef> {
        self.property(id)
            .ok_or_else(|| SemanticError::UnresolvedMetadata(format!("property #{}", id.0)))
    }

    fn require_navigation_source(&self, id: NavigationSourceId) -> Result<&NavigationSourceDef> {
        self.navigation_source(id).ok_or_else(|| {
            SemanticError::UnresolvedMetadata(format!("navigation source #{}", id.0))
        })
    }

    fn require_operation(&self, id: OperationId) -> Result<&OperationDef> {
        self.operation(id)
            .ok_or_else(|| SemanticError::UnresolvedMetadata(format!("operation #{}", id.0)))
    }

    fn require_operation_import(&self, id: OperationImportId) -> Result<&OperationImportDef> {
        self.operation_import(id).ok_or_else(|| {
            SemanticError::UnresolvedMetadata(format!("operation import #{}", id.0))
        })
    }

    /// True when `derived` is `base` or inherits from it.
    fn is_derived_from(&self, derived: StructuredTypeId, base: StructuredTypeId) -> bool {
        let mut current = Some(derived);
        while let Some(id) = current {
            if id == base {
                return true;
            }
            current = self.structured_type(id).and_then(|def| def.base_type);
        }
        false
    }

    /// True when either type derives from the other.
    fn are_related(&self, a: StructuredTypeId, b: StructuredTypeId) -> bool {
        self.is_derived_from(a, b) || self.is_derived_from(b, a)
    }

    /// Finds a property declared on `ty` or any of its base types.
    fn find_property(&self, ty: StructuredTypeId, name: &str) -> Option<PropertyId> {
        let mut current = Some(ty);
        while let Some(id) = current {
            let def = self.structured_type(id)?;
            let found = def
                .properties
                .iter()
                .copied()
                .find(|p| self.property(*p).is_some_and(|prop| prop.name == name));
            if found.is_some() {
                return found;
            }
            current = def.base_type;
        }
        None
    }

    /// Key of an entity type, taken from the first type in the base chain
    /// that declares one.
    fn key_properties(&self, ty: StructuredTypeId) -> Vec<PropertyId> {
        let mut current = Some(ty);
        while let Some(id) = current {
            let Some(def) = self.structured_type(id) else {
                break;
            };
            if !def.key.is_empty() {
                return def.key.clone();
            }
            current = def.base_type;
        }
        Vec::new()
    }

    /// Human readable, namespace-qualified type name.
    fn type_name(&self, ty: &EdmType) -> String {
        match ty {
            EdmType::Primitive(kind) => kind.qualified_name().to_string(),
            EdmType::Entity(id) | EdmType::Complex(id) => self
                .structured_type(*id)
                .map(StructuredTypeDef::qualified_name)
                .unwrap_or_else(|| format!("<structured type #{}>", id.0)),
            EdmType::Enum(id) => self
                .enum_type(*id)
                .map(EnumTypeDef::qualified_name)
                .unwrap_or_else(|| format!("<enum type #{}>", id.0)),
            EdmType::Collection(element) => {
                format!("Collection({})", self.type_name(&element.definition))
            }
            EdmType::Untyped => "Edm.Untyped".to_string(),
            EdmType::Unknown => "<unknown>".to_string(),
        }
    }
}
