use std::collections::HashMap;

use crate::edm::model::{
    BindingPath, EdmModel, EntitySetExpression, EnumTypeDef, Multiplicity, NavigationSourceDef,
    NavigationSourceKind, OperationDef, OperationImportDef, PropertyDef, PropertyKind,
    StructuredKind, StructuredTypeDef,
};
use crate::edm::types::{
    EnumTypeId, NavigationSourceId, OperationId, OperationImportId, PropertyId, StructuredTypeId,
    TypeRef,
};

#[derive(Debug, Clone)]
struct NavigationBinding {
    source: NavigationSourceId,
    property: PropertyId,
    path: Option<BindingPath>,
    target: NavigationSourceId,
}

/// A vector-backed [`EdmModel`] with a small builder API.
///
/// # Examples
///
/// ```
/// use odata_semantic::edm::{EdmModel, InMemoryModel, PrimitiveKind, TypeRef};
///
/// let mut model = InMemoryModel::new();
/// let person = model.add_entity_type("NS", "Person", None);
/// let id = model.add_key_property(person, "Id", TypeRef::primitive(PrimitiveKind::Int32, false));
/// let people = model.add_entity_set("People", person);
///
/// assert_eq!(model.key_properties(person), vec![id]);
/// assert_eq!(model.navigation_source(people).unwrap().name, "People");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryModel {
    structured_types: Vec<StructuredTypeDef>,
    enum_types: Vec<EnumTypeDef>,
    properties: Vec<PropertyDef>,
    navigation_sources: Vec<NavigationSourceDef>,
    operations: Vec<OperationDef>,
    operation_imports: Vec<OperationImportDef>,
    bindings: Vec<NavigationBinding>,
    operations_by_name: HashMap<String, Vec<OperationId>>,
}

impl InMemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_structured_type(
        &mut self,
        namespace: &str,
        name: &str,
        kind: StructuredKind,
        base_type: Option<StructuredTypeId>,
    ) -> StructuredTypeId {
        let id = StructuredTypeId(self.structured_types.len() as u32);
        self.structured_types.push(StructuredTypeDef {
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
            base_type,
            is_abstract: false,
            is_open: false,
            has_stream: false,
            key: Vec::new(),
            properties: Vec::new(),
        });
        id
    }

    pub fn add_entity_type(
        &mut self,
        namespace: &str,
        name: &str,
        base_type: Option<StructuredTypeId>,
    ) -> StructuredTypeId {
        self.add_structured_type(namespace, name, StructuredKind::Entity, base_type)
    }

    pub fn add_complex_type(
        &mut self,
        namespace: &str,
        name: &str,
        base_type: Option<StructuredTypeId>,
    ) -> StructuredTypeId {
        self.add_structured_type(namespace, name, StructuredKind::Complex, base_type)
    }

    /// Marks a structured type as open.
    pub fn set_open(&mut self, ty: StructuredTypeId, open: bool) {
        if let Some(def) = self.structured_types.get_mut(ty.0 as usize) {
            def.is_open = open;
        }
    }

    /// Marks an entity type as a media entity.
    pub fn set_has_stream(&mut self, ty: StructuredTypeId, has_stream: bool) {
        if let Some(def) = self.structured_types.get_mut(ty.0 as usize) {
            def.has_stream = has_stream;
        }
    }

    pub fn add_enum_type(
        &mut self,
        namespace: &str,
        name: &str,
        members: &[(&str, i64)],
        is_flags: bool,
    ) -> EnumTypeId {
        let id = EnumTypeId(self.enum_types.len() as u32);
        self.enum_types.push(EnumTypeDef {
            namespace: namespace.to_string(),
            name: name.to_string(),
            members: members
                .iter()
                .map(|(member, value)| (member.to_string(), *value))
                .collect(),
            is_flags,
        });
        id
    }

    fn push_property(&mut self, def: PropertyDef) -> PropertyId {
        let id = PropertyId(self.properties.len() as u32);
        let owner = def.declaring_type;
        self.properties.push(def);
        if let Some(ty) = self.structured_types.get_mut(owner.0 as usize) {
            ty.properties.push(id);
        }
        id
    }

    pub fn add_structural_property(
        &mut self,
        declaring_type: StructuredTypeId,
        name: &str,
        type_ref: TypeRef,
    ) -> PropertyId {
        self.push_property(PropertyDef {
            name: name.to_string(),
            declaring_type,
            type_ref,
            kind: PropertyKind::Structural,
        })
    }

    /// Adds a structural property and appends it to the declared key.
    pub fn add_key_property(
        &mut self,
        declaring_type: StructuredTypeId,
        name: &str,
        type_ref: TypeRef,
    ) -> PropertyId {
        let id = self.add_structural_property(declaring_type, name, type_ref);
        if let Some(ty) = self.structured_types.get_mut(declaring_type.0 as usize) {
            ty.key.push(id);
        }
        id
    }

    pub fn add_navigation_property(
        &mut self,
        declaring_type: StructuredTypeId,
        name: &str,
        target: StructuredTypeId,
        multiplicity: Multiplicity,
        contains_target: bool,
    ) -> PropertyId {
        let type_ref = match multiplicity {
            Multiplicity::Many => TypeRef::collection(TypeRef::entity(target, false)),
            Multiplicity::ZeroOrOne => TypeRef::entity(target, true),
            Multiplicity::One => TypeRef::entity(target, false),
        };
        self.push_property(PropertyDef {
            name: name.to_string(),
            declaring_type,
            type_ref,
            kind: PropertyKind::Navigation {
                multiplicity,
                contains_target,
                partner: None,
            },
        })
    }

    /// Links two navigation properties as partners of each other.
    pub fn set_partners(&mut self, a: PropertyId, b: PropertyId) {
        for (this, other) in [(a, b), (b, a)] {
            if let Some(PropertyDef {
                kind: PropertyKind::Navigation { partner, .. },
                ..
            }) = self.properties.get_mut(this.0 as usize)
            {
                *partner = Some(other);
            }
        }
    }

    fn add_navigation_source(
        &mut self,
        name: &str,
        kind: NavigationSourceKind,
        entity_type: StructuredTypeId,
    ) -> NavigationSourceId {
        let id = NavigationSourceId(self.navigation_sources.len() as u32);
        self.navigation_sources.push(NavigationSourceDef {
            name: name.to_string(),
            kind,
            entity_type,
        });
        id
    }

    pub fn add_entity_set(&mut self, name: &str, entity_type: StructuredTypeId) -> NavigationSourceId {
        self.add_navigation_source(name, NavigationSourceKind::EntitySet, entity_type)
    }

    pub fn add_singleton(&mut self, name: &str, entity_type: StructuredTypeId) -> NavigationSourceId {
        self.add_navigation_source(name, NavigationSourceKind::Singleton, entity_type)
    }

    pub fn add_contained_source(
        &mut self,
        name: &str,
        entity_type: StructuredTypeId,
    ) -> NavigationSourceId {
        self.add_navigation_source(name, NavigationSourceKind::Contained, entity_type)
    }

    /// Declares that following `property` from `source` (optionally through
    /// `binding_path`) lands in `target`.
    pub fn add_navigation_binding(
        &mut self,
        source: NavigationSourceId,
        property: PropertyId,
        binding_path: Option<&str>,
        target: NavigationSourceId,
    ) {
        self.bindings.push(NavigationBinding {
            source,
            property,
            path: binding_path.map(BindingPath::new),
            target,
        });
    }

    pub fn add_operation(&mut self, def: OperationDef) -> OperationId {
        let id = OperationId(self.operations.len() as u32);
        self.operations_by_name
            .entry(def.qualified_name())
            .or_default()
            .push(id);
        self.operations.push(def);
        id
    }

    pub fn add_operation_import(
        &mut self,
        name: &str,
        operation: OperationId,
        entity_set: Option<EntitySetExpression>,
    ) -> OperationImportId {
        let id = OperationImportId(self.operation_imports.len() as u32);
        self.operation_imports.push(OperationImportDef {
            name: name.to_string(),
            operation,
            entity_set,
        });
        id
    }
}

impl EdmModel for InMemoryModel {
    fn structured_type(&self, id: StructuredTypeId) -> Option<&StructuredTypeDef> {
        self.structured_types.get(id.0 as usize)
    }

    fn enum_type(&self, id: EnumTypeId) -> Option<&EnumTypeDef> {
        self.enum_types.get(id.0 as usize)
    }

    fn property(&self, id: PropertyId) -> Option<&PropertyDef> {
        self.properties.get(id.0 as usize)
    }

    fn navigation_source(&self, id: NavigationSourceId) -> Option<&NavigationSourceDef> {
        self.navigation_sources.get(id.0 as usize)
    }

    fn operation(&self, id: OperationId) -> Option<&OperationDef> {
        self.operations.get(id.0 as usize)
    }

    fn operation_import(&self, id: OperationImportId) -> Option<&OperationImportDef> {
        self.operation_imports.get(id.0 as usize)
    }

    fn find_navigation_target(
        &self,
        source: NavigationSourceId,
        property: PropertyId,
        binding_path: Option<&BindingPath>,
    ) -> Option<NavigationSourceId> {
        let mut candidates = self
            .bindings
            .iter()
            .filter(|b| b.source == source && b.property == property);
        match binding_path {
            None => candidates.next().map(|b| b.target),
            Some(path) => candidates
                .find(|b| b.path.as_ref() == Some(path))
                .map(|b| b.target),
        }
    }

    fn find_operations(&self, qualified_name: &str) -> Vec<OperationId> {
        self.operations_by_name
            .get(qualified_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::PrimitiveKind;

    #[test]
    fn test_derived_types_are_related() {
        let mut model = InMemoryModel::new();
        let person = model.add_entity_type("NS", "Person", None);
        let employee = model.add_entity_type("NS", "Employee", Some(person));
        let product = model.add_entity_type("NS", "Product", None);

        assert!(model.is_derived_from(employee, person));
        assert!(!model.is_derived_from(person, employee));
        assert!(model.are_related(person, employee));
        assert!(!model.are_related(product, employee));
    }

    #[test]
    fn test_find_property_walks_base_types() {
        let mut model = InMemoryModel::new();
        let person = model.add_entity_type("NS", "Person", None);
        let name = model.add_structural_property(
            person,
            "Name",
            TypeRef::primitive(PrimitiveKind::String, true),
        );
        let employee = model.add_entity_type("NS", "Employee", Some(person));

        assert_eq!(model.find_property(employee, "Name"), Some(name));
        assert_eq!(model.find_property(employee, "Missing"), None);
    }

    #[test]
    fn test_binding_path_selects_binding() {
        let mut model = InMemoryModel::new();
        let person = model.add_entity_type("NS", "Person", None);
        let city = model.add_entity_type("NS", "City", None);
        let nav = model.add_navigation_property(person, "City", city, Multiplicity::One, false);
        let people = model.add_entity_set("People", person);
        let home = model.add_entity_set("HomeCities", city);
        let work = model.add_entity_set("WorkCities", city);
        model.add_navigation_binding(people, nav, Some("HomeAddress/City"), home);
        model.add_navigation_binding(people, nav, Some("WorkAddress/City"), work);

        assert_eq!(model.find_navigation_target(people, nav, None), Some(home));
        let work_path = BindingPath::new("WorkAddress/City");
        assert_eq!(
            model.find_navigation_target(people, nav, Some(&work_path)),
            Some(work)
        );
    }
}
