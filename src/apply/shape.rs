use crate::edm::TypeRef;

/// A property a transformation adds to its output items, e.g. an aggregate
/// alias or a grouping property.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProperty {
    pub name: String,
    pub type_ref: Option<TypeRef>,
    /// Nested grouping properties, e.g. `Address` in `groupby((Address/City))`.
    pub children: Vec<ShapeProperty>,
}

impl ShapeProperty {
    pub fn new(name: impl Into<String>, type_ref: Option<TypeRef>) -> Self {
        ShapeProperty {
            name: name.into(),
            type_ref,
            children: Vec::new(),
        }
    }
}

/// The items a transformation stage produces.
///
/// `base` is the declared type the items still conform to (`None` after an
/// aggregation replaced it); `dynamic` are the properties added on top, in
/// the order they were introduced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemShape {
    pub base: Option<TypeRef>,
    pub dynamic: Vec<ShapeProperty>,
}

impl ItemShape {
    pub fn of(base: Option<TypeRef>) -> Self {
        ItemShape {
            base,
            dynamic: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: impl IntoIterator<Item = ShapeProperty>) -> Self {
        self.dynamic.extend(properties);
        self
    }

    /// Looks up a top-level dynamic property.
    pub fn property(&self, name: &str) -> Option<&ShapeProperty> {
        self.dynamic.iter().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.dynamic.iter().map(|p| p.name.as_str()).collect()
    }
}
