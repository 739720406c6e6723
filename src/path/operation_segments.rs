use std::rc::Rc;

use tracing::debug;

use crate::edm::{
    EdmModel, EdmType, EntitySetExpression, NavigationSourceId, OperationDef, OperationId,
    OperationImportId,
};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::QueryNode;
use crate::path::TargetKind;
use crate::path::segment::SegmentInfo;

/// A bound argument of an operation segment, e.g. `minAge=@p`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSegmentParameter {
    name: String,
    value: Rc<QueryNode>,
}

impl OperationSegmentParameter {
    pub fn new(name: &str, value: Rc<QueryNode>) -> Result<Self> {
        require_non_empty(name, "name")?;
        Ok(OperationSegmentParameter {
            name: name.to_string(),
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Rc<QueryNode> {
        &self.value
    }
}

/// Segment info shared by operations and operation imports.
///
/// When the candidates disagree on their return type the segment keeps no
/// type and reports the ambiguity when the type is read.
fn operation_info(
    model: &dyn EdmModel,
    identifier: String,
    candidates: &[&OperationDef],
    entity_set: Option<NavigationSourceId>,
) -> Result<SegmentInfo> {
    let first = candidates.first().map(|def| def.return_type.as_ref());
    let agreed = candidates
        .iter()
        .all(|def| Some(def.return_type.as_ref()) == first);
    if !agreed {
        debug!(operation = %identifier, candidates = candidates.len(), "overloads disagree on return type");
        return Ok(SegmentInfo {
            identifier,
            edm_type: None,
            target_edm_type: None,
            target_navigation_source: entity_set,
            single_result: false,
            target_kind: TargetKind::Nothing,
        });
    }
    let Some(return_type) = first.flatten() else {
        return Ok(SegmentInfo::typed(identifier, EdmType::Unknown, entity_set)
            .with_target_kind(TargetKind::VoidOperation));
    };
    if let Some(ns) = entity_set {
        let set = model.require_navigation_source(ns)?;
        let returned = return_type.definition.element_or_self();
        let related = match returned {
            EdmType::Entity(id) => model.are_related(set.entity_type, *id),
            _ => false,
        };
        if !related {
            let expected = model.type_name(&EdmType::Entity(set.entity_type));
            let actual = model.type_name(returned);
            debug!(%expected, %actual, "operation return type unrelated to entity set");
            return Err(SemanticError::UnrelatedTypes { expected, actual });
        }
    }
    Ok(SegmentInfo::typed(
        identifier,
        return_type.definition.clone(),
        entity_set,
    ))
}

fn ambiguous_type<'a>(info: &'a SegmentInfo) -> Result<&'a EdmType> {
    info.edm_type
        .as_ref()
        .ok_or_else(|| SemanticError::AmbiguousOverloads(info.identifier.clone()))
}

/// A bound action or function, e.g. `NS.GetFriends(depth=2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSegment {
    operations: Vec<OperationId>,
    parameters: Vec<OperationSegmentParameter>,
    info: SegmentInfo,
}

impl OperationSegment {
    /// `operations` are the candidate overloads; `entity_set` is the set the
    /// returned entities belong to, when known.
    pub fn new(
        model: &dyn EdmModel,
        operations: Vec<OperationId>,
        entity_set: Option<NavigationSourceId>,
    ) -> Result<Self> {
        if operations.is_empty() {
            return Err(SemanticError::ArgumentNullOrEmpty("operations"));
        }
        let candidates = operations
            .iter()
            .map(|id| model.require_operation(*id))
            .collect::<Result<Vec<_>>>()?;
        let identifier = candidates[0].qualified_name();
        let info = operation_info(model, identifier, &candidates, entity_set)?;
        Ok(OperationSegment {
            operations,
            parameters: Vec::new(),
            info,
        })
    }

    pub fn with_parameters(mut self, parameters: Vec<OperationSegmentParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn operations(&self) -> &[OperationId] {
        &self.operations
    }

    pub fn parameters(&self) -> &[OperationSegmentParameter] {
        &self.parameters
    }

    pub fn entity_set(&self) -> Option<NavigationSourceId> {
        self.info.target_navigation_source
    }

    /// Common return type of the candidates; `EdmType::Unknown` for actions
    /// without a return type.
    pub fn edm_type(&self) -> Result<&EdmType> {
        ambiguous_type(&self.info)
    }
}

/// An unbound action or function exposed on the entity container.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationImportSegment {
    imports: Vec<OperationImportId>,
    parameters: Vec<OperationSegmentParameter>,
    info: SegmentInfo,
}

impl OperationImportSegment {
    /// Without an explicit `entity_set` the statically declared set of the
    /// imports is used, and overloads declaring different sets are rejected
    /// as ambiguous. Imports declaring their set through a path expression
    /// are rejected.
    pub fn new(
        model: &dyn EdmModel,
        imports: Vec<OperationImportId>,
        entity_set: Option<NavigationSourceId>,
    ) -> Result<Self> {
        if imports.is_empty() {
            return Err(SemanticError::ArgumentNullOrEmpty("imports"));
        }
        let mut declared_set: Option<NavigationSourceId> = None;
        let mut candidates = Vec::with_capacity(imports.len());
        for id in &imports {
            let import = model.require_operation_import(*id)?;
            match &import.entity_set {
                Some(EntitySetExpression::Path(path)) => {
                    debug!(import = %import.name, %path, "entity set path expression on operation import");
                    return Err(SemanticError::NotSupported(format!(
                        "entity set path `{}` on operation import `{}`",
                        path, import.name
                    )));
                }
                Some(EntitySetExpression::Static(ns)) => match declared_set {
                    Some(declared) if declared != *ns && entity_set.is_none() => {
                        debug!(import = %import.name, "overload imports declare different entity sets");
                        return Err(SemanticError::AmbiguousOverloads(import.name.clone()));
                    }
                    Some(_) => {}
                    None => declared_set = Some(*ns),
                },
                None => {}
            }
            candidates.push(model.require_operation(import.operation)?);
        }
        let identifier = model.require_operation_import(imports[0])?.name.clone();
        let info = operation_info(model, identifier, &candidates, entity_set.or(declared_set))?;
        Ok(OperationImportSegment {
            imports,
            parameters: Vec::new(),
            info,
        })
    }

    pub fn with_parameters(mut self, parameters: Vec<OperationSegmentParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn operation_imports(&self) -> &[OperationImportId] {
        &self.imports
    }

    pub fn parameters(&self) -> &[OperationSegmentParameter] {
        &self.parameters
    }

    pub fn entity_set(&self) -> Option<NavigationSourceId> {
        self.info.target_navigation_source
    }

    pub fn edm_type(&self) -> Result<&EdmType> {
        ambiguous_type(&self.info)
    }
}

segment_accessors!(OperationSegment, OperationImportSegment);
