use crate::nodes::{QueryNode, SingleValueNode};
use crate::path::{
    BatchReferenceSegment, BatchSegment, CountSegment, DynamicPathSegment, EachSegment,
    EntitySetSegment, FilterSegment, KeySegment, MetadataSegment, NavigationPropertyLinkSegment,
    NavigationPropertySegment, OperationImportSegment, OperationSegment,
    OperationSegmentParameter, PathTemplateSegment, PropertySegment, SingletonSegment,
    TypeSegment, ValueSegment,
};
use crate::visitor::PathSegmentTranslator;

/// Renders segments in their URL form.
///
/// Every segment but the first is prefixed with `/`; key predicates attach
/// to the preceding segment. Concatenating the pieces of a walk gives the
/// resource path, see [`ODataPath::to_resource_path_string`](crate::path::ODataPath::to_resource_path_string).
#[derive(Debug, Default)]
pub struct ResourcePathTranslator {
    started: bool,
}

impl ResourcePathTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    fn piece(&mut self, text: &str) -> String {
        if std::mem::replace(&mut self.started, true) {
            format!("/{text}")
        } else {
            text.to_string()
        }
    }
}

fn argument_text(value: &QueryNode) -> String {
    match value {
        QueryNode::Single(SingleValueNode::Constant(node)) => node
            .literal_text()
            .map_or_else(|| node.value().to_literal(), str::to_string),
        QueryNode::Single(SingleValueNode::ParameterAlias(node)) => node.alias().to_string(),
        other => format!("<{}>", other.kind().name()),
    }
}

fn with_arguments(identifier: &str, parameters: &[OperationSegmentParameter]) -> String {
    if parameters.is_empty() {
        return identifier.to_string();
    }
    let arguments: Vec<String> = parameters
        .iter()
        .map(|p| format!("{}={}", p.name(), argument_text(p.value())))
        .collect();
    format!("{}({})", identifier, arguments.join(","))
}

impl PathSegmentTranslator<String> for ResourcePathTranslator {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_singleton(&mut self, segment: &SingletonSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_key(&mut self, segment: &KeySegment) -> String {
        self.started = true;
        segment.identifier().to_string()
    }

    fn translate_navigation_property(&mut self, segment: &NavigationPropertySegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_navigation_property_link(&mut self, segment: &NavigationPropertyLinkSegment) -> String {
        self.piece(&format!("{}/$ref", segment.identifier()))
    }

    fn translate_type(&mut self, segment: &TypeSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_operation(&mut self, segment: &OperationSegment) -> String {
        self.piece(&with_arguments(segment.identifier(), segment.parameters()))
    }

    fn translate_operation_import(&mut self, segment: &OperationImportSegment) -> String {
        self.piece(&with_arguments(segment.identifier(), segment.parameters()))
    }

    fn translate_property(&mut self, segment: &PropertySegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_dynamic_path(&mut self, segment: &DynamicPathSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_count(&mut self, segment: &CountSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_value(&mut self, segment: &ValueSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_batch(&mut self, segment: &BatchSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_metadata(&mut self, segment: &MetadataSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_batch_reference(&mut self, segment: &BatchReferenceSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_filter(&mut self, segment: &FilterSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_each(&mut self, segment: &EachSegment) -> String {
        self.piece(segment.identifier())
    }

    fn translate_path_template(&mut self, segment: &PathTemplateSegment) -> String {
        self.piece(segment.identifier())
    }
}
