use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::edm::{EdmType, NavigationSourceId, TypeRef};
use crate::error::{Result, SemanticError, require_non_empty};
use crate::nodes::{RangeVariable, SingleValueNode};
use crate::path::TargetKind;
use crate::path::segment::SegmentInfo;

static CONTENT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?[A-Za-z0-9\-._~]+$").expect("BUG: invalid CONTENT_ID_RE regex literal")
});

/// `$batch`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSegment {
    info: SegmentInfo,
}

impl Default for BatchSegment {
    fn default() -> Self {
        BatchSegment {
            info: SegmentInfo {
                identifier: "$batch".to_string(),
                edm_type: None,
                target_edm_type: None,
                target_navigation_source: None,
                single_result: true,
                target_kind: TargetKind::Batch,
            },
        }
    }
}

impl BatchSegment {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `$metadata`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSegment {
    info: SegmentInfo,
}

impl Default for MetadataSegment {
    fn default() -> Self {
        MetadataSegment {
            info: SegmentInfo {
                identifier: "$metadata".to_string(),
                edm_type: None,
                target_edm_type: None,
                target_navigation_source: None,
                single_result: true,
                target_kind: TargetKind::Metadata,
            },
        }
    }
}

impl MetadataSegment {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reference to the result of an earlier request in the same batch change
/// set, e.g. `$1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReferenceSegment {
    content_id: String,
    info: SegmentInfo,
}

impl BatchReferenceSegment {
    /// `edm_type` and `navigation_source` describe the referenced result.
    pub fn new(
        content_id: &str,
        edm_type: EdmType,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        require_non_empty(content_id, "content_id")?;
        if !CONTENT_ID_RE.is_match(content_id) {
            debug!(content_id, "malformed batch content id");
            return Err(SemanticError::MalformedContentId(content_id.to_string()));
        }
        let mut info = SegmentInfo::typed(content_id, edm_type, navigation_source);
        info.single_result = true;
        Ok(BatchReferenceSegment {
            content_id: content_id.to_string(),
            info,
        })
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }
}

/// `$filter(expression)` applied to a collection in the path.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSegment {
    expression: Rc<SingleValueNode>,
    range_variable: Rc<RangeVariable>,
    info: SegmentInfo,
}

impl FilterSegment {
    /// The expression must be boolean; the segment type is a collection of
    /// the range variable's type.
    pub fn new(
        expression: Rc<SingleValueNode>,
        range_variable: Rc<RangeVariable>,
        navigation_source: Option<NavigationSourceId>,
    ) -> Result<Self> {
        if let Some(t) = expression.type_reference()
            && !t.is_boolean()
            && !t.is_untyped()
        {
            debug!(expression_type = %t.definition, "filter segment expression is not boolean");
            return Err(SemanticError::TypeMismatch {
                expected: "Edm.Boolean".to_string(),
                actual: t.definition.to_string(),
            });
        }
        let edm_type = match range_variable.type_reference() {
            Some(item) => EdmType::Collection(Box::new(item.clone())),
            None => EdmType::Collection(Box::new(TypeRef::untyped())),
        };
        Ok(FilterSegment {
            expression,
            range_variable,
            info: SegmentInfo::typed("$filter", edm_type, navigation_source),
        })
    }

    pub fn expression(&self) -> &Rc<SingleValueNode> {
        &self.expression
    }

    pub fn range_variable(&self) -> &Rc<RangeVariable> {
        &self.range_variable
    }
}

/// `$each`: apply the rest of the path to every member of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct EachSegment {
    info: SegmentInfo,
}

impl EachSegment {
    /// `collection_type` is the type of the collection being iterated.
    pub fn new(collection_type: EdmType, navigation_source: Option<NavigationSourceId>) -> Result<Self> {
        if !collection_type.is_collection() {
            return Err(SemanticError::InvalidSegment(format!(
                "$each requires a collection, got {collection_type}"
            )));
        }
        Ok(EachSegment {
            info: SegmentInfo::typed("$each", collection_type, navigation_source),
        })
    }
}

/// A templated segment such as `{id}`, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplateSegment {
    info: SegmentInfo,
}

impl PathTemplateSegment {
    pub fn new(literal_text: &str) -> Result<Self> {
        require_non_empty(literal_text, "literal_text")?;
        Ok(PathTemplateSegment {
            info: SegmentInfo::typed(literal_text, EdmType::Unknown, None)
                .with_target_kind(TargetKind::Nothing),
        })
    }

    pub fn literal_text(&self) -> &str {
        &self.info.identifier
    }
}

segment_accessors!(
    BatchSegment,
    MetadataSegment,
    BatchReferenceSegment,
    FilterSegment,
    EachSegment,
    PathTemplateSegment,
);

segment_edm_type!(
    BatchSegment,
    MetadataSegment,
    BatchReferenceSegment,
    FilterSegment,
    EachSegment,
    PathTemplateSegment,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_lexical_rule() {
        for ok in ["1", "$1", "change-set.2", "a_b~c"] {
            assert!(CONTENT_ID_RE.is_match(ok), "{ok} should match");
        }
        for bad in ["1/bad", "$", "a b", "x?y"] {
            assert!(!CONTENT_ID_RE.is_match(bad), "{bad} should not match");
        }
    }

    #[test]
    fn test_batch_and_metadata_are_untyped() {
        assert_eq!(BatchSegment::new().edm_type(), None);
        assert_eq!(MetadataSegment::new().edm_type(), None);
        assert_eq!(MetadataSegment::new().target_kind(), TargetKind::Metadata);
    }

    #[test]
    fn test_each_requires_collection() {
        assert!(EachSegment::new(EdmType::Untyped, None).is_err());
    }
}
