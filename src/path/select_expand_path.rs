use tracing::debug;

use crate::error::{PathKind, Result, SemanticError};
use crate::path::{NavigationPropertySegment, ODataPath, PathSegment};

fn invalid(kind: PathKind, segments: &[PathSegment], position: usize, reason: &'static str) -> SemanticError {
    let segment = segments
        .get(position)
        .map_or("<none>", PathSegment::kind_name);
    debug!(%kind, segment, position, reason, "path rejected");
    SemanticError::InvalidPath {
        kind,
        segment,
        position,
        reason,
    }
}

/// The path of one `$expand` item: type casts and complex properties
/// followed by exactly one navigation property, e.g.
/// `Address/NS.HomeAddress/City`.
#[derive(Debug, Clone, PartialEq)]
pub struct ODataExpandPath {
    segments: Vec<PathSegment>,
}

impl ODataExpandPath {
    pub fn new(segments: Vec<PathSegment>) -> Result<Self> {
        validate_expand(&segments)?;
        Ok(ODataExpandPath { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first_segment(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    /// The expanded navigation property.
    pub fn navigation_property_segment(&self) -> Option<&NavigationPropertySegment> {
        match self.segments.last() {
            Some(PathSegment::NavigationProperty(segment)) => Some(segment),
            _ => None,
        }
    }

    /// Re-validates the segments as a `$select` path.
    pub fn to_select_path(&self) -> Result<ODataSelectPath> {
        ODataSelectPath::new(self.segments.clone())
    }

    pub fn to_odata_path(&self) -> ODataPath {
        ODataPath::new(self.segments.clone())
    }
}

fn validate_expand(segments: &[PathSegment]) -> Result<()> {
    const KIND: PathKind = PathKind::Expand;
    let Some(last) = segments.len().checked_sub(1) else {
        return Err(invalid(KIND, segments, 0, "path is empty"));
    };
    for (position, segment) in segments.iter().enumerate() {
        match segment {
            PathSegment::Type(_) | PathSegment::Property(_) => {}
            PathSegment::NavigationProperty(_) if position == last => {}
            PathSegment::NavigationProperty(_) => {
                return Err(invalid(
                    KIND,
                    segments,
                    position,
                    "a navigation property must be the only and last navigation segment",
                ));
            }
            _ => {
                return Err(invalid(
                    KIND,
                    segments,
                    position,
                    "only type, property and navigation property segments are allowed",
                ));
            }
        }
    }
    if !matches!(segments[last], PathSegment::NavigationProperty(_)) {
        return Err(invalid(
            KIND,
            segments,
            last,
            "the last segment must be a navigation property",
        ));
    }
    Ok(())
}

/// The path of one `$select` item, e.g. `Address/City`, `NS.Manager/Budget`
/// or `NS.GetAge`.
#[derive(Debug, Clone, PartialEq)]
pub struct ODataSelectPath {
    segments: Vec<PathSegment>,
}

impl ODataSelectPath {
    pub fn new(segments: Vec<PathSegment>) -> Result<Self> {
        validate_select(&segments)?;
        Ok(ODataSelectPath { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first_segment(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    /// Re-validates the segments as an `$expand` path.
    pub fn to_expand_path(&self) -> Result<ODataExpandPath> {
        ODataExpandPath::new(self.segments.clone())
    }

    pub fn to_odata_path(&self) -> ODataPath {
        ODataPath::new(self.segments.clone())
    }
}

fn validate_select(segments: &[PathSegment]) -> Result<()> {
    const KIND: PathKind = PathKind::Select;
    let Some(last) = segments.len().checked_sub(1) else {
        return Err(invalid(KIND, segments, 0, "path is empty"));
    };
    if let [PathSegment::Type(_)] = segments {
        return Err(invalid(
            KIND,
            segments,
            0,
            "a type segment cannot be selected on its own",
        ));
    }
    for (position, segment) in segments.iter().enumerate() {
        match segment {
            PathSegment::Type(_) | PathSegment::Property(_) | PathSegment::DynamicPath(_) => {}
            PathSegment::NavigationProperty(_) | PathSegment::Operation(_) if position == last => {}
            PathSegment::NavigationProperty(_) | PathSegment::Operation(_) => {
                return Err(invalid(
                    KIND,
                    segments,
                    position,
                    "navigation property and operation segments must be last",
                ));
            }
            _ => {
                return Err(invalid(
                    KIND,
                    segments,
                    position,
                    "segment is not allowed in a select path",
                ));
            }
        }
    }
    Ok(())
}

impl From<ODataExpandPath> for ODataPath {
    fn from(path: ODataExpandPath) -> Self {
        ODataPath::new(path.segments)
    }
}

impl From<ODataSelectPath> for ODataPath {
    fn from(path: ODataSelectPath) -> Self {
        ODataPath::new(path.segments)
    }
}
