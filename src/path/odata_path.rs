use crate::edm::{EdmType, NavigationSourceId};
use crate::error::Result;
use crate::path::{
    KeySegment, ODataExpandPath, ODataSelectPath, PathSegment, ResourcePathTranslator,
};
use crate::visitor::{PathSegmentHandler, PathSegmentTranslator};

/// An ordered, bound resource path.
///
/// Paths are values: the trimming and appending helpers return new paths and
/// leave `self` untouched. Two paths are equal when their segments are.
///
/// # Examples
///
/// ```
/// use odata_semantic::path::{CountSegment, ODataPath, PathSegment};
///
/// let path = ODataPath::new(vec![PathSegment::from(CountSegment::new())]);
/// assert_eq!(path.len(), 1);
/// assert_eq!(path.trim_ending_type_segment(), path);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ODataPath {
    segments: Vec<PathSegment>,
}

impl ODataPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        ODataPath { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<PathSegment> {
        self.segments
    }

    pub fn first_segment(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    /// Translates every segment in order.
    pub fn walk_with<T, V>(&self, translator: &mut V) -> Vec<T>
    where
        V: PathSegmentTranslator<T> + ?Sized,
    {
        self.segments
            .iter()
            .map(|segment| segment.translate_with(translator))
            .collect()
    }

    /// Hands every segment to `handler` in order.
    pub fn walk_with_handler<H>(&self, handler: &mut H)
    where
        H: PathSegmentHandler + ?Sized,
    {
        for segment in &self.segments {
            segment.handle_with(handler);
        }
    }

    /// Index where the trailing run of type segments starts.
    fn trailing_type_start(&self) -> usize {
        self.segments
            .iter()
            .rposition(|segment| !segment.is_type())
            .map_or(0, |index| index + 1)
    }

    /// The path without its trailing type segments.
    pub fn trim_ending_type_segment(&self) -> ODataPath {
        ODataPath::new(self.segments[..self.trailing_type_start()].to_vec())
    }

    /// The path without its last key segment and the type segments that
    /// follow it. Unchanged when no key precedes the trailing type segments.
    pub fn trim_ending_key_segment(&self) -> ODataPath {
        let start = self.trailing_type_start();
        match start.checked_sub(1) {
            Some(key) if self.segments[key].is_key() => ODataPath::new(self.segments[..key].to_vec()),
            _ => self.clone(),
        }
    }

    /// The path without any trailing run of type and key segments.
    pub fn trim_ending_type_and_key_segments(&self) -> ODataPath {
        let end = self
            .segments
            .iter()
            .rposition(|segment| !segment.is_type() && !segment.is_key())
            .map_or(0, |index| index + 1);
        ODataPath::new(self.segments[..end].to_vec())
    }

    pub fn append_segment(&self, segment: impl Into<PathSegment>) -> ODataPath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        ODataPath::new(segments)
    }

    /// Inserts the key before the trailing type segments, so that
    /// `People/NS.Manager` becomes `People(1)/NS.Manager`.
    pub fn append_key_segment(&self, key: KeySegment) -> ODataPath {
        let mut segments = self.segments.clone();
        segments.insert(self.trailing_type_start(), PathSegment::Key(key));
        ODataPath::new(segments)
    }

    /// Type of the last segment.
    pub fn edm_type(&self) -> Result<Option<&EdmType>> {
        match self.last_segment() {
            Some(segment) => segment.edm_type(),
            None => Ok(None),
        }
    }

    /// Navigation source targeted by the path.
    pub fn navigation_source(&self) -> Option<NavigationSourceId> {
        self.last_segment()
            .and_then(PathSegment::target_navigation_source)
    }

    pub fn is_collection(&self) -> Result<bool> {
        Ok(self.edm_type()?.is_some_and(EdmType::is_collection))
    }

    fn last_non_type_segment(&self) -> Option<&PathSegment> {
        self.segments.iter().rev().find(|segment| !segment.is_type())
    }

    /// True when the path addresses a single declared or dynamic property.
    pub fn is_individual_property(&self) -> bool {
        matches!(
            self.last_non_type_segment(),
            Some(PathSegment::Property(_) | PathSegment::DynamicPath(_))
        )
    }

    /// True when the path ends in an undeclared property.
    pub fn is_undeclared(&self) -> bool {
        matches!(self.last_non_type_segment(), Some(PathSegment::DynamicPath(_)))
    }

    pub fn to_expand_path(&self) -> Result<ODataExpandPath> {
        ODataExpandPath::new(self.segments.clone())
    }

    pub fn to_select_path(&self) -> Result<ODataSelectPath> {
        ODataSelectPath::new(self.segments.clone())
    }

    /// URL form of the path, e.g. `People('russell')/Trips(1)/Name/$value`.
    pub fn to_resource_path_string(&self) -> String {
        self.walk_with(&mut ResourcePathTranslator::new()).concat()
    }
}

impl<'a> IntoIterator for &'a ODataPath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl FromIterator<PathSegment> for ODataPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        ODataPath::new(iter.into_iter().collect())
    }
}

impl From<Vec<PathSegment>> for ODataPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        ODataPath::new(segments)
    }
}
