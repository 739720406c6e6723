//! # Resource paths
//!
//! A bound request path is an [`ODataPath`]: an ordered list of
//! [`PathSegment`]s, each resolved against the metadata when it was built.
//!
//! ## Architecture Overview
//!
//! - **[segment]** - the [`PathSegment`] sum type and [`TargetKind`]
//! - **[resource_segments]** - entity sets, singletons, keys, navigation,
//!   `$ref` and type casts
//! - **[value_segments]** - properties, dynamic properties, `$count`, `$value`
//! - **[operation_segments]** - bound operations and operation imports
//! - **[special_segments]** - `$batch`, `$metadata`, `$N` batch references,
//!   `$filter`, `$each` and path templates
//! - **[odata_path]** - the [`ODataPath`] container and its trimming helpers
//! - **[select_expand_path]** - [`ODataExpandPath`] and [`ODataSelectPath`]
//! - **[resource_path]** - rendering a path back to its URL form
//!
//! Every segment computes its identifier, type, target navigation source,
//! cardinality and [`TargetKind`] once in its constructor.
//!
//! ## Example
//!
//! ```text
//! People('russell')/Trips(1)/PlanItems/$count
//! EntitySet   Key     Nav  Key  Nav      Count
//! ```

macro_rules! segment_accessors {
    ($($segment:ident),* $(,)?) => {
        $(
            impl $segment {
                /// Segment text as it appears in the URL, e.g. `People` or
                /// `$count`.
                pub fn identifier(&self) -> &str {
                    &self.info.identifier
                }

                /// Type reached by the segment, the element type for
                /// collections.
                pub fn target_edm_type(&self) -> Option<&$crate::edm::EdmType> {
                    self.info.target_edm_type.as_ref()
                }

                pub fn target_navigation_source(&self) -> Option<$crate::edm::NavigationSourceId> {
                    self.info.target_navigation_source
                }

                pub fn is_single_result(&self) -> bool {
                    self.info.single_result
                }

                pub fn target_kind(&self) -> $crate::path::TargetKind {
                    self.info.target_kind
                }

                pub(crate) fn info(&self) -> &$crate::path::segment::SegmentInfo {
                    &self.info
                }
            }
        )*
    };
}

macro_rules! segment_edm_type {
    ($($segment:ident),* $(,)?) => {
        $(
            impl $segment {
                pub fn edm_type(&self) -> Option<&$crate::edm::EdmType> {
                    self.info.edm_type.as_ref()
                }
            }
        )*
    };
}

pub mod odata_path;
pub mod operation_segments;
pub mod resource_path;
pub mod resource_segments;
pub mod segment;
pub mod select_expand_path;
pub mod special_segments;
pub mod value_segments;

pub use odata_path::ODataPath;
pub use operation_segments::{OperationImportSegment, OperationSegment, OperationSegmentParameter};
pub use resource_path::ResourcePathTranslator;
pub use resource_segments::{
    EntitySetSegment, KeySegment, NavigationPropertyLinkSegment, NavigationPropertySegment,
    SingletonSegment, TypeSegment,
};
pub use segment::{PathSegment, TargetKind};
pub use select_expand_path::{ODataExpandPath, ODataSelectPath};
pub use special_segments::{
    BatchReferenceSegment, BatchSegment, EachSegment, FilterSegment, MetadataSegment,
    PathTemplateSegment,
};
pub use value_segments::{CountSegment, DynamicPathSegment, PropertySegment, ValueSegment};
