mod buffer_circle;
mod merger;
mod union_find;

/// Boundary sampling of buffer circles and groups
pub mod sampling;

#[doc(inline)]
pub use buffer_circle::BufferCircle;
#[doc(inline)]
pub use merger::{EdgeCandidate, FloodBufferMerger, MergeResult, MergedGroup, OutlineKind};
#[doc(inline)]
pub use union_find::DisjointSet;
