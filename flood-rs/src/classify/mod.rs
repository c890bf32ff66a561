mod depth;
mod jenks;

#[doc(inline)]
pub use depth::DepthGrade;
#[doc(inline)]
pub use jenks::{classify, jenks_breaks};
