pub mod merge_to_svg;
pub mod svg_util;
