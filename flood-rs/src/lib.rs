//! Groups flood buffer circles around sensor points and outlines each group.
//!
//! Buffer circles that overlap (or lie within a connectivity threshold of each other) are clustered
//! transitively with a union-find structure. Every cluster is outlined by a single polygon:
//! a regular polygon for isolated circles, the convex hull of radius-inflated boundary samples otherwise.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

/// Geometric primitives, geodesy and convex hull construction
pub mod geometry;

/// Clustering of buffer circles and outline generation
pub mod merging;

/// Importing GeoJSON and SWMM reports, exporting merge results
pub mod io;

/// Depth grading and natural breaks classification of flood data
pub mod classify;

/// Configuration and helper functions
pub mod util;
