#![forbid(unsafe_code)]
//! map_random: Procedural random data for stress-testing geospatial pipelines.
//!
//! Modules:
//! - distribution: parse, memoize and sample named probability distributions
//! - attribute: resolve literal or distribution-expression attribute values
//! - geometry: envelopes, projections, points, lines and convex polygons
//! - field: non-overlapping shape fields over a jittered grid
//! - terrain: fractal height maps sampled onto regular grids
//! - request: resource identifiers and category routing with notifications
//!
//! For examples, see the `map_random_examples` crate.
pub mod attribute;
pub mod distribution;
pub mod error;
pub mod field;
pub mod geometry;
pub mod notification;
pub mod request;
pub mod terrain;

/// Convenient re-exports for common types. Import with `use map_random::prelude::*;`.
pub mod prelude {
    pub use crate::attribute::AttributeValueResolver;
    pub use crate::distribution::{
        DistributionCatalog, Distribution, Draw, Family, Sampler, Signature,
    };
    pub use crate::error::{Error, Result};
    pub use crate::field::{
        GeneratedShape, ShapeField, ShapeFieldConfig, ShapeFieldGenerator, ShapeKind,
    };
    pub use crate::geometry::{Envelope, Geometry, Projection, Shape};
    pub use crate::notification::{Level, Notification};
    pub use crate::request::{
        ArtifactType, Category, GenerationContext, GenerationDispatcher, GenerationOutput,
        GenerationRequest, OutputData, Urn,
    };
    pub use crate::terrain::{SurfaceGrid, Terrain, TerrainConfig};
}
