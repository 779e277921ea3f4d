//! Client-side expression graph for the remote compute service.
//!
//! Handles (`Image`, `ImageCollection`, ...) wrap immutable [`Expr`] nodes.
//! Building a handle never contacts the service; the graph is serialized with
//! [`serialize`] and shipped only when an export is submitted.
pub mod collection;
pub mod geometry;
pub mod image;
pub mod node;
pub mod serialize;

pub use collection::{FeatureCollection, Filter, ImageCollection, Join, Reducer};
pub use geometry::{BoundingBox, Geometry, Number, Projection};
pub use image::Image;
pub use node::{Call, Expr, FunctionDef, Invocation};
pub use serialize::serialize;
