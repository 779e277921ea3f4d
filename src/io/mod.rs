//! I/O layer: the remote `service` seam and its REST client, the `export`
//! step that submits a graph and writes the returned GeoTIFF, GDAL-backed
//! read-back of exported rasters (`gdal`), and `vector` boundary loading.
pub mod export;
pub use export::{ExportRequest, ExportSummary, Exporter};

pub mod gdal;
pub use gdal::{BandStatistics, ExportedRaster, GdalError, RasterMetadata};

pub mod service;
pub use service::{ComputeService, EarthEngineClient, PixelRequest, ServiceConfig};

pub mod vector;
pub use vector::load_shape_file;
