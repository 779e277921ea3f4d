//! High-level library API: build the cloud-masked composite or NDVI request
//! from a single [`RequestParams`], export it through any [`ComputeService`],
//! and inspect the written raster. Prefer these entrypoints over the `core`
//! builder when integrating s2ndvi.
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::core::ImageryRequestBuilder;
use crate::core::params::RequestParams;
use crate::error::Result;
use crate::expr::{BoundingBox, Geometry, Image, serialize};
use crate::io::{
    BandStatistics, ComputeService, ExportRequest, ExportSummary, ExportedRaster, Exporter,
};
use crate::types::Product;

fn builder_for(params: &RequestParams) -> ImageryRequestBuilder {
    ImageryRequestBuilder::new(params.mask, params.sensor.clone())
}

fn composite_over(params: &RequestParams, area: &Geometry) -> Image {
    let builder = builder_for(params);
    info!(
        "Building composite over {:?} for {}",
        area.bounds(),
        params.dates
    );
    let collection = builder.get_collection(area, &params.dates);
    builder.cloud_masked_composite(&collection)
}

/// Cloud-masked median composite of the reflectance bands over the request's
/// area and dates.
pub fn masked_composite(params: &RequestParams) -> Image {
    composite_over(params, &params.search_area(None))
}

/// Single-band `ndvi` image of the masked composite.
pub fn ndvi_composite(params: &RequestParams) -> Image {
    builder_for(params).ndvi(&masked_composite(params))
}

/// Image for `product`. Scenes are searched over `params.aoi`, or over
/// `region` when no area of interest is set.
pub fn product_image(
    params: &RequestParams,
    product: Product,
    region: Option<&Geometry>,
) -> Image {
    let composite = composite_over(params, &params.search_area(region));
    match product {
        Product::Ndvi => builder_for(params).ndvi(&composite),
        Product::Composite => composite,
    }
}

/// Submit `request` and write the returned GeoTIFF. Blocks until done.
pub fn export_image<S: ComputeService + ?Sized>(
    service: &S,
    request: &ExportRequest,
) -> Result<ExportSummary> {
    Exporter::new(service).export(request)
}

/// The JSON expression that would be sent for `image`, without submitting it.
pub fn serialize_request(image: &Image) -> Value {
    serialize(image.expr())
}

/// Summary of a raster read back after export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub width: usize,
    pub height: usize,
    pub band_names: Vec<String>,
    /// Per band, `None` when the band has no valid pixel
    pub statistics: Vec<Option<BandStatistics>>,
    pub extent: BoundingBox,
    pub projection: String,
    /// Extent check against the clipping bounds, when one was possible
    pub within: Option<bool>,
}

/// Open an exported raster and summarize it, checking its extent against
/// `bounds` when given.
pub fn inspect_export(path: &Path, bounds: Option<&BoundingBox>) -> Result<ExportReport> {
    let raster = ExportedRaster::open(path)?;
    let meta = &raster.metadata;
    let mut statistics = Vec::with_capacity(meta.bands);
    for idx in 1..=meta.bands {
        statistics.push(raster.statistics(idx)?);
    }
    let within = bounds.and_then(|b| raster.within(b));
    if within == Some(false) {
        warn!("Exported raster {:?} extends beyond the region bounds", path);
    }
    Ok(ExportReport {
        width: meta.size_x,
        height: meta.size_y,
        band_names: meta.band_names.clone(),
        statistics,
        extent: raster.extent(),
        projection: meta.projection.clone(),
        within,
    })
}
