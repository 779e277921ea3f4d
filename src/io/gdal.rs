use gdal::{Dataset, Metadata, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

use crate::expr::BoundingBox;

/// Errors encountered when reading rasters or vectors through GDAL
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),
}

/// Metadata of an exported raster
#[derive(Debug, Clone)]
pub struct RasterMetadata {
    /// Width (pixels) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    /// Number of raster bands
    pub bands: usize,
    /// Band descriptions, as written by the service (e.g. `ndvi`, `B4`)
    pub band_names: Vec<String>,
    /// Affine geotransform coefficients ([origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height])
    pub geotransform: [f64; 6],
    /// `EPSG:XXXX` when detectable, otherwise the WKT
    pub projection: String,
}

/// Summary statistics of one band, ignoring nodata and NaN pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub valid: usize,
    pub total: usize,
}

/// Read-back access to a raster written by an export
pub struct ExportedRaster {
    pub dataset: Dataset,
    pub metadata: RasterMetadata,
}

// Helper to extract EPSG code from WKT authority tag
fn parse_epsg(wkt: &str) -> Option<String> {
    const KEY: &str = "AUTHORITY[\"EPSG\",\"";
    if let Some(idx) = wkt.rfind(KEY) {
        let start = idx + KEY.len();
        if let Some(end) = wkt[start..].find('"') {
            let code = &wkt[start..start + end];
            return Some(format!("EPSG:{}", code));
        }
    }
    None
}

/// Extent covered by a north-up raster of `size_x` x `size_y` pixels.
pub fn extent_from_geotransform(gt: &[f64; 6], size_x: usize, size_y: usize) -> BoundingBox {
    let x0 = gt[0];
    let x1 = gt[0] + gt[1] * size_x as f64 + gt[2] * size_y as f64;
    let y0 = gt[3];
    let y1 = gt[3] + gt[4] * size_x as f64 + gt[5] * size_y as f64;
    BoundingBox {
        west: x0.min(x1),
        south: y0.min(y1),
        east: x0.max(x1),
        north: y0.max(y1),
    }
}

/// Statistics over pixels that are neither NaN nor equal to `nodata`.
pub fn band_statistics(data: &Array2<f64>, nodata: Option<f64>) -> Option<BandStatistics> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut valid = 0usize;
    for &v in data.iter() {
        if v.is_nan() || nodata.is_some_and(|nd| v == nd) {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
        sum += v;
        valid += 1;
    }
    if valid == 0 {
        return None;
    }
    Some(BandStatistics {
        min,
        max,
        mean: sum / valid as f64,
        valid,
        total: data.len(),
    })
}

impl ExportedRaster {
    /// Open a raster written by an export (GeoTIFF)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GdalError> {
        let dataset = Dataset::open(path.as_ref())?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        let geotransform = match dataset.geo_transform() {
            Ok(gt) => gt,
            Err(_) => [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };
        let proj = dataset.projection();
        let projection = if proj.starts_with("EPSG:") {
            proj
        } else if let Some(code) = parse_epsg(&proj) {
            code
        } else {
            proj
        };
        let mut band_names = Vec::with_capacity(bands);
        for idx in 1..=bands {
            let band = dataset.rasterband(idx)?;
            band_names.push(band.description().unwrap_or_default());
        }
        Ok(ExportedRaster {
            dataset,
            metadata: RasterMetadata {
                size_x: size_x as usize,
                size_y: size_y as usize,
                bands,
                band_names,
                geotransform,
                projection,
            },
        })
    }

    /// Read a single band (1-based index) as an f64 ndarray of shape (height, width)
    pub fn read_band(&self, index: usize) -> Result<Array2<f64>, GdalError> {
        if index == 0 || index > self.metadata.bands {
            return Err(GdalError::UnsupportedFormat(format!(
                "Band index {} out of range",
                index
            )));
        }
        let band = self.dataset.rasterband(index)?;
        let window = (self.metadata.size_x, self.metadata.size_y);
        let buf = band.read_as::<f64>((0, 0), window, window, None)?;
        let data_vec = buf.data().to_vec();
        let array = Array2::from_shape_vec((self.metadata.size_y, self.metadata.size_x), data_vec)
            .map_err(|_| {
                GdalError::DimensionMismatch(
                    self.metadata.size_x,
                    self.metadata.size_y,
                    self.metadata.size_x,
                    self.metadata.size_y,
                )
            })?;
        Ok(array)
    }

    /// Statistics of one band (1-based index); `None` when no pixel is valid
    pub fn statistics(&self, index: usize) -> Result<Option<BandStatistics>, GdalError> {
        let data = self.read_band(index)?;
        let nodata = self.dataset.rasterband(index)?.no_data_value();
        Ok(band_statistics(&data, nodata))
    }

    pub fn extent(&self) -> BoundingBox {
        extent_from_geotransform(
            &self.metadata.geotransform,
            self.metadata.size_x,
            self.metadata.size_y,
        )
    }

    /// Whether the raster stays inside `bounds` (lon/lat), with one pixel of
    /// tolerance. `None` when the raster is not in geographic coordinates and
    /// the comparison is meaningless.
    pub fn within(&self, bounds: &BoundingBox) -> Option<bool> {
        if self.metadata.projection != "EPSG:4326" {
            return None;
        }
        let gt = &self.metadata.geotransform;
        let pixel = gt[1].abs().max(gt[5].abs());
        Some(bounds.contains(&self.extent(), pixel))
    }
}
