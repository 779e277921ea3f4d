use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::expr::{Geometry, Image, serialize};
use crate::io::service::{ComputeService, PixelRequest};

/// Value written where the image has no data.
const FILL_VALUE: f64 = 0.0;

/// One raster export: image, clipping region, scale (m/pixel) and target file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub image: Image,
    pub region: Geometry,
    pub scale: f64,
    pub path: PathBuf,
}

impl ExportRequest {
    pub fn new(image: Image, region: Geometry, scale: f64, path: impl Into<PathBuf>) -> Self {
        Self {
            image,
            region,
            scale,
            path: path.into(),
        }
    }

    /// The image as it will be computed: clipped to the region, gaps filled
    /// with zero, and cut to the region's bounds at the requested scale.
    pub fn prepared_image(&self) -> Image {
        self.image
            .clip(&self.region)
            .unmask(FILL_VALUE)
            .clip_to_bounds_and_scale(&self.region, self.scale)
    }

    pub fn to_pixel_request(&self) -> PixelRequest {
        PixelRequest {
            expression: serialize(self.prepared_image().expr()),
        }
    }
}

/// Outcome of a completed export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Submits export requests and writes the returned raster to disk.
pub struct Exporter<'a, S: ComputeService + ?Sized> {
    service: &'a S,
}

impl<'a, S: ComputeService + ?Sized> Exporter<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Blocks until the service returns the raster or fails.
    pub fn export(&self, request: &ExportRequest) -> Result<ExportSummary> {
        info!(
            "Submitting export at {} m/pixel to {:?}",
            request.scale, request.path
        );
        let bytes = self.service.compute_pixels(&request.to_pixel_request())?;
        if bytes.is_empty() {
            return Err(Error::Processing("service returned an empty raster".into()));
        }
        write_atomically(&request.path, &bytes)?;
        info!("Wrote {} bytes to {:?}", bytes.len(), request.path);
        Ok(ExportSummary {
            path: request.path.clone(),
            bytes: bytes.len(),
        })
    }
}

/// Write through a temporary file in the target directory so a failed
/// download never leaves a truncated raster behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
