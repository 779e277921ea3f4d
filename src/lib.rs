#![doc = r#"
s2ndvi: cloud-masked Sentinel-2 composites and NDVI from a remote compute service.

This crate builds symbolic Earth Engine requests: it joins Sentinel-2 surface
reflectance with s2cloudless cloud probability, derives cloud and shadow masks,
reduces the masked scenes to a per-pixel median composite, computes NDVI, and
exports the result as a GeoTIFF. All heavy computation happens remotely; the
crate only assembles an expression graph, serializes it, submits it, and reads
the returned raster back with GDAL. It powers the `s2ndvi` CLI and can be
embedded in your own Rust applications.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.
- For real exports: an Earth Engine project and an OAuth access token
  (`EE_PROJECT`, `EE_ACCESS_TOKEN`).

Add dependency
--------------
```toml
[dependencies]
s2ndvi = "0.1"
```

Quick start: export NDVI for a bounding box
-------------------------------------------
```rust,no_run
use s2ndvi::{
    export_image, ndvi_composite,
    AreaOfInterest, DateRange, EarthEngineClient, ExportRequest, Geometry, RequestParams,
    ServiceConfig,
};

fn main() -> s2ndvi::Result<()> {
    let params = RequestParams {
        aoi: Some(AreaOfInterest::Point { lon: -122.269, lat: 45.701 }),
        dates: DateRange::parse("2020-06-01", "2020-09-01")?,
        ..RequestParams::default()
    };

    let request = ExportRequest::new(
        ndvi_composite(&params),
        Geometry::rectangle(-122.4, 45.6, -122.1, 45.8),
        10.0,
        "/out/ndvi.tif",
    );

    let client = EarthEngineClient::new(ServiceConfig::from_env()?)?;
    let summary = export_image(&client, &request)?;
    println!("wrote {} bytes to {:?}", summary.bytes, summary.path);
    Ok(())
}
```

Inspect the request without submitting it
-----------------------------------------
```rust
use s2ndvi::{masked_composite, serialize_request, MaskParameters, RequestParams};

let params = RequestParams {
    mask: MaskParameters { buffer: 100.0, ..MaskParameters::default() },
    ..RequestParams::default()
};
let json = serialize_request(&masked_composite(&params));
assert!(json["values"].is_object());
```

Region from a vector file
-------------------------
```rust,no_run
use std::path::Path;
use s2ndvi::{inspect_export, load_shape_file};

fn main() -> s2ndvi::Result<()> {
    let boundary = load_shape_file("/data/watershed.shp")?;
    let region = boundary.geometry();

    let report = inspect_export(Path::new("/out/ndvi.tif"), region.bounds().as_ref())?;
    println!("within region: {:?}", report.within);
    Ok(())
}
```

Error handling
--------------
All public functions return `s2ndvi::Result<T>`; match on `s2ndvi::Error` to handle specific
cases. Failures of the remote service are reported as-is, without local retries.

```rust,no_run
use s2ndvi::{export_image, ndvi_composite, EarthEngineClient, Error, ExportRequest, Geometry, RequestParams, ServiceConfig};

fn main() {
    let request = ExportRequest::new(
        ndvi_composite(&RequestParams::default()),
        Geometry::rectangle(-122.4, 45.6, -122.1, 45.8),
        10.0,
        "/out/ndvi.tif",
    );
    let result = ServiceConfig::from_env()
        .and_then(EarthEngineClient::new)
        .and_then(|client| export_image(&client, &request));
    match result {
        Ok(summary) => println!("{:?}", summary.path),
        Err(Error::Service { status, message }) => eprintln!("service rejected job ({status}): {message}"),
        Err(Error::MissingArgument { arg }) => eprintln!("set {arg}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`expr`]: the symbolic expression graph and its JSON serialization.
- [`core`]: the request builder: fetch, mask, composite, NDVI.
- [`io`]: the remote service seam, export, raster read-back and vector loading.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod expr;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::ImageryRequestBuilder;
pub use core::params::{MaskParameters, RequestParams, SensorProfile};
pub use error::{Error, Result};
pub use expr::{BoundingBox, FeatureCollection, Geometry, Image, ImageCollection};
pub use types::{AreaOfInterest, DateRange, Product};

// Service, export and readers
pub use io::{
    BandStatistics, ComputeService, EarthEngineClient, ExportRequest, ExportSummary,
    ExportedRaster, GdalError, PixelRequest, ServiceConfig, load_shape_file,
};

// High-level API re-exports
pub use api::{
    ExportReport, export_image, inspect_export, masked_composite, ndvi_composite, product_image,
    serialize_request,
};
