use std::path::PathBuf;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use s2ndvi::api::{ExportReport, export_image, inspect_export, product_image, serialize_request};
use s2ndvi::io::{EarthEngineClient, ExportRequest, ServiceConfig, load_shape_file};
use s2ndvi::{AreaOfInterest, DateRange, Geometry, RequestParams};

use super::args::CliArgs;
use super::errors::AppError;

/// Parse `expected` comma-separated numbers.
fn parse_coords(arg: &'static str, value: &str, expected: usize) -> Result<Vec<f64>, AppError> {
    let invalid = |reason: String| AppError::InvalidCoordinates {
        arg,
        value: value.to_string(),
        reason,
    };
    let coords = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(e.to_string()))?;
    if coords.len() != expected {
        return Err(invalid(format!(
            "expected {} numbers, got {}",
            expected,
            coords.len()
        )));
    }
    Ok(coords)
}

fn parse_point(value: &str) -> Result<AreaOfInterest, AppError> {
    let c = parse_coords("--point", value, 2)?;
    if !(-180.0..=180.0).contains(&c[0]) || !(-90.0..=90.0).contains(&c[1]) {
        return Err(AppError::InvalidCoordinates {
            arg: "--point",
            value: value.to_string(),
            reason: "longitude/latitude out of range".to_string(),
        });
    }
    Ok(AreaOfInterest::Point {
        lon: c[0],
        lat: c[1],
    })
}

fn parse_bbox(value: &str) -> Result<Geometry, AppError> {
    let c = parse_coords("--bbox", value, 4)?;
    let (west, south, east, north) = (c[0], c[1], c[2], c[3]);
    if west >= east || south >= north {
        return Err(AppError::InvalidCoordinates {
            arg: "--bbox",
            value: value.to_string(),
            reason: "west must be below east and south below north".to_string(),
        });
    }
    Ok(Geometry::rectangle(west, south, east, north))
}

fn build_params(args: &CliArgs) -> Result<RequestParams, AppError> {
    let mut params = match &args.params {
        Some(path) => {
            info!("Loading request parameters from {:?}", path);
            RequestParams::from_json_file(path)?
        }
        None => RequestParams::default(),
    };
    if let Some(point) = &args.point {
        params.aoi = Some(parse_point(point)?);
    }
    if args.start.is_some() || args.end.is_some() {
        let start = args
            .start
            .clone()
            .unwrap_or_else(|| params.dates.start.to_string());
        let end = args
            .end
            .clone()
            .unwrap_or_else(|| params.dates.end.to_string());
        params.dates = DateRange::parse(&start, &end)?;
    }
    Ok(params)
}

fn export_region(args: &CliArgs) -> Result<Geometry, AppError> {
    match (&args.region, &args.bbox) {
        (Some(path), _) => {
            let features = load_shape_file(path)?;
            if features.is_empty() {
                return Err(AppError::EmptyRegion {
                    path: path.display().to_string(),
                });
            }
            Ok(features.geometry())
        }
        (None, Some(bbox)) => parse_bbox(bbox),
        (None, None) => Err(AppError::MissingArgument {
            arg: "--region or --bbox".to_string(),
        }),
    }
}

fn log_report(report: &ExportReport) {
    info!(
        "Raster {}x{} ({}), extent {:?}",
        report.width, report.height, report.projection, report.extent
    );
    for (name, stats) in report.band_names.iter().zip(&report.statistics) {
        match stats {
            Some(s) => info!(
                "Band {}: min={:.4} max={:.4} mean={:.4} valid={}/{}",
                name, s.min, s.max, s.mean, s.valid, s.total
            ),
            None => warn!("Band {} has no valid pixels", name),
        }
    }
    match report.within {
        Some(true) => info!("Raster extent lies within the export region"),
        Some(false) => warn!("Raster extent exceeds the export region"),
        None => debug!("Extent check skipped for non-geographic raster"),
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    if !(args.scale.is_finite() && args.scale > 0.0) {
        return Err(AppError::InvalidScale { scale: args.scale }.into());
    }

    let params = build_params(&args)?;
    let region = export_region(&args)?;
    if params.aoi.is_none() {
        info!("No area of interest given, searching scenes over the export region");
    }
    let image = product_image(&params, args.product, Some(&region));
    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("{}.tif", args.product.to_string().to_lowercase()))
    });
    let request = ExportRequest::new(image, region, args.scale, output);

    if args.dry_run {
        let expression = serialize_request(&request.prepared_image());
        println!("{}", serde_json::to_string_pretty(&expression)?);
        return Ok(());
    }

    let client = EarthEngineClient::new(ServiceConfig::from_env()?)?;
    let summary = export_image(&client, &request)?;
    info!(
        "Exported {} to {:?} ({} bytes)",
        args.product, summary.path, summary.bytes
    );

    let report = inspect_export(&summary.path, request.region.bounds().as_ref())?;
    log_report(&report);
    Ok(())
}
