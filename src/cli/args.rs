use clap::Parser;
use std::path::PathBuf;

use s2ndvi::Product;

#[derive(Parser, Debug)]
#[command(
    name = "s2ndvi",
    version,
    about = "Cloud-masked Sentinel-2 composite and NDVI export"
)]
pub struct CliArgs {
    /// JSON file with request parameters (area, dates, mask thresholds, sensor)
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Query point as "lon,lat" (overrides the area in --params)
    #[arg(long, allow_hyphen_values = true)]
    pub point: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Vector file (shapefile, GeoPackage, GeoJSON) whose features define the export region
    #[arg(long, conflicts_with = "bbox")]
    pub region: Option<PathBuf>,

    /// Export region as "west,south,east,north" in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<String>,

    /// Export scale in meters per pixel
    #[arg(long, default_value_t = 10.0)]
    pub scale: f64,

    /// Output GeoTIFF path (defaults to <product>.tif)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Product to export (ndvi or composite)
    #[arg(long, value_enum, default_value_t = Product::Ndvi)]
    pub product: Product,

    /// Print the serialized request instead of submitting it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
