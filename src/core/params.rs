use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expr::Geometry;
use crate::types::{AreaOfInterest, DateRange};

/// Cloud and shadow masking thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskParameters {
    /// Maximum scene-level cloudy pixel percentage kept by the fetcher
    pub cloud_filter: f64,
    /// Cloud probability (0-100) above which a pixel counts as cloud
    pub cloud_probability_threshold: f64,
    /// NIR reflectance (fraction of the reflectance scale) below which a
    /// non-water pixel is dark
    pub nir_dark_threshold: f64,
    /// Shadow projection distance; multiplied by 10 for the transform
    pub cloud_projection_distance: f64,
    /// Dilation applied to the cleaned cloud/shadow mask
    pub buffer: f64,
}

impl Default for MaskParameters {
    fn default() -> Self {
        Self {
            cloud_filter: 60.0,
            cloud_probability_threshold: 50.0,
            nir_dark_threshold: 0.15,
            cloud_projection_distance: 1.0,
            buffer: 50.0,
        }
    }
}

/// Collection ids, band names and fixed codes of the sensor product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorProfile {
    pub reflectance_collection: String,
    pub cloud_probability_collection: String,
    /// Field matched between the two collections by the join
    pub join_field: String,
    /// Property under which the matched cloud probability image is saved
    pub cloud_property: String,
    pub probability_band: String,
    /// Scene classification band used to exclude water
    pub scene_class_band: String,
    pub water_class: f64,
    pub nir_band: String,
    pub red_band: String,
    /// Pattern selecting the reflectance bands kept after masking
    pub reflectance_pattern: String,
    /// Integer value corresponding to a reflectance of 1.0
    pub reflectance_scale: f64,
    pub solar_azimuth_property: String,
    pub cloudy_pixel_property: String,
}

impl Default for SensorProfile {
    fn default() -> Self {
        Self {
            reflectance_collection: "COPERNICUS/S2_SR".to_string(),
            cloud_probability_collection: "COPERNICUS/S2_CLOUD_PROBABILITY".to_string(),
            join_field: "system:index".to_string(),
            cloud_property: "s2cloudless".to_string(),
            probability_band: "probability".to_string(),
            scene_class_band: "SCL".to_string(),
            water_class: 6.0,
            nir_band: "B8".to_string(),
            red_band: "B4".to_string(),
            reflectance_pattern: "B.*".to_string(),
            reflectance_scale: 1e4,
            solar_azimuth_property: "MEAN_SOLAR_AZIMUTH_ANGLE".to_string(),
            cloudy_pixel_property: "CLOUDY_PIXEL_PERCENTAGE".to_string(),
        }
    }
}

/// Complete request parameters suitable for config files
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    /// Area bounding the scene search; the export region is used when unset
    pub aoi: Option<AreaOfInterest>,
    pub dates: DateRange,
    pub mask: MaskParameters,
    pub sensor: SensorProfile,
}

impl RequestParams {
    /// Load parameters from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Geometry bounding the scene search: `aoi` when set, else `region`,
    /// else the default point.
    pub fn search_area(&self, region: Option<&Geometry>) -> Geometry {
        match (&self.aoi, region) {
            (Some(aoi), _) => aoi.to_geometry(),
            (None, Some(region)) => region.clone(),
            (None, None) => AreaOfInterest::default().to_geometry(),
        }
    }
}
