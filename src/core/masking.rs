use super::ImageryRequestBuilder;
use crate::expr::{Image, Number};

/// Scale (m) at which the shadow projection is evaluated.
const SHADOW_PROJECTION_SCALE: f64 = 100.0;
/// Scale (m) at which the combined mask is cleaned.
const MASK_SCALE: f64 = 20.0;
/// Erosion radius (pixels) removing isolated cloud/shadow detections.
const EROSION_RADIUS: f64 = 2.0;

impl ImageryRequestBuilder {
    /// Append the cloud probability band of the joined image and a binary
    /// `clouds` band thresholded at the configured probability.
    pub fn add_cloud_bands(&self, img: &Image) -> Image {
        let sensor = self.sensor();
        let probability =
            Image::cast(img.get(&sensor.cloud_property)).select(&[&sensor.probability_band]);
        let is_cloud = probability
            .gt(self.params().cloud_probability_threshold)
            .rename(&["clouds"]);
        img.add_bands(&probability.add_bands(&is_cloud))
    }

    /// Append `dark_pixels`, `cloud_transform` and `shadows` bands.
    ///
    /// Expects the `clouds` band from [`Self::add_cloud_bands`]. Shadows are
    /// dark non-water pixels inside the cloud mask projected away from the sun.
    pub fn add_shadow_bands(&self, img: &Image) -> Image {
        let sensor = self.sensor();
        let params = self.params();

        let not_water = img
            .select(&[&sensor.scene_class_band])
            .neq(sensor.water_class);

        let dark_pixels = img
            .select(&[&sensor.nir_band])
            .lt(params.nir_dark_threshold * sensor.reflectance_scale)
            .multiply(&not_water)
            .rename(&["dark_pixels"]);

        // Assumes a UTM projection: 0 degrees points east.
        let shadow_azimuth =
            Number::from(90.0).subtract(img.get_number(&sensor.solar_azimuth_property));

        let cloud_transform = img
            .select(&["clouds"])
            .directional_distance_transform(
                &shadow_azimuth,
                params.cloud_projection_distance * 10.0,
            )
            .reproject(&img.select_index(0).projection(), SHADOW_PROJECTION_SCALE)
            .select(&["distance"])
            .mask()
            .rename(&["cloud_transform"]);

        let shadows = cloud_transform.multiply(&dark_pixels).rename(&["shadows"]);

        img.add_bands(&dark_pixels.add_bands(&cloud_transform).add_bands(&shadows))
    }

    /// Append the cleaned binary `cloudmask` band (1 = cloud or shadow).
    pub fn add_cloud_shadow_mask(&self, img: &Image) -> Image {
        let img_cloud = self.add_cloud_bands(img);
        let img_cloud_shadow = self.add_shadow_bands(&img_cloud);

        let is_cloud_shadow = img_cloud_shadow
            .select(&["clouds"])
            .add(img_cloud_shadow.select(&["shadows"]))
            .gt(0.0);

        let dilation = self.params().buffer * 2.0 / MASK_SCALE;
        let cloudmask = is_cloud_shadow
            .focal_min(EROSION_RADIUS)
            .focal_max(dilation)
            .reproject(&img.select_index(0).projection(), MASK_SCALE)
            .rename(&["cloudmask"]);

        img_cloud_shadow.add_bands(&cloudmask)
    }

    /// Reflectance bands with cloud and shadow pixels masked out; every other
    /// band is dropped.
    pub fn apply_cloud_shadow_mask(&self, img: &Image) -> Image {
        let not_cloud_shadow = img.select(&["cloudmask"]).not();
        img.select(&[&self.sensor().reflectance_pattern])
            .update_mask(&not_cloud_shadow)
    }
}
