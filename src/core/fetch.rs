use tracing::debug;

use super::ImageryRequestBuilder;
use crate::expr::{Filter, Geometry, ImageCollection, Join};
use crate::types::DateRange;

impl ImageryRequestBuilder {
    /// Surface reflectance scenes over `aoi` within `dates`, each carrying its
    /// matching cloud probability image under the configured property.
    ///
    /// Scenes above the cloud filter are dropped, and so are scenes without a
    /// cloud probability partner (inner join on the join field).
    pub fn get_collection(&self, aoi: &Geometry, dates: &DateRange) -> ImageCollection {
        let sensor = self.sensor();
        debug!(
            "Building joined collection {} + {} for {}",
            sensor.reflectance_collection, sensor.cloud_probability_collection, dates
        );

        let reflectance = ImageCollection::load(&sensor.reflectance_collection)
            .filter_bounds(aoi)
            .filter_date(dates.start, dates.end)
            .filter(&Filter::lte(
                &sensor.cloudy_pixel_property,
                self.params().cloud_filter,
            ));

        let cloud_probability = ImageCollection::load(&sensor.cloud_probability_collection)
            .filter_bounds(aoi)
            .filter_date(dates.start, dates.end);

        Join::save_first(&sensor.cloud_property).apply(
            &reflectance,
            &cloud_probability,
            &Filter::equals_fields(&sensor.join_field, &sensor.join_field),
        )
    }
}
