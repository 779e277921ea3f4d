use super::ImageryRequestBuilder;
use crate::expr::Image;

impl ImageryRequestBuilder {
    /// Single-band `ndvi` image: (NIR - Red) / (NIR + Red).
    ///
    /// Pixels where NIR + Red is zero are left to the service's division
    /// semantics and come back unset.
    pub fn ndvi(&self, img: &Image) -> Image {
        let sensor = self.sensor();
        let nir = img.select(&[&sensor.nir_band]);
        let red = img.select(&[&sensor.red_band]);
        nir.subtract(&red).divide(nir.add(&red)).rename(&["ndvi"])
    }
}
