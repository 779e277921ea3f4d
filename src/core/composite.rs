use tracing::debug;

use super::ImageryRequestBuilder;
use crate::expr::{Image, ImageCollection};

impl ImageryRequestBuilder {
    /// Cloud-masked per-pixel median of `collection`.
    ///
    /// Pixels masked in every contributing scene stay unset in the result.
    pub fn cloud_masked_composite(&self, collection: &ImageCollection) -> Image {
        debug!("Building cloud-masked median composite");
        collection
            .map(|img| self.add_cloud_shadow_mask(img))
            .map(|img| self.apply_cloud_shadow_mask(img))
            .median()
    }
}
