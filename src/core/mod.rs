//! Core request-building blocks: parameters, the collection fetcher, cloud and
//! shadow mask derivation, compositing and the vegetation index. Every step
//! returns a new symbolic handle; nothing here talks to the service.
pub mod composite;
pub mod fetch;
pub mod index;
pub mod masking;
pub mod params;

use params::{MaskParameters, SensorProfile};

/// Builds the remote requests of the cloud-masked NDVI workflow.
///
/// Holds only immutable configuration, so one builder can be shared between
/// threads and several builders with different parameters can coexist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageryRequestBuilder {
    params: MaskParameters,
    sensor: SensorProfile,
}

impl ImageryRequestBuilder {
    pub fn new(params: MaskParameters, sensor: SensorProfile) -> Self {
        Self { params, sensor }
    }

    pub fn params(&self) -> &MaskParameters {
        &self.params
    }

    pub fn sensor(&self) -> &SensorProfile {
        &self.sensor
    }
}
