//! Vector boundary loading: any OGR-readable file (shapefile, GeoPackage,
//! GeoJSON, ...) becomes a remote `FeatureCollection` in lon/lat.
use std::path::Path;

use gdal::Dataset;
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use gdal::vector::{FieldValue, LayerAccess};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::expr::{FeatureCollection, Geometry};
use crate::io::gdal::GdalError;

/// Load the first layer of a vector file as a feature collection.
pub fn load_shape_file<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let path = path.as_ref();
    info!("Loading vector boundary from {:?}", path);
    let features = read_features(path)?;
    if features.is_empty() {
        warn!("No features with geometry found in {:?}", path);
    }

    let mut collected = Vec::with_capacity(features.len());
    for (geojson, properties) in features {
        let value: Value = serde_json::from_str(&geojson)?;
        collected.push((Geometry::from_geojson(&value)?, properties));
    }
    let collection = FeatureCollection::from_features(collected);
    debug!(
        "Loaded {} features, bounds {:?}",
        collection.len(),
        collection.bounds()
    );
    Ok(collection)
}

/// GeoJSON geometry strings (EPSG:4326, lon/lat order) and attributes.
fn read_features(path: &Path) -> std::result::Result<Vec<(String, Map<String, Value>)>, GdalError> {
    let dataset = Dataset::open(path)?;
    let mut layer = dataset.layer(0)?;

    let transform = match layer.spatial_ref() {
        Some(mut src) if src.auth_code().ok() != Some(4326) => {
            src.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
            let mut dst = SpatialRef::from_epsg(4326)?;
            dst.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
            debug!("Reprojecting features to EPSG:4326");
            Some(CoordTransform::new(&src, &dst)?)
        }
        _ => None,
    };

    let mut out = Vec::new();
    for feature in layer.features() {
        let Some(geometry) = feature.geometry() else {
            continue;
        };
        let json = match &transform {
            Some(ct) => geometry.transform(ct)?.json()?,
            None => geometry.json()?,
        };
        let mut properties = Map::new();
        for (name, value) in feature.fields() {
            if let Some(value) = value {
                properties.insert(name, field_to_json(value));
            }
        }
        out.push((json, properties));
    }
    Ok(out)
}

fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::IntegerValue(v) => Value::from(v),
        FieldValue::Integer64Value(v) => Value::from(v),
        FieldValue::RealValue(v) => Value::from(v),
        FieldValue::StringValue(v) => Value::from(v),
        other => Value::from(format!("{:?}", other)),
    }
}
