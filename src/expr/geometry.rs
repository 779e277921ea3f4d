use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::node::Expr;
use crate::error::{Error, Result};

/// Axis-aligned lon/lat extent kept locally alongside a remote geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            west: lon,
            south: lat,
            east: lon,
            north: lat,
        }
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// True when `other` lies inside `self` grown by `tolerance` on every side.
    pub fn contains(&self, other: &BoundingBox, tolerance: f64) -> bool {
        other.west >= self.west - tolerance
            && other.east <= self.east + tolerance
            && other.south >= self.south - tolerance
            && other.north <= self.north + tolerance
    }

    /// Extent of every coordinate pair found in a GeoJSON geometry.
    pub fn from_geojson(geometry: &Value) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        if let Some(coords) = geometry.get("coordinates") {
            collect_positions(coords, &mut bbox);
        }
        if let Some(Value::Array(parts)) = geometry.get("geometries") {
            for part in parts {
                if let Some(b) = BoundingBox::from_geojson(part) {
                    bbox = Some(bbox.map_or(b, |acc| acc.union(&b)));
                }
            }
        }
        bbox
    }
}

fn collect_positions(coords: &Value, bbox: &mut Option<BoundingBox>) {
    let Value::Array(items) = coords else {
        return;
    };
    if let [Value::Number(x), Value::Number(y), ..] = items.as_slice() {
        if let (Some(lon), Some(lat)) = (x.as_f64(), y.as_f64()) {
            let p = BoundingBox::point(lon, lat);
            *bbox = Some(bbox.map_or(p, |acc| acc.union(&p)));
        }
        return;
    }
    for item in items {
        collect_positions(item, bbox);
    }
}

/// Remote geometry handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    expr: Expr,
    bounds: Option<BoundingBox>,
}

impl Geometry {
    pub fn from_expr(expr: Expr, bounds: Option<BoundingBox>) -> Self {
        Self { expr, bounds }
    }

    pub fn point(lon: f64, lat: f64) -> Self {
        let expr = Expr::call("GeometryConstructors.Point")
            .arg("coordinates", json!([lon, lat]))
            .build();
        Self::from_expr(expr, Some(BoundingBox::point(lon, lat)))
    }

    /// Single-ring polygon from lon/lat vertices.
    pub fn polygon(ring: &[[f64; 2]]) -> Self {
        let coordinates = json!([ring]);
        let bounds = BoundingBox::from_geojson(&json!({ "coordinates": coordinates }));
        let expr = Expr::call("GeometryConstructors.Polygon")
            .arg("coordinates", coordinates)
            .build();
        Self::from_expr(expr, bounds)
    }

    pub fn rectangle(west: f64, south: f64, east: f64, north: f64) -> Self {
        let expr = Expr::call("GeometryConstructors.Rectangle")
            .arg("coordinates", json!([west, south, east, north]))
            .build();
        Self::from_expr(
            expr,
            Some(BoundingBox {
                west,
                south,
                east,
                north,
            }),
        )
    }

    /// Build a remote geometry from a GeoJSON geometry object.
    pub fn from_geojson(geometry: &Value) -> Result<Self> {
        let kind = geometry
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Processing("GeoJSON geometry without `type`".into()))?;
        let expr = match kind {
            "GeometryCollection" => {
                let parts = geometry
                    .get("geometries")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        Error::Processing("GeometryCollection without `geometries`".into())
                    })?;
                let members = parts
                    .iter()
                    .map(|g| Geometry::from_geojson(g).map(Geometry::into_expr))
                    .collect::<Result<Vec<_>>>()?;
                Expr::call("GeometryConstructors.MultiGeometry")
                    .arg("geometries", Expr::Array(members))
                    .build()
            }
            "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "LinearRing"
            | "Polygon" | "MultiPolygon" => {
                let coordinates = geometry.get("coordinates").cloned().ok_or_else(|| {
                    Error::Processing(format!("{kind} geometry without `coordinates`"))
                })?;
                Expr::call(&format!("GeometryConstructors.{kind}"))
                    .arg("coordinates", coordinates)
                    .build()
            }
            other => {
                return Err(Error::InvalidArgument {
                    arg: "geometry type",
                    value: other.to_string(),
                });
            }
        };
        Ok(Self::from_expr(expr, BoundingBox::from_geojson(geometry)))
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }
}

impl From<&Geometry> for Expr {
    fn from(g: &Geometry) -> Self {
        g.expr.clone()
    }
}

/// Remote number handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Number(Expr);

impl Number {
    pub fn from_expr(expr: Expr) -> Self {
        Self(expr)
    }

    pub fn subtract(&self, other: impl Into<Number>) -> Number {
        Number(
            Expr::call("Number.subtract")
                .arg("left", self.0.clone())
                .arg("right", other.into().0)
                .build(),
        )
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number(Expr::from(v))
    }
}

impl From<&Number> for Expr {
    fn from(n: &Number) -> Self {
        n.0.clone()
    }
}

/// Remote projection handle, as returned by `Image.projection`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection(Expr);

impl Projection {
    pub fn from_expr(expr: Expr) -> Self {
        Self(expr)
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }
}

impl From<&Projection> for Expr {
    fn from(p: &Projection) -> Self {
        p.0.clone()
    }
}
