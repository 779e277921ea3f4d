use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::geometry::{BoundingBox, Geometry};
use super::image::Image;
use super::node::Expr;

/// Handle to a lazily evaluated remote sequence of images.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCollection(Expr);

impl ImageCollection {
    pub fn from_expr(expr: Expr) -> Self {
        Self(expr)
    }

    pub fn load(id: &str) -> Self {
        Self(Expr::call("ImageCollection.load").arg("id", id).build())
    }

    pub fn from_images(images: &[Image]) -> Self {
        let items = images.iter().map(Expr::from).collect();
        Self(
            Expr::call("ImageCollection.fromImages")
                .arg("images", Expr::Array(items))
                .build(),
        )
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }

    pub fn filter(&self, filter: &Filter) -> ImageCollection {
        Self(
            Expr::call("Collection.filter")
                .arg("collection", self.0.clone())
                .arg("filter", filter.0.clone())
                .build(),
        )
    }

    pub fn filter_bounds(&self, geometry: &Geometry) -> ImageCollection {
        self.filter(&Filter::bounds(geometry))
    }

    pub fn filter_date(&self, start: NaiveDate, end: NaiveDate) -> ImageCollection {
        self.filter(&Filter::date(start, end))
    }

    /// Apply `f` to every image on the server.
    ///
    /// `f` is traced twice: once to measure how many function definitions its
    /// body already nests, then with the final `_MAPPING_VAR_<depth>_0`
    /// argument so nested maps never shadow each other.
    pub fn map<F>(&self, f: F) -> ImageCollection
    where
        F: Fn(&Image) -> Image,
    {
        let probe = f(&Image::from_expr(Expr::Argument("_MAPPING_VAR_PROBE".into())));
        let name = format!("_MAPPING_VAR_{}_0", probe.expr().function_depth());
        let body = f(&Image::from_expr(Expr::Argument(name.clone())));
        let algorithm = Expr::function(vec![name], body.into_expr());
        Self(
            Expr::call("Collection.map")
                .arg("collection", self.0.clone())
                .arg("baseAlgorithm", algorithm)
                .build(),
        )
    }

    pub fn reduce(&self, reducer: &Reducer) -> Image {
        Image::from_expr(
            Expr::call("ImageCollection.reduce")
                .arg("collection", self.0.clone())
                .arg("reducer", reducer.0.clone())
                .build(),
        )
    }

    /// Per-pixel median across the stack; output bands keep the input names.
    pub fn median(&self) -> Image {
        self.reduce(&Reducer::median()).regexp_rename("_median$", "")
    }
}

/// Server-side predicate over collection elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter(Expr);

impl Filter {
    pub fn expr(&self) -> &Expr {
        &self.0
    }

    /// Elements whose footprint intersects `geometry`.
    pub fn bounds(geometry: &Geometry) -> Self {
        Self(
            Expr::call("Filter.intersects")
                .arg("leftField", ".all")
                .arg("rightValue", geometry)
                .build(),
        )
    }

    /// Elements acquired in `[start, end)`.
    pub fn date(start: NaiveDate, end: NaiveDate) -> Self {
        let range = Expr::call("DateRange")
            .arg("start", date_expr(start))
            .arg("end", date_expr(end))
            .build();
        Self(
            Expr::call("Filter.dateRangeContains")
                .arg("leftValue", range)
                .arg("rightField", "system:time_start")
                .build(),
        )
    }

    /// `field <= value` on element metadata.
    pub fn lte(field: &str, value: f64) -> Self {
        Self(
            Expr::call("Filter.lessThanOrEquals")
                .arg("leftField", field)
                .arg("rightValue", value)
                .build(),
        )
    }

    /// Equality between a primary and a secondary field, for joins.
    pub fn equals_fields(left_field: &str, right_field: &str) -> Self {
        Self(
            Expr::call("Filter.equals")
                .arg("leftField", left_field)
                .arg("rightField", right_field)
                .build(),
        )
    }
}

fn date_expr(date: NaiveDate) -> Expr {
    Expr::call("Date")
        .arg("value", date.format("%Y-%m-%d").to_string())
        .build()
}

/// Server-side join definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Join(Expr);

impl Join {
    /// Inner join keeping the first secondary match under `match_key`.
    pub fn save_first(match_key: &str) -> Self {
        Self(
            Expr::call("Join.saveFirst")
                .arg("matchKey", match_key)
                .build(),
        )
    }

    pub fn apply(
        &self,
        primary: &ImageCollection,
        secondary: &ImageCollection,
        condition: &Filter,
    ) -> ImageCollection {
        ImageCollection(
            Expr::call("Join.apply")
                .arg("join", self.0.clone())
                .arg("primary", primary.0.clone())
                .arg("secondary", secondary.0.clone())
                .arg("condition", condition.0.clone())
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reducer(Expr);

impl Reducer {
    pub fn median() -> Self {
        Self(Expr::call("Reducer.median").build())
    }
}

/// Remote vector collection, with the local extent of its features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    expr: Expr,
    bounds: Option<BoundingBox>,
    len: usize,
}

impl FeatureCollection {
    /// Collection of features built from geometries and their attributes.
    pub fn from_features(features: Vec<(Geometry, Map<String, Value>)>) -> Self {
        let len = features.len();
        let mut bounds: Option<BoundingBox> = None;
        let mut items = Vec::with_capacity(len);
        for (geometry, properties) in features {
            if let Some(b) = geometry.bounds() {
                bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
            }
            items.push(
                Expr::call("Feature")
                    .arg("geometry", geometry.into_expr())
                    .arg("metadata", Value::Object(properties))
                    .build(),
            );
        }
        let expr = Expr::call("Collection")
            .arg("features", Expr::Array(items))
            .build();
        Self { expr, bounds, len }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Union of all feature geometries, computed remotely.
    pub fn geometry(&self) -> Geometry {
        Geometry::from_expr(
            Expr::call("Collection.geometry")
                .arg("collection", self.expr.clone())
                .build(),
            self.bounds,
        )
    }
}
