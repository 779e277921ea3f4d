use serde_json::Value;

use super::geometry::{Geometry, Number, Projection};
use super::node::Expr;

/// Handle to a remote raster with named bands.
///
/// All methods are pure: they return a new handle describing the operation
/// and leave `self` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Image(Expr);

impl Image {
    pub fn from_expr(expr: Expr) -> Self {
        Self(expr)
    }

    /// Reference a stored image asset by id.
    pub fn load(id: &str) -> Self {
        Self(Expr::call("Image.load").arg("id", id).build())
    }

    /// Single-band image with the same value everywhere.
    pub fn constant(value: f64) -> Self {
        Self(Expr::call("Image.constant").arg("value", value).build())
    }

    /// Interpret an arbitrary object (e.g. a joined property) as an image.
    pub fn cast(expr: Expr) -> Self {
        Self(expr)
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }

    pub fn into_expr(self) -> Expr {
        self.0
    }

    /// Select bands by name or regular expression.
    pub fn select<S: AsRef<str>>(&self, selectors: &[S]) -> Image {
        let names: Vec<Value> = selectors
            .iter()
            .map(|s| Value::from(s.as_ref()))
            .collect();
        self.invoke_input("Image.select", "bandSelectors", Value::Array(names))
    }

    pub fn select_index(&self, index: usize) -> Image {
        self.invoke_input("Image.select", "bandSelectors", Value::from(vec![index]))
    }

    pub fn rename<S: AsRef<str>>(&self, names: &[S]) -> Image {
        let names: Vec<Value> = names.iter().map(|s| Value::from(s.as_ref())).collect();
        self.invoke_input("Image.rename", "names", Value::Array(names))
    }

    /// Rename bands matching `regex`, replacing the first match.
    pub fn regexp_rename(&self, regex: &str, replacement: &str) -> Image {
        Image(
            Expr::call("Image.regexpRename")
                .arg("input", self.0.clone())
                .arg("regex", regex)
                .arg("replacement", replacement)
                .arg("all", false)
                .build(),
        )
    }

    /// Append the bands of `other`; existing bands are kept.
    pub fn add_bands(&self, other: &Image) -> Image {
        Image(
            Expr::call("Image.addBands")
                .arg("dstImg", self.0.clone())
                .arg("srcImg", other.0.clone())
                .build(),
        )
    }

    pub fn gt(&self, other: impl Into<Image>) -> Image {
        self.binary("Image.gt", other.into())
    }

    pub fn lt(&self, other: impl Into<Image>) -> Image {
        self.binary("Image.lt", other.into())
    }

    pub fn neq(&self, other: impl Into<Image>) -> Image {
        self.binary("Image.neq", other.into())
    }

    pub fn add(&self, other: impl Into<Image>) -> Image {
        self.binary("Image.add", other.into())
    }

    pub fn subtract(&self, other: impl Into<Image>) -> Image {
        self.binary("Image.subtract", other.into())
    }

    pub fn multiply(&self, other: impl Into<Image>) -> Image {
        self.binary("Image.multiply", other.into())
    }

    pub fn divide(&self, other: impl Into<Image>) -> Image {
        self.binary("Image.divide", other.into())
    }

    /// Logical inversion: 1 where the pixel is zero, 0 elsewhere.
    pub fn not(&self) -> Image {
        Image(Expr::call("Image.not").arg("value", self.0.clone()).build())
    }

    /// The image's validity mask as pixel values.
    pub fn mask(&self) -> Image {
        Image(Expr::call("Image.mask").arg("image", self.0.clone()).build())
    }

    pub fn update_mask(&self, mask: &Image) -> Image {
        Image(
            Expr::call("Image.updateMask")
                .arg("image", self.0.clone())
                .arg("mask", mask.0.clone())
                .build(),
        )
    }

    /// Replace masked pixels with `value` and make every pixel valid.
    pub fn unmask(&self, value: f64) -> Image {
        self.invoke_input("Image.unmask", "value", Value::from(value))
    }

    pub fn clip(&self, geometry: &Geometry) -> Image {
        Image(
            Expr::call("Image.clip")
                .arg("input", self.0.clone())
                .arg("geometry", geometry)
                .build(),
        )
    }

    /// Clip to the bounds of `geometry` and resample to `scale` units per pixel.
    pub fn clip_to_bounds_and_scale(&self, geometry: &Geometry, scale: f64) -> Image {
        Image(
            Expr::call("Image.clipToBoundsAndScale")
                .arg("input", self.0.clone())
                .arg("geometry", geometry)
                .arg("scale", scale)
                .build(),
        )
    }

    pub fn projection(&self) -> Projection {
        Projection::from_expr(Expr::call("Image.projection").arg("image", self.0.clone()).build())
    }

    pub fn reproject(&self, crs: &Projection, scale: f64) -> Image {
        Image(
            Expr::call("Image.reproject")
                .arg("image", self.0.clone())
                .arg("crs", crs)
                .arg("scale", scale)
                .build(),
        )
    }

    /// Morphological erosion with a circular kernel of `radius` pixels.
    pub fn focal_min(&self, radius: f64) -> Image {
        self.focal("Image.focalMin", radius)
    }

    /// Morphological dilation with a circular kernel of `radius` pixels.
    pub fn focal_max(&self, radius: f64) -> Image {
        self.focal("Image.focalMax", radius)
    }

    /// Distance (in pixels, up to `max_distance`) from each pixel to the
    /// nearest non-zero source pixel, searching along `angle` degrees.
    /// Produces `distance` and `labels` bands; pixels out of reach are masked.
    pub fn directional_distance_transform(&self, angle: &Number, max_distance: f64) -> Image {
        Image(
            Expr::call("Image.directionalDistanceTransform")
                .arg("source", self.0.clone())
                .arg("angle", angle)
                .arg("maxDistance", max_distance)
                .build(),
        )
    }

    /// Property of the image's metadata.
    pub fn get(&self, property: &str) -> Expr {
        Expr::call("Element.get")
            .arg("object", self.0.clone())
            .arg("property", property)
            .build()
    }

    pub fn get_number(&self, property: &str) -> Number {
        Number::from_expr(self.get(property))
    }

    fn focal(&self, function: &str, radius: f64) -> Image {
        Image(
            Expr::call(function)
                .arg("image", self.0.clone())
                .arg("radius", radius)
                .arg("kernelType", "circle")
                .arg("units", "pixels")
                .arg("iterations", 1i64)
                .build(),
        )
    }

    fn binary(&self, function: &str, other: Image) -> Image {
        Image(
            Expr::call(function)
                .arg("image1", self.0.clone())
                .arg("image2", other.0)
                .build(),
        )
    }

    fn invoke_input(&self, function: &str, name: &str, value: Value) -> Image {
        Image(
            Expr::call(function)
                .arg("input", self.0.clone())
                .arg(name, value)
                .build(),
        )
    }
}

impl From<f64> for Image {
    fn from(v: f64) -> Self {
        Image::constant(v)
    }
}

impl From<&Image> for Image {
    fn from(img: &Image) -> Self {
        img.clone()
    }
}

impl From<&Image> for Expr {
    fn from(img: &Image) -> Self {
        img.0.clone()
    }
}
