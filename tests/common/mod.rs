//! Local stand-in for the remote service: evaluates serialized request graphs
//! over small in-memory grids, and a `ComputeService` that writes the result
//! as a GeoTIFF.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{DriverManager, Metadata};
use ndarray::{Array2, s};
use serde_json::{Value, json};

use s2ndvi::io::PixelRequest;
use s2ndvi::{BoundingBox, ComputeService, GdalError};

#[derive(Clone, Debug)]
pub struct Band {
    pub name: String,
    pub values: Array2<f64>,
    pub valid: Array2<bool>,
}

impl Band {
    pub fn new(name: &str, values: Array2<f64>) -> Self {
        let valid = Array2::from_elem(values.dim(), true);
        Self {
            name: name.to_string(),
            values,
            valid,
        }
    }

    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.valid[[row, col]]
    }
}

#[derive(Clone, Debug, Default)]
pub struct Raster {
    pub bands: Vec<Band>,
    pub properties: BTreeMap<String, Val>,
    /// Set by `Image.clipToBoundsAndScale`
    pub extent: Option<BoundingBox>,
}

impl Raster {
    pub fn band(&self, name: &str) -> &Band {
        self.bands
            .iter()
            .find(|b| b.name == name)
            .unwrap_or_else(|| panic!("no band {name} in {:?}", self.band_names()))
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), Val::Json(value));
        self
    }
}

#[derive(Clone, Debug)]
pub enum Val {
    Json(Value),
    Image(Raster),
    Collection(Vec<Raster>),
    Function { args: Vec<String>, body: String },
    Array(Vec<Val>),
    Filter(FilterSpec),
    Join(String),
    Bounds(BoundingBox),
    Reducer,
    Opaque,
}

#[derive(Clone, Debug)]
pub enum FilterSpec {
    All,
    LessThanOrEquals { field: String, value: f64 },
    Equals { left: String, right: String },
}

/// Stored assets the graph can load.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub collections: HashMap<String, Vec<Raster>>,
    pub images: HashMap<String, Raster>,
    pub shape: (usize, usize),
    /// Lon/lat area every grid spans; without it clipping keeps all pixels
    pub footprint: Option<BoundingBox>,
}

impl Catalog {
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    pub fn with_collection(mut self, id: &str, rasters: Vec<Raster>) -> Self {
        self.collections.insert(id.to_string(), rasters);
        self
    }

    pub fn with_image(mut self, id: &str, raster: Raster) -> Self {
        self.images.insert(id.to_string(), raster);
        self
    }

    pub fn with_footprint(mut self, footprint: BoundingBox) -> Self {
        self.footprint = Some(footprint);
        self
    }
}

/// Surface reflectance scene with the metadata the fetcher and shadow step read.
pub fn reflectance_scene(
    index: &str,
    cloudy_percentage: f64,
    solar_azimuth: f64,
    bands: Vec<Band>,
) -> Raster {
    Raster {
        bands,
        ..Raster::default()
    }
    .with_property("system:index", json!(index))
    .with_property("CLOUDY_PIXEL_PERCENTAGE", json!(cloudy_percentage))
    .with_property("MEAN_SOLAR_AZIMUTH_ANGLE", json!(solar_azimuth))
}

pub fn probability_scene(index: &str, probability: Array2<f64>) -> Raster {
    Raster {
        bands: vec![Band::new("probability", probability)],
        ..Raster::default()
    }
    .with_property("system:index", json!(index))
}

/// Evaluate a serialized `{"result", "values"}` document.
pub fn evaluate(doc: &Value, catalog: &Catalog) -> Val {
    let interpreter = Interpreter { doc, catalog };
    let root = doc["result"].as_str().expect("result key");
    interpreter.eval_key(root, &HashMap::new())
}

pub fn evaluate_image(doc: &Value, catalog: &Catalog) -> Raster {
    match evaluate(doc, catalog) {
        Val::Image(r) => r,
        other => panic!("expected image, got {other:?}"),
    }
}

pub fn evaluate_collection(doc: &Value, catalog: &Catalog) -> Vec<Raster> {
    match evaluate(doc, catalog) {
        Val::Collection(c) => c,
        other => panic!("expected collection, got {other:?}"),
    }
}

type Env = HashMap<String, Val>;

struct Interpreter<'a> {
    doc: &'a Value,
    catalog: &'a Catalog,
}

impl Interpreter<'_> {
    fn eval_key(&self, key: &str, env: &Env) -> Val {
        let value = &self.doc["values"][key];
        assert!(!value.is_null(), "dangling reference {key}");
        self.eval(value, env)
    }

    fn eval(&self, value: &Value, env: &Env) -> Val {
        if let Some(c) = value.get("constantValue") {
            return Val::Json(c.clone());
        }
        if let Some(key) = value.get("valueReference").and_then(Value::as_str) {
            return self.eval_key(key, env);
        }
        if let Some(name) = value.get("argumentReference").and_then(Value::as_str) {
            return env
                .get(name)
                .cloned()
                .unwrap_or_else(|| panic!("unbound argument {name}"));
        }
        if let Some(array) = value.get("arrayValue") {
            let items = array["values"].as_array().expect("array values");
            return Val::Array(items.iter().map(|v| self.eval(v, env)).collect());
        }
        if let Some(def) = value.get("functionDefinitionValue") {
            let args = def["argumentNames"]
                .as_array()
                .expect("argument names")
                .iter()
                .map(|a| a.as_str().expect("argument name").to_string())
                .collect();
            let body = def["body"].as_str().expect("body key").to_string();
            return Val::Function { args, body };
        }
        if let Some(inv) = value.get("functionInvocationValue") {
            let name = inv["functionName"].as_str().expect("function name");
            let mut args = HashMap::new();
            if let Some(map) = inv["arguments"].as_object() {
                for (k, v) in map {
                    args.insert(k.clone(), self.eval(v, env));
                }
            }
            return self.invoke(name, args, env);
        }
        panic!("unsupported value {value}");
    }

    fn invoke(&self, name: &str, mut args: HashMap<String, Val>, env: &Env) -> Val {
        let mut take = |k: &str| {
            args.remove(k)
                .unwrap_or_else(|| panic!("{name}: missing argument {k}"))
        };
        match name {
            "Image.load" => {
                let id = json_str(&take("id"));
                Val::Image(self.catalog.images[&id].clone())
            }
            "ImageCollection.load" => {
                let id = json_str(&take("id"));
                Val::Collection(self.catalog.collections[&id].clone())
            }
            "ImageCollection.fromImages" => match take("images") {
                Val::Array(items) => Val::Collection(items.into_iter().map(image).collect()),
                other => panic!("fromImages: {other:?}"),
            },
            "Collection.filter" => {
                let rasters = collection(take("collection"));
                let Val::Filter(filter) = take("filter") else {
                    panic!("filter expected");
                };
                Val::Collection(rasters.into_iter().filter(|r| keep(&filter, r)).collect())
            }
            "Filter.intersects" | "Filter.dateRangeContains" => Val::Filter(FilterSpec::All),
            "Filter.lessThanOrEquals" => Val::Filter(FilterSpec::LessThanOrEquals {
                field: json_str(&take("leftField")),
                value: number(&take("rightValue")),
            }),
            "Filter.equals" => Val::Filter(FilterSpec::Equals {
                left: json_str(&take("leftField")),
                right: json_str(&take("rightField")),
            }),
            "Join.saveFirst" => Val::Join(json_str(&take("matchKey"))),
            "Join.apply" => {
                let Val::Join(key) = take("join") else {
                    panic!("join expected");
                };
                let Val::Filter(FilterSpec::Equals { left, right }) = take("condition") else {
                    panic!("equality condition expected");
                };
                let secondary = collection(take("secondary"));
                let joined = collection(take("primary"))
                    .into_iter()
                    .filter_map(|mut p| {
                        let want = json_prop(&p, &left);
                        let partner = secondary.iter().find(|s| json_prop(s, &right) == want)?;
                        p.properties.insert(key.clone(), Val::Image(partner.clone()));
                        Some(p)
                    })
                    .collect();
                Val::Collection(joined)
            }
            "Element.get" => {
                let raster = image(take("object"));
                let property = json_str(&take("property"));
                raster
                    .properties
                    .get(&property)
                    .cloned()
                    .unwrap_or(Val::Json(Value::Null))
            }
            "Number.subtract" => Val::Json(json!(number(&take("left")) - number(&take("right")))),
            "Image.constant" => {
                let v = number(&take("value"));
                Val::Image(Raster {
                    bands: vec![Band::new(
                        "constant",
                        Array2::from_elem(self.catalog.shape, v),
                    )],
                    ..Raster::default()
                })
            }
            "Image.select" => {
                let mut r = image(take("input"));
                let Val::Json(Value::Array(selectors)) = take("bandSelectors") else {
                    panic!("selectors expected");
                };
                let mut bands = Vec::new();
                for s in &selectors {
                    match s {
                        Value::Number(n) => {
                            bands.push(r.bands[n.as_u64().unwrap() as usize].clone())
                        }
                        Value::String(p) => {
                            bands.extend(r.bands.iter().filter(|b| matches(p, &b.name)).cloned())
                        }
                        other => panic!("selector {other}"),
                    }
                }
                r.bands = bands;
                Val::Image(r)
            }
            "Image.rename" => {
                let mut r = image(take("input"));
                let Val::Json(Value::Array(names)) = take("names") else {
                    panic!("names expected");
                };
                assert_eq!(names.len(), r.bands.len(), "rename arity");
                for (b, n) in r.bands.iter_mut().zip(&names) {
                    b.name = n.as_str().unwrap().to_string();
                }
                Val::Image(r)
            }
            "Image.regexpRename" => {
                let mut r = image(take("input"));
                let regex = json_str(&take("regex"));
                let replacement = json_str(&take("replacement"));
                let suffix = regex.strip_suffix('$').expect("anchored suffix pattern");
                for b in &mut r.bands {
                    if let Some(stem) = b.name.strip_suffix(suffix) {
                        b.name = format!("{stem}{replacement}");
                    }
                }
                Val::Image(r)
            }
            "Image.addBands" => {
                let mut dst = image(take("dstImg"));
                dst.bands.extend(image(take("srcImg")).bands);
                Val::Image(dst)
            }
            "Image.gt" | "Image.lt" | "Image.neq" | "Image.add" | "Image.subtract"
            | "Image.multiply" | "Image.divide" => {
                let a = image(take("image1"));
                let b = image(take("image2"));
                Val::Image(binary(name, a, b))
            }
            "Image.not" => {
                let mut r = image(take("value"));
                for b in &mut r.bands {
                    b.values.mapv_inplace(|v| if v == 0.0 { 1.0 } else { 0.0 });
                }
                Val::Image(r)
            }
            "Image.mask" => {
                let mut r = image(take("image"));
                for b in &mut r.bands {
                    b.values = b.valid.mapv(|v| if v { 1.0 } else { 0.0 });
                    b.valid.fill(true);
                }
                Val::Image(r)
            }
            "Image.updateMask" => {
                let mut r = image(take("image"));
                let m = image(take("mask"));
                assert_eq!(m.bands.len(), 1, "single-band mask");
                let mask = &m.bands[0];
                for b in &mut r.bands {
                    ndarray::Zip::from(&mut b.valid)
                        .and(&mask.values)
                        .and(&mask.valid)
                        .for_each(|v, &mv, &mok| *v = *v && mok && mv != 0.0);
                }
                Val::Image(r)
            }
            "Image.unmask" => {
                let mut r = image(take("input"));
                let fill = number(&take("value"));
                for b in &mut r.bands {
                    ndarray::Zip::from(&mut b.values)
                        .and(&b.valid)
                        .for_each(|v, &ok| {
                            if !ok {
                                *v = fill;
                            }
                        });
                    b.valid.fill(true);
                }
                Val::Image(r)
            }
            "Image.clip" => {
                let geometry = take("geometry");
                let mut r = image(take("input"));
                if let (Some(footprint), Val::Bounds(bounds)) = (&self.catalog.footprint, &geometry)
                {
                    for b in &mut r.bands {
                        let dim = b.valid.dim();
                        for ((row, col), ok) in b.valid.indexed_iter_mut() {
                            if !covers(bounds, pixel_centre(footprint, dim, row, col)) {
                                *ok = false;
                            }
                        }
                    }
                }
                Val::Image(r)
            }
            "Image.clipToBoundsAndScale" => {
                let mut r = image(take("input"));
                if let Val::Bounds(b) = take("geometry") {
                    if let Some(footprint) = &self.catalog.footprint {
                        crop(&mut r, footprint, &b);
                    }
                    r.extent = Some(b);
                }
                take("scale");
                Val::Image(r)
            }
            "Image.projection" => Val::Opaque,
            "Image.reproject" => take("image"),
            "Image.focalMin" | "Image.focalMax" => {
                let mut r = image(take("image"));
                let radius = number(&take("radius"));
                assert_eq!(json_str(&take("kernelType")), "circle");
                assert_eq!(json_str(&take("units")), "pixels");
                for b in &mut r.bands {
                    *b = focal(b, radius, name == "Image.focalMax");
                }
                Val::Image(r)
            }
            "Image.directionalDistanceTransform" => {
                let source = image(take("source"));
                let angle = number(&take("angle"));
                let max = number(&take("maxDistance"));
                Val::Image(distance_transform(&source.bands[0], angle, max))
            }
            "Collection.map" => {
                let rasters = collection(take("collection"));
                let Val::Function { args, body } = take("baseAlgorithm") else {
                    panic!("function expected");
                };
                let mapped = rasters
                    .into_iter()
                    .map(|r| {
                        let mut scope = env.clone();
                        scope.insert(args[0].clone(), Val::Image(r));
                        image(self.eval_key(&body, &scope))
                    })
                    .collect();
                Val::Collection(mapped)
            }
            "Reducer.median" => Val::Reducer,
            "ImageCollection.reduce" => {
                let rasters = collection(take("collection"));
                assert!(matches!(take("reducer"), Val::Reducer));
                Val::Image(median(&rasters))
            }
            "GeometryConstructors.Rectangle" => {
                let c = take("coordinates");
                let Val::Json(Value::Array(c)) = c else {
                    panic!("rectangle coordinates");
                };
                let c: Vec<f64> = c.iter().map(|v| v.as_f64().unwrap()).collect();
                Val::Bounds(BoundingBox {
                    west: c[0],
                    south: c[1],
                    east: c[2],
                    north: c[3],
                })
            }
            n if n.starts_with("GeometryConstructors.") => Val::Opaque,
            "Date" | "DateRange" | "Feature" | "Collection" | "Collection.geometry" => Val::Opaque,
            other => panic!("unsupported algorithm {other}"),
        }
    }
}

/// Lon/lat of the centre of pixel (`row`, `col`) of a grid spanning `footprint`.
fn pixel_centre(
    footprint: &BoundingBox,
    (rows, cols): (usize, usize),
    row: usize,
    col: usize,
) -> (f64, f64) {
    let lon = footprint.west + (col as f64 + 0.5) * (footprint.east - footprint.west) / cols as f64;
    let lat =
        footprint.north - (row as f64 + 0.5) * (footprint.north - footprint.south) / rows as f64;
    (lon, lat)
}

fn covers(bounds: &BoundingBox, (lon, lat): (f64, f64)) -> bool {
    (bounds.west..=bounds.east).contains(&lon) && (bounds.south..=bounds.north).contains(&lat)
}

/// Keep only the rows and columns whose centres fall inside `bounds`.
fn crop(raster: &mut Raster, footprint: &BoundingBox, bounds: &BoundingBox) {
    let dim = raster.bands[0].values.dim();
    let rows: Vec<usize> = (0..dim.0)
        .filter(|&i| (bounds.south..=bounds.north).contains(&pixel_centre(footprint, dim, i, 0).1))
        .collect();
    let cols: Vec<usize> = (0..dim.1)
        .filter(|&j| (bounds.west..=bounds.east).contains(&pixel_centre(footprint, dim, 0, j).0))
        .collect();
    let (Some(&r0), Some(&r1)) = (rows.first(), rows.last()) else {
        panic!("bounds miss the footprint");
    };
    let (Some(&c0), Some(&c1)) = (cols.first(), cols.last()) else {
        panic!("bounds miss the footprint");
    };
    for b in &mut raster.bands {
        b.values = b.values.slice(s![r0..=r1, c0..=c1]).to_owned();
        b.valid = b.valid.slice(s![r0..=r1, c0..=c1]).to_owned();
    }
}

fn image(v: Val) -> Raster {
    match v {
        Val::Image(r) => r,
        other => panic!("expected image, got {other:?}"),
    }
}

fn collection(v: Val) -> Vec<Raster> {
    match v {
        Val::Collection(c) => c,
        other => panic!("expected collection, got {other:?}"),
    }
}

fn json_str(v: &Val) -> String {
    match v {
        Val::Json(Value::String(s)) => s.clone(),
        other => panic!("expected string, got {other:?}"),
    }
}

fn number(v: &Val) -> f64 {
    match v {
        Val::Json(j) => j.as_f64().unwrap_or_else(|| panic!("expected number, got {j}")),
        other => panic!("expected number, got {other:?}"),
    }
}

fn json_prop(r: &Raster, key: &str) -> Option<Value> {
    match r.properties.get(key) {
        Some(Val::Json(v)) => Some(v.clone()),
        _ => None,
    }
}

fn keep(filter: &FilterSpec, r: &Raster) -> bool {
    match filter {
        FilterSpec::All => true,
        FilterSpec::LessThanOrEquals { field, value } => {
            json_prop(r, field).and_then(|v| v.as_f64()).is_some_and(|v| v <= *value)
        }
        FilterSpec::Equals { .. } => panic!("equality filters only appear in joins"),
    }
}

/// Exact names, or a `prefix.*` pattern.
fn matches(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix(".*") {
        Some(prefix) => name.starts_with(prefix),
        None => pattern == name,
    }
}

fn binary(op: &str, a: Raster, b: Raster) -> Raster {
    let n = a.bands.len().max(b.bands.len());
    assert!(
        a.bands.len() == n || a.bands.len() == 1,
        "{op}: band count mismatch"
    );
    assert!(
        b.bands.len() == n || b.bands.len() == 1,
        "{op}: band count mismatch"
    );
    let names_from = if a.bands.len() == n { &a } else { &b };
    let bands = (0..n)
        .map(|i| {
            let x = &a.bands[i.min(a.bands.len() - 1)];
            let y = &b.bands[i.min(b.bands.len() - 1)];
            let mut values = Array2::zeros(x.values.dim());
            let mut valid = Array2::from_elem(x.values.dim(), false);
            ndarray::Zip::from(&mut values)
                .and(&mut valid)
                .and(&x.values)
                .and(&x.valid)
                .and(&y.values)
                .and(&y.valid)
                .for_each(|out, ok, &p, &pok, &q, &qok| {
                    let flag = |c: bool| if c { 1.0 } else { 0.0 };
                    let r = match op {
                        "Image.gt" => flag(p > q),
                        "Image.lt" => flag(p < q),
                        "Image.neq" => flag(p != q),
                        "Image.add" => p + q,
                        "Image.subtract" => p - q,
                        "Image.multiply" => p * q,
                        "Image.divide" => p / q,
                        _ => unreachable!(),
                    };
                    *ok = pok && qok && r.is_finite();
                    *out = if *ok { r } else { 0.0 };
                });
            Band {
                name: names_from.bands[i].name.clone(),
                values,
                valid,
            }
        })
        .collect();
    Raster {
        bands,
        properties: a.properties,
        extent: a.extent,
    }
}

fn focal(band: &Band, radius: f64, maximum: bool) -> Band {
    let (rows, cols) = band.values.dim();
    let r = radius.floor() as isize;
    let mut values = Array2::zeros((rows, cols));
    let mut valid = Array2::from_elem((rows, cols), false);
    for i in 0..rows {
        for j in 0..cols {
            let mut acc: Option<f64> = None;
            for di in -r..=r {
                for dj in -r..=r {
                    if ((di * di + dj * dj) as f64) > radius * radius {
                        continue;
                    }
                    let (y, x) = (i as isize + di, j as isize + dj);
                    if y < 0 || x < 0 || y >= rows as isize || x >= cols as isize {
                        continue;
                    }
                    let (y, x) = (y as usize, x as usize);
                    if !band.valid[[y, x]] {
                        continue;
                    }
                    let v = band.values[[y, x]];
                    acc = Some(match acc {
                        None => v,
                        Some(a) if maximum => a.max(v),
                        Some(a) => a.min(v),
                    });
                }
            }
            if let Some(v) = acc {
                values[[i, j]] = v;
                valid[[i, j]] = true;
            }
        }
    }
    Band {
        name: band.name.clone(),
        values,
        valid,
    }
}

/// Distance in pixels to the nearest non-zero source pixel found by stepping
/// along `angle` (degrees, 0 = east, 90 = north).
fn distance_transform(source: &Band, angle: f64, max_distance: f64) -> Raster {
    let (rows, cols) = source.values.dim();
    let (dx, dy) = (angle.to_radians().cos(), -angle.to_radians().sin());
    let mut distance = Array2::zeros((rows, cols));
    let mut labels = Array2::zeros((rows, cols));
    let mut valid = Array2::from_elem((rows, cols), false);
    for i in 0..rows {
        for j in 0..cols {
            for k in 0..=max_distance.floor() as usize {
                let y = (i as f64 + dy * k as f64).round();
                let x = (j as f64 + dx * k as f64).round();
                if y < 0.0 || x < 0.0 || y >= rows as f64 || x >= cols as f64 {
                    break;
                }
                let (y, x) = (y as usize, x as usize);
                if source.valid[[y, x]] && source.values[[y, x]] != 0.0 {
                    distance[[i, j]] = k as f64;
                    labels[[i, j]] = source.values[[y, x]];
                    valid[[i, j]] = true;
                    break;
                }
            }
        }
    }
    Raster {
        bands: vec![
            Band {
                name: "distance".into(),
                values: distance,
                valid: valid.clone(),
            },
            Band {
                name: "labels".into(),
                values: labels,
                valid,
            },
        ],
        ..Raster::default()
    }
}

fn median(rasters: &[Raster]) -> Raster {
    let Some(first) = rasters.first() else {
        return Raster::default();
    };
    let bands = first
        .bands
        .iter()
        .enumerate()
        .map(|(bi, template)| {
            let (rows, cols) = template.values.dim();
            let mut values = Array2::zeros((rows, cols));
            let mut valid = Array2::from_elem((rows, cols), false);
            for i in 0..rows {
                for j in 0..cols {
                    let mut stack: Vec<f64> = rasters
                        .iter()
                        .map(|r| &r.bands[bi])
                        .filter(|b| b.valid[[i, j]])
                        .map(|b| b.values[[i, j]])
                        .collect();
                    if stack.is_empty() {
                        continue;
                    }
                    stack.sort_by(|a, b| a.total_cmp(b));
                    let mid = stack.len() / 2;
                    values[[i, j]] = if stack.len() % 2 == 0 {
                        (stack[mid - 1] + stack[mid]) / 2.0
                    } else {
                        stack[mid]
                    };
                    valid[[i, j]] = true;
                }
            }
            Band {
                name: format!("{}_median", template.name),
                values,
                valid,
            }
        })
        .collect();
    Raster {
        bands,
        ..Raster::default()
    }
}

/// Computes requests locally and answers with a lon/lat GeoTIFF covering the
/// clipped extent, optionally grown by `overshoot` degrees on every side.
pub struct LocalService {
    pub catalog: Catalog,
    pub overshoot: f64,
}

impl ComputeService for LocalService {
    fn compute_pixels(&self, request: &PixelRequest) -> s2ndvi::Result<Vec<u8>> {
        let raster = evaluate_image(&request.expression, &self.catalog);
        let extent = raster.extent.expect("export must clip to bounds");
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pixels.tif");
        write_geotiff(&path, &raster, &extent, self.overshoot).map_err(GdalError::from)?;
        Ok(std::fs::read(&path)?)
    }
}

fn write_geotiff(
    path: &std::path::Path,
    raster: &Raster,
    extent: &BoundingBox,
    overshoot: f64,
) -> std::result::Result<(), gdal::errors::GdalError> {
    let (rows, cols) = raster.bands[0].values.dim();
    let west = extent.west - overshoot;
    let north = extent.north + overshoot;
    let width = (extent.east + overshoot) - west;
    let height = north - (extent.south - overshoot);
    let gt = [
        west,
        width / cols as f64,
        0.0,
        north,
        0.0,
        -height / rows as f64,
    ];

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut ds = driver.create_with_band_type::<f64, _>(path, cols, rows, raster.bands.len())?;
    ds.set_geo_transform(&gt)?;
    ds.set_projection(&SpatialRef::from_epsg(4326)?.to_wkt()?)?;
    for (idx, band) in raster.bands.iter().enumerate() {
        let mut handle = ds.rasterband(idx + 1)?;
        handle.set_description(&band.name)?;
        let data: Vec<f64> = band.values.iter().copied().collect();
        let mut buf = Buffer::new((cols, rows), data);
        handle.write((0, 0), (cols, rows), &mut buf)?;
    }
    Ok(())
}
