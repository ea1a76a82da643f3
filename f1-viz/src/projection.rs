//! Mercator projection, world outline paths and map zoom.

use f1_db::models::MapRace;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::f64::consts::FRAC_PI_4;

pub const MAP_WIDTH: f64 = 900.0;
pub const MAP_HEIGHT: f64 = 520.0;
pub const MAP_SCALE: f64 = 140.0;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 16.0;
pub const POINT_RADIUS: f64 = 6.0;
pub const POINT_STROKE: f64 = 1.0;
/// Web Mercator latitude limit; beyond it y diverges.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Spherical Mercator projection into SVG pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    pub scale: f64,
    pub translate: (f64, f64),
}

impl Mercator {
    /// The dashboard's world view: 900x520 viewBox, slightly north-heavy.
    pub fn world() -> Self {
        Self {
            scale: MAP_SCALE,
            translate: (MAP_WIDTH / 2.0, MAP_HEIGHT / 1.55),
        }
    }

    pub fn project(&self, lng: f64, lat: f64) -> (f64, f64) {
        let lambda = lng.to_radians();
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let y = (FRAC_PI_4 + phi / 2.0).tan().ln();
        (
            self.translate.0 + self.scale * lambda,
            self.translate.1 - self.scale * y,
        )
    }
}

/// Polygon rings as `[lng, lat]` positions.
type Polygon = Vec<Vec<Vec<f64>>>;
type Properties = Option<serde_json::Map<String, serde_json::Value>>;

/// World outline document: a TopoJSON topology or a plain GeoJSON collection.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WorldOutline {
    Topology {
        #[serde(default)]
        transform: Option<TopoTransform>,
        arcs: Vec<Vec<Vec<f64>>>,
        objects: HashMap<String, TopoGeometry>,
    },
    FeatureCollection {
        features: Vec<Feature>,
    },
}

#[derive(Debug, Deserialize)]
struct TopoTransform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    /// Members are decoded one by one so a null or unknown geometry only
    /// drops itself.
    GeometryCollection {
        geometries: Vec<serde_json::Value>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Properties,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Properties,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Polygon },
    MultiPolygon { coordinates: Vec<Polygon> },
    #[serde(other)]
    Unsupported,
}

/// A country outline as SVG path data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryShape {
    pub name: String,
    pub path: String,
}

fn feature_name(properties: &Properties) -> Option<String> {
    properties
        .as_ref()
        .and_then(|p| p.get("name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Absolute arc positions. Quantized topologies are delta-encoded.
fn decode_arcs(arcs: &[Vec<Vec<f64>>], transform: Option<&TopoTransform>) -> Vec<Vec<Vec<f64>>> {
    arcs.iter()
        .map(|arc| {
            let (mut x, mut y) = (0.0, 0.0);
            arc.iter()
                .filter_map(|position| match position.as_slice() {
                    [a, b, ..] => Some((*a, *b)),
                    _ => None,
                })
                .map(|(a, b)| match transform {
                    Some(t) => {
                        x += a;
                        y += b;
                        vec![x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                    }
                    None => vec![a, b],
                })
                .collect()
        })
        .collect()
}

/// Join the arcs of one ring; a negative index `i` walks arc `!i` backwards.
fn stitch_ring(indices: &[i64], arcs: &[Vec<Vec<f64>>]) -> Vec<Vec<f64>> {
    let mut ring: Vec<Vec<f64>> = Vec::new();
    for &index in indices {
        let (arc_index, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let Some(arc) = usize::try_from(arc_index).ok().and_then(|i| arcs.get(i)) else {
            log::warn!("[F1] map: topology references missing arc {}", index);
            continue;
        };
        let points: Vec<Vec<f64>> = if reversed {
            arc.iter().rev().cloned().collect()
        } else {
            arc.clone()
        };
        // Consecutive arcs share their joining point.
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }
    ring
}

fn collect_topo_polygons(
    geometry: TopoGeometry,
    arcs: &[Vec<Vec<f64>>],
    out: &mut Vec<(String, Vec<Polygon>)>,
) {
    let stitch = |rings: &[Vec<i64>]| -> Polygon { rings.iter().map(|r| stitch_ring(r, arcs)).collect() };
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for child in geometries {
                match serde_json::from_value::<TopoGeometry>(child) {
                    Ok(child) => collect_topo_polygons(child, arcs, out),
                    Err(e) => log::debug!("[F1] map: skipping topology geometry: {}", e),
                }
            }
        }
        TopoGeometry::Polygon { arcs: rings, properties } => {
            if let Some(name) = feature_name(&properties) {
                out.push((name, vec![stitch(&rings)]));
            }
        }
        TopoGeometry::MultiPolygon { arcs: polygons, properties } => {
            if let Some(name) = feature_name(&properties) {
                out.push((name, polygons.iter().map(|rings| stitch(rings)).collect()));
            }
        }
        TopoGeometry::Unsupported => {}
    }
}

/// Named polygons of a world outline. A topology's `countries` object is
/// used when present, otherwise every object.
fn named_polygons(outline: WorldOutline) -> Vec<(String, Vec<Polygon>)> {
    let mut named = Vec::new();
    match outline {
        WorldOutline::Topology { transform, arcs, mut objects } => {
            let arcs = decode_arcs(&arcs, transform.as_ref());
            let geometries: Vec<TopoGeometry> = match objects.remove("countries") {
                Some(countries) => vec![countries],
                None => objects.into_values().collect(),
            };
            for geometry in geometries {
                collect_topo_polygons(geometry, &arcs, &mut named);
            }
        }
        WorldOutline::FeatureCollection { features } => {
            for feature in features {
                let Some(name) = feature_name(&feature.properties) else {
                    continue;
                };
                match feature.geometry {
                    Some(Geometry::Polygon { coordinates }) => named.push((name, vec![coordinates])),
                    Some(Geometry::MultiPolygon { coordinates }) => named.push((name, coordinates)),
                    Some(Geometry::Unsupported) | None => {}
                }
            }
        }
    }
    named
}

/// Project a world outline (TopoJSON topology or GeoJSON
/// `FeatureCollection`) into country outlines.
///
/// Features without a `name` property or with non-polygon geometry are
/// skipped.
pub fn country_shapes(world: &str, projection: &Mercator) -> anyhow::Result<Vec<CountryShape>> {
    let outline: WorldOutline = serde_json::from_str(world)?;
    let shapes: Vec<CountryShape> = named_polygons(outline)
        .into_iter()
        .filter_map(|(name, polygons)| {
            let path = polygons_path(&polygons, projection);
            (!path.is_empty()).then_some(CountryShape { name, path })
        })
        .collect();
    log::info!("[F1] map: projected {} country outlines", shapes.len());
    Ok(shapes)
}

fn polygons_path(polygons: &[Polygon], projection: &Mercator) -> String {
    let mut path = String::new();
    for ring in polygons.iter().flatten() {
        let mut first = true;
        for position in ring {
            let [lng, lat, ..] = position.as_slice() else {
                continue;
            };
            let (x, y) = projection.project(*lng, *lat);
            path.push(if first { 'M' } else { 'L' });
            path.push_str(&format!("{:.2},{:.2}", x, y));
            first = false;
        }
        if !first {
            path.push('Z');
        }
    }
    path
}

/// How a country is shaded on the circuit map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountryClass {
    NeverHosted,
    HistoricalHost,
    SeasonHost,
}

impl CountryClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            CountryClass::NeverHosted => "country",
            CountryClass::HistoricalHost => "country has-history",
            CountryClass::SeasonHost => "country has-history active-season",
        }
    }

    pub fn fill(&self) -> &'static str {
        match self {
            CountryClass::NeverHosted => "#2a2f3a",
            CountryClass::HistoricalHost => "#5b6478",
            CountryClass::SeasonHost => "#e10600",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CountryClass::NeverHosted => "Never Hosted",
            CountryClass::HistoricalHost => "Historical Host",
            CountryClass::SeasonHost => "Host (Selected Season)",
        }
    }

    pub const ALL: [CountryClass; 3] = [
        CountryClass::NeverHosted,
        CountryClass::HistoricalHost,
        CountryClass::SeasonHost,
    ];
}

/// Pan/zoom state of the map group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ZoomTransform {
    /// Scale by `factor` around `anchor`, keeping the anchor fixed on screen.
    pub fn zoom_at(self, anchor: (f64, f64), factor: f64) -> Self {
        let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        // Map point under the anchor before zooming.
        let mx = (anchor.0 - self.x) / self.k;
        let my = (anchor.1 - self.y) / self.k;
        Self {
            k,
            x: anchor.0 - mx * k,
            y: anchor.1 - my * k,
        }
    }

    pub fn pan(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Zoom factor for a wheel event delta in pixels.
    pub fn wheel_factor(delta_y: f64) -> f64 {
        2f64.powf(-delta_y * 0.002)
    }

    /// Point radius that stays constant on screen.
    pub fn point_radius(&self) -> f64 {
        POINT_RADIUS / self.k
    }

    pub fn point_stroke(&self) -> f64 {
        POINT_STROKE / self.k
    }

    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }

    /// Screen position of a point in map coordinates.
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        (point.0 * self.k + self.x, point.1 * self.k + self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub race_id: i64,
    pub season: i32,
    pub round: i64,
    pub name: String,
    pub circuit_name: String,
    pub country: String,
    pub x: f64,
    pub y: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub countries: Vec<(CountryShape, CountryClass)>,
    pub points: Vec<MapPoint>,
}

/// Classify countries and place the season's race points.
pub fn build_map_scene(
    shapes: &[CountryShape],
    races: &[MapRace],
    season: Option<i32>,
    active_race: Option<i64>,
    projection: &Mercator,
) -> MapScene {
    let all_hosts: HashSet<&str> = races.iter().map(|r| r.country.as_str()).collect();
    let season_races: Vec<&MapRace> = races
        .iter()
        .filter(|r| Some(r.season) == season)
        .collect();
    let season_hosts: HashSet<&str> = season_races.iter().map(|r| r.country.as_str()).collect();

    let countries = shapes
        .iter()
        .map(|shape| {
            let class = if season_hosts.contains(shape.name.as_str()) {
                CountryClass::SeasonHost
            } else if all_hosts.contains(shape.name.as_str()) {
                CountryClass::HistoricalHost
            } else {
                CountryClass::NeverHosted
            };
            (shape.clone(), class)
        })
        .collect();

    let points = season_races
        .into_iter()
        .map(|race| {
            let (x, y) = projection.project(race.lng, race.lat);
            MapPoint {
                race_id: race.race_id,
                season: race.season,
                round: race.round,
                name: race.name.clone(),
                circuit_name: race.circuit_name.clone(),
                country: race.country.clone(),
                x,
                y,
                active: Some(race.race_id) == active_race,
            }
        })
        .collect();

    MapScene { countries, points }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Bahrain"},
             "geometry": {"type": "Polygon", "coordinates": [[[50.4, 26.0], [50.6, 26.0], [50.6, 26.2], [50.4, 26.0]]]}},
            {"type": "Feature", "properties": {"name": "Italy"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[12.0, 44.0], [13.0, 44.0], [12.5, 45.0], [12.0, 44.0]]],
                [[[9.0, 40.0], [9.5, 40.0], [9.2, 41.0], [9.0, 40.0]]]
             ]}},
            {"type": "Feature", "properties": {"name": "Nowhere"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}
        ]
    }"#;

    fn race(id: i64, season: i32, country: &str) -> MapRace {
        MapRace {
            race_id: id,
            season,
            round: id,
            name: format!("Race {}", id),
            circuit_name: "Circuit".into(),
            country: country.into(),
            lat: 26.03,
            lng: 50.51,
        }
    }

    #[test]
    fn projection_centers_origin() {
        let p = Mercator::world();
        let (x, y) = p.project(0.0, 0.0);
        assert_eq!(x, 450.0);
        assert!((y - 520.0 / 1.55).abs() < 1e-9);
        // North is up, east is right.
        let (ex, ny) = p.project(10.0, 10.0);
        assert!(ex > x && ny < y);
    }

    #[test]
    fn projection_clamps_poles() {
        let (_, y) = Mercator::world().project(0.0, 90.0);
        assert!(y.is_finite());
    }

    #[test]
    fn country_shapes_from_geojson() {
        let shapes = country_shapes(WORLD, &Mercator::world()).unwrap();
        let names: Vec<&str> = shapes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bahrain", "Italy"]);
        assert!(shapes[0].path.starts_with('M'));
        assert_eq!(shapes[1].path.matches('Z').count(), 2);
    }

    /// Two countries sharing one border arc, quantized and delta-encoded.
    const WORLD_TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.1, 0.1], "translate": [10.0, 40.0]},
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "380", "properties": {"name": "Italy"}, "arcs": [[0, 1]]},
                    {"type": "MultiPolygon", "properties": {"name": "Austria"}, "arcs": [[[-1, 2]]]},
                    {"type": null, "properties": {"name": "Atlantis"}},
                    {"type": "Polygon", "arcs": [[2]]}
                ]
            },
            "land": {"type": "Polygon", "properties": {"name": "Land"}, "arcs": [[2]]}
        },
        "arcs": [
            [[0, 0], [10, 0], [0, 10]],
            [[10, 10], [-10, 0], [0, -10]],
            [[0, 0], [10, 10]]
        ]
    }"#;

    #[test]
    fn stitched_rings_skip_shared_points_and_reverse_negative_arcs() {
        let arcs = decode_arcs(
            &[
                vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![0.0, 10.0]],
                vec![vec![10.0, 10.0], vec![-10.0, 0.0], vec![0.0, -10.0]],
            ],
            Some(&TopoTransform {
                scale: [0.1, 0.1],
                translate: [10.0, 40.0],
            }),
        );
        assert_eq!(arcs[0], vec![vec![10.0, 40.0], vec![11.0, 40.0], vec![11.0, 41.0]]);
        assert_eq!(arcs[1], vec![vec![11.0, 41.0], vec![10.0, 41.0], vec![10.0, 40.0]]);

        let ring = stitch_ring(&[0, 1], &arcs);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());

        let reversed = stitch_ring(&[-1], &arcs);
        assert_eq!(reversed[0], vec![11.0, 41.0]);
        assert_eq!(reversed[2], vec![10.0, 40.0]);
    }

    #[test]
    fn country_shapes_from_topology() {
        let shapes = country_shapes(WORLD_TOPOLOGY, &Mercator::world()).unwrap();
        let names: Vec<&str> = shapes.iter().map(|s| s.name.as_str()).collect();
        // Only the countries object; unnamed and null geometries are skipped.
        assert_eq!(names, vec!["Italy", "Austria"]);
        assert!(shapes.iter().all(|s| s.path.starts_with('M') && s.path.ends_with('Z')));

        let (x, y) = Mercator::world().project(10.0, 40.0);
        assert!(shapes[0].path.starts_with(&format!("M{:.2},{:.2}", x, y)));
    }

    #[test]
    fn topology_classes_match_geojson_classes() {
        let shapes = country_shapes(WORLD_TOPOLOGY, &Mercator::world()).unwrap();
        let races = vec![race(1, 2021, "Italy")];
        let scene = build_map_scene(&shapes, &races, Some(2020), None, &Mercator::world());
        assert_eq!(scene.countries[0].1, CountryClass::HistoricalHost);
        assert_eq!(scene.countries[1].1, CountryClass::NeverHosted);
    }

    #[test]
    fn country_shapes_rejects_bad_json() {
        assert!(country_shapes("not json", &Mercator::world()).is_err());
    }

    #[test]
    fn map_scene_classifies_countries() {
        let shapes = country_shapes(WORLD, &Mercator::world()).unwrap();
        let races = vec![race(1, 2021, "Bahrain"), race(2, 2020, "Italy")];
        let scene = build_map_scene(&shapes, &races, Some(2021), Some(1), &Mercator::world());
        assert_eq!(scene.countries[0].1, CountryClass::SeasonHost);
        assert_eq!(scene.countries[1].1, CountryClass::HistoricalHost);
        assert_eq!(scene.points.len(), 1);
        assert!(scene.points[0].active);

        let none = build_map_scene(&shapes, &races, Some(1999), None, &Mercator::world());
        assert!(none.points.is_empty());
        assert!(none.countries.iter().all(|(_, c)| *c != CountryClass::SeasonHost));
    }

    #[test]
    fn zoom_is_clamped() {
        let t = ZoomTransform::default().zoom_at((450.0, 260.0), 100.0);
        assert_eq!(t.k, MAX_ZOOM);
        let t = t.zoom_at((0.0, 0.0), 0.0001);
        assert_eq!(t.k, MIN_ZOOM);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let anchor = (300.0, 200.0);
        let before = ZoomTransform::default().pan(10.0, -5.0);
        let after = before.zoom_at(anchor, 2.0);
        // The map point under the anchor stays under it.
        let map_point = ((anchor.0 - before.x) / before.k, (anchor.1 - before.y) / before.k);
        let screen = after.apply(map_point);
        assert!((screen.0 - anchor.0).abs() < 1e-9);
        assert!((screen.1 - anchor.1).abs() < 1e-9);
        assert_eq!(after.point_radius(), 3.0);
        assert_eq!(after.point_stroke(), 0.5);
    }

    #[test]
    fn wheel_factor_direction() {
        assert!(ZoomTransform::wheel_factor(-100.0) > 1.0);
        assert!(ZoomTransform::wheel_factor(100.0) < 1.0);
        assert_eq!(ZoomTransform::wheel_factor(0.0), 1.0);
    }
}
