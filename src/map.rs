use crate::types::Region;
use anyhow::{Context, Result};
use geo::Point;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

// Map view over the DRC
pub const MAP_CENTER: (f64, f64) = (-2.5, 23.0); // (lat, lon)
pub const MAP_ZOOM: u8 = 5;

pub const MARKER_SCALE: f64 = 2_000_000.0;
pub const MARKER_COLOR: &str = "blue";
pub const MARKER_FILL_OPACITY: f64 = 0.6;
pub const HEAT_RADIUS: u32 = 15;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_HEAT_JS: &str = "https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js";

const LEGEND_HTML: &str = r#"<div style="position: fixed; bottom: 50px; left: 50px; width: 150px; height: 100px; border: 2px solid grey; background-color: white; z-index: 9999; font-size: 14px; font-weight: bold; padding: 10px;">
    <div><strong>Légende</strong></div>
    <div><i style="background: blue; width: 12px; height: 12px; display: inline-block;"></i> Population</div>
</div>"#;

/// Marker radius in screen units for a region's population.
///
/// The mapping is linear, not area-proportional: a region with twice the
/// population gets twice the radius (four times the visual area). Callers
/// wanting a perceptually accurate encoding must apply a square-root
/// transform themselves.
pub fn marker_radius(population: u64) -> f64 {
    population as f64 / MARKER_SCALE
}

#[derive(Debug, Clone)]
pub struct CircleMarker {
    // x = longitude, y = latitude
    pub location: Point<f64>,
    pub radius: f64,
    pub popup: String,
}

#[derive(Debug, Clone)]
pub struct HeatLayer {
    // [lat, lon, weight]
    pub points: Vec<[f64; 3]>,
    pub radius: u32,
}

#[derive(Debug, Clone)]
pub struct MapDocument {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<CircleMarker>,
    pub heat: Option<HeatLayer>,
    pub legend: Option<&'static str>,
}

impl MapDocument {
    pub fn new(center: (f64, f64), zoom: u8) -> Self {
        MapDocument {
            center,
            zoom,
            markers: Vec::new(),
            heat: None,
            legend: None,
        }
    }

    /// Appends one circle marker per region. Coordinates are passed through
    /// unvalidated; out-of-range values are the renderer's problem.
    pub fn add_markers(&mut self, regions: &[Region]) {
        for region in regions {
            self.markers.push(CircleMarker {
                location: region.location,
                radius: marker_radius(region.population),
                popup: format!(
                    "<strong>{}</strong><br>Population: {}",
                    region.name, region.population
                ),
            });
        }
    }

    /// Adds a single heat overlay weighting each region by raw population.
    /// Weights are not normalized; the heat renderer's own intensity
    /// scaling applies as-is.
    pub fn add_heat_layer(&mut self, regions: &[Region]) {
        let points = regions
            .iter()
            .map(|r| [r.location.y(), r.location.x(), r.population as f64])
            .collect();
        self.heat = Some(HeatLayer {
            points,
            radius: HEAT_RADIUS,
        });
    }

    pub fn add_legend(&mut self) {
        self.legend = Some(LEGEND_HTML);
    }

    /// Serializes the document to a self-contained Leaflet page. Output is
    /// deterministic: identical input always yields identical bytes.
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>Carte démographique de la RDC</title>\n");
        let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{}\"/>", LEAFLET_CSS);
        let _ = writeln!(html, "<script src=\"{}\"></script>", LEAFLET_JS);
        let _ = writeln!(html, "<script src=\"{}\"></script>", LEAFLET_HEAT_JS);
        html.push_str("<style>html, body, #map { width: 100%; height: 100%; margin: 0; }</style>\n");
        html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n");

        if let Some(legend) = self.legend {
            html.push_str(legend);
            html.push('\n');
        }

        html.push_str("<script>\n");
        let _ = writeln!(
            html,
            "var map = L.map(\"map\").setView([{}, {}], {});",
            self.center.0, self.center.1, self.zoom
        );
        html.push_str("L.tileLayer(\"https://tile.openstreetmap.org/{z}/{x}/{y}.png\", {attribution: \"&copy; OpenStreetMap contributors\"}).addTo(map);\n");

        for marker in &self.markers {
            let _ = writeln!(
                html,
                "L.circleMarker([{}, {}], {{radius: {}, color: \"{}\", fill: true, fillColor: \"{}\", fillOpacity: {}}}).bindPopup(\"{}\").addTo(map);",
                marker.location.y(),
                marker.location.x(),
                marker.radius,
                MARKER_COLOR,
                MARKER_COLOR,
                MARKER_FILL_OPACITY,
                marker.popup
            );
        }

        if let Some(heat) = &self.heat {
            let mut points = String::new();
            for (i, p) in heat.points.iter().enumerate() {
                if i > 0 {
                    points.push_str(", ");
                }
                let _ = write!(points, "[{}, {}, {}]", p[0], p[1], p[2]);
            }
            let _ = writeln!(
                html,
                "L.heatLayer([{}], {{radius: {}}}).addTo(map);",
                points, heat.radius
            );
        }

        html.push_str("</script>\n</body>\n</html>\n");
        html
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_html())
            .with_context(|| format!("Failed to write map document: {:?}", path))
    }
}

/// Composes the full map artifact: base view, one marker and one heat point
/// per region, and the fixed legend block.
pub fn build_map(regions: &[Region]) -> MapDocument {
    println!("Composing map for {} regions...", regions.len());

    let mut doc = MapDocument::new(MAP_CENTER, MAP_ZOOM);
    doc.add_markers(regions);
    doc.add_heat_layer(regions);
    doc.add_legend();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_regions;

    #[test]
    fn test_marker_radius_is_linear() {
        // Kinshasa and Bukavu from the built-in table
        assert!((marker_radius(12_300_000) - 6.15).abs() < 1e-9);
        assert!((marker_radius(200_000) - 0.1).abs() < 1e-9);
        assert_eq!(marker_radius(0), 0.0);
    }

    #[test]
    fn test_one_primitive_per_region() {
        let regions = default_regions();
        let doc = build_map(&regions);
        assert_eq!(doc.markers.len(), 5);
        assert_eq!(doc.heat.as_ref().unwrap().points.len(), 5);
    }

    #[test]
    fn test_heat_radius_is_constant() {
        let regions = default_regions();
        let doc = build_map(&regions);
        let heat = doc.heat.unwrap();
        assert_eq!(heat.radius, 15);
        // Radius applies to the layer, not per point: Kinshasa and Bukavu
        // carry only their weights.
        assert_eq!(heat.points[0][2], 12_300_000.0);
        assert_eq!(heat.points[4][2], 200_000.0);
    }

    #[test]
    fn test_marker_popup_and_position() {
        let regions = default_regions();
        let doc = build_map(&regions);
        let kinshasa = &doc.markers[0];
        assert_eq!(kinshasa.location.y(), -4.3214);
        assert_eq!(kinshasa.location.x(), 15.3134);
        assert_eq!(
            kinshasa.popup,
            "<strong>Kinshasa</strong><br>Population: 12300000"
        );
    }

    #[test]
    fn test_html_contains_layers_and_legend() {
        let html = build_map(&default_regions()).to_html();
        assert!(html.contains("L.map(\"map\").setView([-2.5, 23], 5);"));
        assert!(html.contains("radius: 6.15"));
        assert!(html.contains("fillOpacity: 0.6"));
        assert!(html.contains("L.heatLayer("));
        assert!(html.contains("{radius: 15}"));
        assert!(html.contains("Légende"));
        assert_eq!(html.matches("L.circleMarker(").count(), 5);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let regions = default_regions();
        let first = build_map(&regions).to_html();
        let second = build_map(&regions).to_html();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_is_idempotent() {
        let regions = default_regions();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carte.html");

        build_map(&regions).write(&path).unwrap();
        let first = std::fs::read(&path).unwrap();
        build_map(&regions).write(&path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
