//! Static HTML map of every region, one marker each.

use crate::error::{Result, RiskError};
use crate::types::{Field, Records, marker_color};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Initial view: centred on India, as the operators track Indian states.
const MAP_CENTER: [f64; 2] = [20.5937, 78.9629];
const MAP_ZOOM: u8 = 5;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1"/>
    <title>Health Risk Map</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        html, body, #map { height: 100%; margin: 0; }
        .generated { position: absolute; bottom: 4px; left: 4px; z-index: 1000;
                     background: #fff; padding: 2px 6px; font: 11px Arial, sans-serif; }
    </style>
</head>
<body>
<div id="map"></div>
<div class="generated">Generated __GENERATED_AT__</div>
<script>
const markers = __MARKERS__;
const map = L.map("map").setView(__CENTER__, __ZOOM__);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
    maxZoom: 18,
    attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
for (const m of markers) {
    const popup = document.createElement("div");
    const title = document.createElement("b");
    title.textContent = m.name;
    popup.appendChild(title);
    for (const [label, value] of m.fields) {
        popup.appendChild(document.createElement("br"));
        popup.appendChild(document.createTextNode(label + ": " + value));
    }
    L.circleMarker([m.lat, m.lon], {
        radius: 10, color: m.color, fillColor: m.color, fillOpacity: 0.8
    }).bindPopup(popup, { maxWidth: 500 }).bindTooltip(m.name).addTo(map);
}
</script>
</body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapArtifact {
    pub path: PathBuf,
    pub markers: usize,
}

pub struct MapRenderer {
    path: PathBuf,
}

impl MapRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render every region with stored coordinates and overwrite the artifact.
    pub fn render(&self, records: &Records) -> Result<MapArtifact> {
        let markers = build_markers(records);
        let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
        let html = render_html(&markers, &generated_at)?;
        fs::write(&self.path, html)?;

        info!(
            "Rendered map with {} marker(s) to {}",
            markers.len(),
            self.path.display()
        );
        Ok(MapArtifact {
            path: self.path.clone(),
            markers: markers.len(),
        })
    }

    /// The last rendered artifact, if one exists on disk.
    pub fn current(&self) -> Result<PathBuf> {
        if self.path.is_file() {
            Ok(self.path.clone())
        } else {
            Err(RiskError::MapUnavailable)
        }
    }
}

/// Regions without coordinates are left off the map.
pub fn build_markers(records: &Records) -> Vec<Marker> {
    records
        .iter()
        .filter_map(|(name, record)| {
            let coords = record.coordinates?;
            Some(Marker {
                name: name.clone(),
                lat: coords.latitude,
                lon: coords.longitude,
                color: marker_color(&record.risk_level),
                fields: Field::ALL
                    .into_iter()
                    .map(|field| (field.label(), record.get(field).to_string()))
                    .collect(),
            })
        })
        .collect()
}

pub fn render_html(markers: &[Marker], generated_at: &str) -> Result<String> {
    // `</` inside an inline script would close the element early.
    let markers_json = serde_json::to_string(markers)?.replace("</", "<\\/");
    let center = serde_json::to_string(&MAP_CENTER)?;

    Ok(TEMPLATE
        .replace("__GENERATED_AT__", generated_at)
        .replace("__CENTER__", &center)
        .replace("__ZOOM__", &MAP_ZOOM.to_string())
        .replace("__MARKERS__", &markers_json))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, FieldValue, RegionRecord};

    fn records() -> Records {
        let mut records = Records::new();
        let mut high = RegionRecord::new(Coordinates::new(19.07, 72.87));
        high.set(Field::RiskLevel, FieldValue::text("High Risk"));
        records.insert("Mumbai".to_string(), high);
        records.insert(
            "Chennai".to_string(),
            RegionRecord::new(Coordinates::new(13.08, 80.27)),
        );
        let mut orphan = RegionRecord::new(Coordinates::new(0.0, 0.0));
        orphan.coordinates = None;
        records.insert("Nowhere".to_string(), orphan);
        records
    }

    #[test]
    fn test_build_markers_skips_missing_coordinates() {
        let markers = build_markers(&records());
        let names: Vec<&str> = markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Mumbai", "Chennai"]);
        assert_eq!(markers[0].color, "red");
        assert_eq!(markers[1].color, "blue");
        assert_eq!(markers[0].fields.len(), 7);
        assert_eq!(markers[0].fields[0], ("Risk Level", "High Risk".to_string()));
    }

    #[test]
    fn test_render_html_embeds_markers() {
        let html = render_html(&build_markers(&records()), "2026-01-01 00:00 UTC").unwrap();
        assert!(html.contains(r#""name":"Mumbai""#));
        assert!(html.contains("setView([20.5937,78.9629], 5)"));
        assert!(html.contains("Generated 2026-01-01 00:00 UTC"));
        assert!(!html.contains("Nowhere"));
    }

    #[test]
    fn test_render_html_escapes_script_close() {
        let mut records = Records::new();
        let mut record = RegionRecord::new(Coordinates::new(1.0, 1.0));
        record.set(Field::MortalityRate, FieldValue::text("</script><b>x</b>"));
        records.insert("Evil".to_string(), record);

        let html = render_html(&build_markers(&records), "now").unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_render_overwrites_and_current() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MapRenderer::new(dir.path().join("map.html"));
        assert!(matches!(renderer.current(), Err(RiskError::MapUnavailable)));

        let artifact = renderer.render(&records()).unwrap();
        assert_eq!(artifact.markers, 2);
        assert_eq!(renderer.current().unwrap(), dir.path().join("map.html"));

        let artifact = renderer.render(&Records::new()).unwrap();
        assert_eq!(artifact.markers, 0);
        let html = fs::read_to_string(renderer.path()).unwrap();
        assert!(!html.contains("Mumbai"));
    }
}
