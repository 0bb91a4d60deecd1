//! Map rendering of courier routes.
//!
//! A [`MapFigure`] holds one coloured polyline per courier and exports either
//! a GeoJSON `FeatureCollection` or a standalone Leaflet page on
//! OpenStreetMap tiles.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::decoding::Route;
use crate::distance_matrix::AddressCoordinates;
use crate::polyline::Polyline;
use crate::traits::Coordinate;

/// Centre of Prenzlauer Berg, Berlin.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 52.5487,
    lng: 13.4319,
};

pub const DEFAULT_ZOOM: u8 = 10;

/// Per-courier line colours, reused cyclically.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("no coordinate known for {address:?} on courier {courier}'s route")]
    MissingCoordinate { courier: usize, address: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierTrace {
    pub label: String,
    pub color: String,
    pub stops: Vec<String>,
    pub line: Polyline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFigure {
    pub center: Coordinate,
    pub zoom: u8,
    pub traces: Vec<CourierTrace>,
}

impl MapFigure {
    /// Initial view with no routes.
    pub fn empty() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            traces: Vec::new(),
        }
    }

    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .traces
            .iter()
            .map(|trace| {
                json!({
                    "type": "Feature",
                    "properties": {
                        "courier": trace.label,
                        "stroke": trace.color,
                        "stops": trace.stops,
                    },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": trace.line.lng_lat(),
                    },
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }

    /// Self-contained HTML page showing the figure with Leaflet.
    pub fn to_html(&self) -> String {
        let geojson = self.to_geojson().to_string().replace("</", "<\\/");
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Courier Routes</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const routes = {geojson};
const map = L.map("map").setView([{lat}, {lng}], {zoom});
L.tileLayer("https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
L.geoJSON(routes, {{
  style: (feature) => ({{ color: feature.properties.stroke, weight: 4 }}),
  onEachFeature: (feature, layer) => layer.bindTooltip(
    feature.properties.courier + ": " + feature.properties.stops.join(" → "))
}}).addTo(map);
</script>
</body>
</html>
"#,
            lat = self.center.lat,
            lng = self.center.lng,
            zoom = self.zoom,
        )
    }
}

/// One polyline per courier through its stops in route order.
pub fn create_map(routes: &[Route], coordinates: &AddressCoordinates) -> Result<MapFigure, MapError> {
    let mut figure = MapFigure::empty();

    for (i, route) in routes.iter().enumerate() {
        let courier = i + 1;
        let points = route
            .addresses
            .iter()
            .map(|address| {
                coordinates
                    .get(address)
                    .copied()
                    .ok_or_else(|| MapError::MissingCoordinate {
                        courier,
                        address: address.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        figure.traces.push(CourierTrace {
            label: format!("Courier {courier}"),
            color: PALETTE[i % PALETTE.len()].to_string(),
            stops: route.addresses.clone(),
            line: Polyline::new(points),
        });
    }

    Ok(figure)
}
