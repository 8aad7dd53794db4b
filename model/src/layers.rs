//! What a map needs to draw the network: stop markers with popups and one polyline per route.

use anyhow::Result;
use chrono::NaiveDateTime;
use geojson::{Feature, FeatureCollection, GeoJson};

use gtfs::{LonLat, RouteID, StopID};

use crate::Model;

pub struct StopMarker {
    pub stop_id: StopID,
    pub name: String,
    pub pos: LonLat,
}

pub struct RoutePolyline {
    pub route_id: RouteID,
    /// `#rrggbb`
    pub color: String,
    pub label: String,
    pub points: Vec<LonLat>,
}

impl Model {
    /// Stops without valid coordinates are left out
    pub fn stop_markers(&self) -> Vec<StopMarker> {
        self.gtfs
            .stops
            .iter()
            .filter_map(|stop| {
                Some(StopMarker {
                    stop_id: stop.stop_id.clone(),
                    name: stop.name.clone(),
                    pos: stop.pos?,
                })
            })
            .collect()
    }

    /// The text shown when a stop is clicked: its name, then upcoming departures one per line
    pub fn stop_popup(&self, stop_id: &StopID, now: NaiveDateTime) -> String {
        let name = self
            .gtfs
            .stops
            .iter()
            .find(|stop| &stop.stop_id == stop_id)
            .map(|stop| stop.name.as_str())
            .unwrap_or_else(|| stop_id.as_str());

        let departures = self.upcoming_departures(stop_id, now);
        if departures.is_empty() {
            return format!("{name}\nNo more service today.");
        }
        let mut lines = vec![name.to_string()];
        for departure in departures {
            lines.push(departure.to_string());
        }
        lines.join("\n")
    }

    /// One polyline per route, using the first trip whose shape exists with at least two points.
    /// Routes without one aren't drawn at all.
    pub fn route_polylines(&self) -> Vec<RoutePolyline> {
        let mut results = Vec::new();
        for route in self.index.routes_by_id.values() {
            let points = self
                .index
                .trips_by_route
                .get(&route.route_id)
                .into_iter()
                .flatten()
                .filter_map(|trip| trip.shape_id.as_ref())
                .filter_map(|shape_id| self.gtfs.shapes.get(shape_id))
                .find(|pts| pts.len() >= 2);
            let points = match points {
                Some(pts) => pts.clone(),
                None => {
                    debug!("Route {} has no trip with a usable shape", route.route_id);
                    continue;
                }
            };

            results.push(RoutePolyline {
                route_id: route.route_id.clone(),
                color: format!(
                    "#{}",
                    route.color.as_deref().unwrap_or(&self.route_color_fallback)
                ),
                label: route.describe(),
                points,
            });
        }
        results
    }

    pub fn to_geojson(&self) -> GeoJson {
        let mut features = Vec::new();

        for route in self.route_polylines() {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::LineString(
                    route.points.iter().map(|pt| pt.to_vec()).collect(),
                ))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "route");
            feature.set_property("route_id", route.route_id.to_string());
            feature.set_property("color", route.color);
            feature.set_property("label", route.label);
            features.push(feature);
        }

        for stop in self.stop_markers() {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::Point(
                    stop.pos.to_vec(),
                ))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "stop");
            feature.set_property("stop_id", stop.stop_id.to_string());
            feature.set_property("name", stop.name);
            features.push(feature);
        }

        GeoJson::FeatureCollection(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn export_to_geojson(&self, path: String) -> Result<()> {
        std::fs::write(&path, serde_json::to_string_pretty(&self.to_geojson())?)
            .map_err(|err| anyhow!("{path}: {err}"))?;
        info!("Wrote {path}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::index::tests::{feed, sample};

    use super::*;

    fn model() -> Model {
        Model::new("test", sample(), "007bff")
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn markers_skip_bad_coordinates() {
        let markers = model().stop_markers();
        assert_eq!(
            markers
                .iter()
                .map(|m| m.stop_id.to_string())
                .collect::<Vec<_>>(),
            vec!["S1", "S2"]
        );
        assert_eq!(markers[0].pos, LonLat::new(-0.07, 39.95));
    }

    #[test]
    fn popups() {
        let model = model();
        assert_eq!(
            model.stop_popup(&StopID::new("S1"), at(8, 0)),
            "Plaza\n1 → Centre - Beach: in 30 min\n1 → Centre - Beach: in 90 min\n2 → Circular: in 120 min"
        );
        assert_eq!(
            model.stop_popup(&StopID::new("S3"), at(8, 0)),
            "Nowhere\nNo more service today."
        );
    }

    #[test]
    fn only_routes_with_shapes() {
        let polylines = model().route_polylines();
        assert_eq!(polylines.len(), 1);
        assert_eq!(polylines[0].route_id, RouteID::new("R1"));
        assert_eq!(polylines[0].color, "#FF0000");
        assert_eq!(polylines[0].label, "Line 1: Centre - Beach");
        assert_eq!(polylines[0].points.len(), 3);
    }

    #[test]
    fn first_usable_shape_and_fallback_color() {
        let gtfs = feed(&[
            (
                "routes.txt",
                "route_id,route_short_name,route_long_name,route_color\nR1,1,One,\nR2,2,Two,00FF00\n",
            ),
            (
                "trips.txt",
                "route_id,trip_id,shape_id\nR1,T1,\nR1,T2,GONE\nR1,T3,DOT\nR1,T4,LINE\nR2,T5,DOT\n",
            ),
            (
                "shapes.txt",
                "shape_id,shape_pt_lat,shape_pt_lon\nDOT,1,1\nLINE,1,1\nLINE,2,2\n",
            ),
        ]);
        let model = Model::new("test", gtfs, "abcdef");
        let polylines = model.route_polylines();
        assert_eq!(polylines.len(), 1);
        assert_eq!(polylines[0].route_id, RouteID::new("R1"));
        assert_eq!(polylines[0].color, "#abcdef");
        assert_eq!(
            polylines[0].points,
            vec![LonLat::new(1.0, 1.0), LonLat::new(2.0, 2.0)]
        );
    }

    #[test]
    fn nothing_to_draw() {
        let model = Model::new("test", gtfs::GTFS::empty(), "007bff");
        assert!(model.route_polylines().is_empty());
        assert!(model.stop_markers().is_empty());
    }

    #[test]
    fn geojson() {
        let gj = match model().to_geojson() {
            GeoJson::FeatureCollection(fc) => fc,
            _ => panic!("not a FeatureCollection"),
        };
        assert_eq!(gj.features.len(), 3);
        assert_eq!(
            gj.features[0].property("type"),
            Some(&serde_json::Value::from("route"))
        );
        assert_eq!(
            gj.features[1].property("name"),
            Some(&serde_json::Value::from("Plaza"))
        );
    }
}
