use serde::Deserialize;

use super::{LonLat, StopID, Table};

#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub stop_id: StopID,
    pub name: String,
    /// None when stops.txt has a missing or non-numeric coordinate. These can't be drawn.
    pub pos: Option<LonLat>,
}

pub fn load(table: &Table) -> Vec<Stop> {
    let mut stops = Vec::new();
    for rec in table.deserialize::<Record>("stops") {
        let pos = LonLat::parse(&rec.stop_lon, &rec.stop_lat);
        if pos.is_none() {
            debug!(
                "Stop {} has invalid coordinates ({:?}, {:?})",
                rec.stop_id, rec.stop_lat, rec.stop_lon
            );
        }
        stops.push(Stop {
            stop_id: rec.stop_id,
            name: rec.stop_name,
            pos,
        });
    }
    stops
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Record {
    stop_id: StopID,
    stop_name: String,
    // Parsed by hand, so a bad value drops the position instead of the whole row
    stop_lat: String,
    stop_lon: String,
}
