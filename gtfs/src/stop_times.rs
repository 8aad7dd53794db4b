use serde::Deserialize;

use super::{StopID, Table, TripID};

#[derive(Clone, Debug, PartialEq)]
pub struct StopTime {
    pub trip_id: TripID,
    pub stop_id: StopID,
    /// Verbatim `HH:MM:SS`. The hour may exceed 23 for service past midnight, so this isn't
    /// interpreted until a departure is compared against a real date.
    pub departure_time: String,
}

pub fn load(table: &Table) -> Vec<StopTime> {
    table
        .deserialize::<Record>("stop_times")
        .into_iter()
        .map(|rec| StopTime {
            trip_id: rec.trip_id,
            stop_id: rec.stop_id,
            departure_time: rec.departure_time,
        })
        .collect()
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Record {
    trip_id: TripID,
    stop_id: StopID,
    departure_time: String,
}
