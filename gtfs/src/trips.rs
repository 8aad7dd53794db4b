use serde::Deserialize;

use super::{RouteID, ShapeID, Table, TripID};

#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub trip_id: TripID,
    /// Not guaranteed to match any route
    pub route_id: RouteID,
    pub shape_id: Option<ShapeID>,
}

pub fn load(table: &Table) -> Vec<Trip> {
    table
        .deserialize::<Record>("trips")
        .into_iter()
        .map(|rec| Trip {
            trip_id: rec.trip_id,
            route_id: rec.route_id,
            shape_id: rec.shape_id,
        })
        .collect()
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Record {
    trip_id: TripID,
    route_id: RouteID,
    shape_id: Option<ShapeID>,
}
