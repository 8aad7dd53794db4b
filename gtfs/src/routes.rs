use serde::Deserialize;

use super::{RouteID, Table};

#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub route_id: RouteID,
    pub short_name: String,
    pub long_name: String,
    /// Hex without the leading `#`
    pub color: Option<String>,
}

impl Route {
    pub fn describe(&self) -> String {
        format!("Line {}: {}", self.short_name, self.long_name)
    }
}

pub fn load(table: &Table) -> Vec<Route> {
    table
        .deserialize::<Record>("routes")
        .into_iter()
        .map(|rec| Route {
            route_id: rec.route_id,
            short_name: rec.route_short_name,
            long_name: rec.route_long_name,
            color: rec.route_color,
        })
        .collect()
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Record {
    route_id: RouteID,
    route_short_name: String,
    route_long_name: String,
    route_color: Option<String>,
}
