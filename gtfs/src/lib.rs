#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod ids;
mod lonlat;
mod routes;
mod shapes;
mod source;
mod stop_times;
mod stops;
mod table;
mod trips;

use std::collections::BTreeMap;

pub use ids::{RouteID, ShapeID, StopID, TripID};
pub use lonlat::LonLat;
pub use routes::Route;
pub use source::{DirSource, HttpSource, MemorySource, Source, ZipSource};
pub use stop_times::StopTime;
pub use stops::Stop;
pub use table::{Record, Table};
pub use trips::Trip;

/// Every file fetched for one agency
pub const FILES: [&str; 5] = [
    "routes.txt",
    "trips.txt",
    "stops.txt",
    "stop_times.txt",
    "shapes.txt",
];

/// The untyped tables of one feed, keyed by file name without `.txt`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFeed {
    tables: BTreeMap<String, Table>,
}

impl RawFeed {
    /// Fetches all of `FILES` concurrently. A file that can't be fetched or parsed is logged and
    /// becomes an empty table; the others still load.
    pub async fn load<S: Source>(source: &S, delimiter: u8) -> Self {
        let fetches = FILES.iter().map(move |file| async move {
            let table = match source
                .fetch(file)
                .await
                .and_then(|text| Table::parse(&text, delimiter))
            {
                Ok(table) => table,
                Err(err) => {
                    error!("Couldn't load {file} from {}: {err}", source.describe());
                    Table::empty()
                }
            };
            (resource_name(file), table)
        });
        let tables = futures::future::join_all(fetches)
            .await
            .into_iter()
            .collect();
        Self { tables }
    }

    pub fn insert(&mut self, name: &str, table: Table) {
        self.tables.insert(resource_name(name), table);
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// The generic view of one resource. A missing resource has no records.
    pub fn records(&self, name: &str) -> Vec<Record> {
        self.table(name).map(Table::records).unwrap_or_default()
    }
}

fn table_or<'a>(raw: &'a RawFeed, name: &str, empty: &'a Table) -> &'a Table {
    raw.table(name).unwrap_or(empty)
}

fn resource_name(file: &str) -> String {
    file.trim_end_matches(".txt").to_string()
}

/// The typed contents of one feed, each file in row order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GTFS {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub shapes: BTreeMap<ShapeID, Vec<LonLat>>,
}

impl GTFS {
    pub async fn load<S: Source>(source: &S, delimiter: u8) -> Self {
        Self::from_raw(&RawFeed::load(source, delimiter).await)
    }

    pub fn from_raw(raw: &RawFeed) -> Self {
        let empty = Table::empty();
        let gtfs = Self {
            stops: stops::load(table_or(raw, "stops", &empty)),
            routes: routes::load(table_or(raw, "routes", &empty)),
            trips: trips::load(table_or(raw, "trips", &empty)),
            stop_times: stop_times::load(table_or(raw, "stop_times", &empty)),
            shapes: shapes::load(table_or(raw, "shapes", &empty)),
        };
        info!(
            "Loaded {} stops, {} routes, {} trips, {} stop times, {} shapes",
            gtfs.stops.len(),
            gtfs.routes.len(),
            gtfs.trips.len(),
            gtfs.stop_times.len(),
            gtfs.shapes.len()
        );
        gtfs
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
