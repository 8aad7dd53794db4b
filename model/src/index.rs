use std::collections::{BTreeMap, HashMap};

use gtfs::{Route, RouteID, StopID, Trip, TripID, GTFS};

/// One scheduled departure from a stop, denormalized with the line it belongs to
#[derive(Clone, Debug, PartialEq)]
pub struct DepartureEvent {
    /// Verbatim `departure_time`, possibly past 24:00:00
    pub time: String,
    pub line_short_name: String,
    pub line_long_name: String,
}

/// Lookups derived from one feed. Built once per load and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleIndex {
    /// The last route in the file wins for duplicate IDs
    pub routes_by_id: BTreeMap<RouteID, Route>,
    /// Trips in file order. The route ID doesn't have to exist.
    pub trips_by_route: BTreeMap<RouteID, Vec<Trip>>,
    /// Events in stop_times.txt order, not sorted by time
    pub departures_by_stop: BTreeMap<StopID, Vec<DepartureEvent>>,
}

impl ScheduleIndex {
    pub fn build(gtfs: &GTFS) -> Self {
        let mut routes_by_id = BTreeMap::new();
        for route in &gtfs.routes {
            routes_by_id.insert(route.route_id.clone(), route.clone());
        }

        let mut trips_by_route: BTreeMap<RouteID, Vec<Trip>> = BTreeMap::new();
        // For duplicate trip IDs, the first one is used
        let mut trips_by_id: HashMap<&TripID, &Trip> = HashMap::new();
        for trip in &gtfs.trips {
            trips_by_route
                .entry(trip.route_id.clone())
                .or_insert_with(Vec::new)
                .push(trip.clone());
            trips_by_id.entry(&trip.trip_id).or_insert(trip);
        }

        let mut departures_by_stop: BTreeMap<StopID, Vec<DepartureEvent>> = BTreeMap::new();
        let mut no_time = 0;
        let mut unknown_trip = 0;
        let mut unknown_route = 0;
        for st in &gtfs.stop_times {
            if st.departure_time.is_empty() {
                no_time += 1;
                continue;
            }
            let trip = match trips_by_id.get(&st.trip_id) {
                Some(trip) => trip,
                None => {
                    debug!("Stop time at {} has unknown trip {}", st.stop_id, st.trip_id);
                    unknown_trip += 1;
                    continue;
                }
            };
            let route = match routes_by_id.get(&trip.route_id) {
                Some(route) => route,
                None => {
                    debug!("Trip {} has unknown route {}", trip.trip_id, trip.route_id);
                    unknown_route += 1;
                    continue;
                }
            };
            departures_by_stop
                .entry(st.stop_id.clone())
                .or_insert_with(Vec::new)
                .push(DepartureEvent {
                    time: st.departure_time.clone(),
                    line_short_name: route.short_name.clone(),
                    line_long_name: route.long_name.clone(),
                });
        }

        if no_time + unknown_trip + unknown_route > 0 {
            info!(
                "Excluded stop times: {no_time} without a departure time, {unknown_trip} with an unknown trip, {unknown_route} with an unknown route"
            );
        }

        Self {
            routes_by_id,
            trips_by_route,
            departures_by_stop,
        }
    }

    pub fn departures(&self, stop: &StopID) -> &[DepartureEvent] {
        self.departures_by_stop
            .get(stop)
            .map(|x| x.as_slice())
            .unwrap_or(&[])
    }
}
