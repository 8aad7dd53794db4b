#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod config;
mod departures;
mod index;
mod layers;

use anyhow::Result;
use chrono::NaiveDateTime;

use gtfs::{DirSource, HttpSource, StopID, ZipSource, GTFS};

pub use self::config::{Config, SourceConfig};
pub use self::departures::{
    departure_instant, Countdown, UpcomingDeparture, IMMINENT_MINUTES, MAX_UPCOMING,
};
pub use self::index::{DepartureEvent, ScheduleIndex};
pub use self::layers::{RoutePolyline, StopMarker};

/// Everything loaded for one agency. The index is built once here and only read afterwards.
pub struct Model {
    pub agency: String,
    pub gtfs: GTFS,
    pub index: ScheduleIndex,
    route_color_fallback: String,
}

impl Model {
    /// Fetches and indexes the feed. Files that fail to load are logged and treated as empty;
    /// only a bad config is an error.
    pub async fn load(config: &Config) -> Result<Self> {
        let delimiter = config.delimiter_byte()?;
        info!("Loading {}", config.agency);
        let gtfs = match config.source {
            SourceConfig::Http { ref url } => GTFS::load(&HttpSource::new(url)?, delimiter).await,
            SourceConfig::Dir { ref path } => GTFS::load(&DirSource::new(path), delimiter).await,
            SourceConfig::Zip {
                ref path,
                ref prefix,
            } => GTFS::load(&ZipSource::new(path, prefix.clone()), delimiter).await,
        };
        Ok(Self::new(
            &config.agency,
            gtfs,
            &config.route_color_fallback,
        ))
    }

    pub fn new(agency: &str, gtfs: GTFS, route_color_fallback: &str) -> Self {
        let index = ScheduleIndex::build(&gtfs);
        info!(
            "Indexed {}: {} routes, {} stops with departures",
            agency,
            index.routes_by_id.len(),
            index.departures_by_stop.len()
        );
        Self {
            agency: agency.to_string(),
            gtfs,
            index,
            route_color_fallback: route_color_fallback.to_string(),
        }
    }

    pub fn upcoming_departures(
        &self,
        stop: &StopID,
        now: NaiveDateTime,
    ) -> Vec<UpcomingDeparture> {
        self.index.upcoming_departures(stop, now)
    }

    /// Uses the local wall-clock time
    pub fn upcoming_departures_now(&self, stop: &StopID) -> Vec<UpcomingDeparture> {
        self.upcoming_departures(stop, chrono::Local::now().naive_local())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[tokio::test]
    async fn load_from_dir_with_missing_file() {
        let dir = std::env::temp_dir().join(format!("model-load-{}", std::process::id()));
        let agency_dir = dir.join("autobusosalmassora");
        std::fs::create_dir_all(&agency_dir).unwrap();
        std::fs::write(
            agency_dir.join("routes.txt"),
            "route_id,route_short_name,route_long_name,route_color\nR1,1,Centre,\n",
        )
        .unwrap();
        std::fs::write(agency_dir.join("trips.txt"), "route_id,trip_id,shape_id\nR1,T1,\n")
            .unwrap();
        std::fs::write(
            agency_dir.join("stops.txt"),
            "stop_id,stop_name,stop_lat,stop_lon\nS1,Plaza,39.95,-0.07\n",
        )
        .unwrap();
        std::fs::write(
            agency_dir.join("stop_times.txt"),
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence\nT1,23:55:00,23:55:00,S1,1\n\n",
        )
        .unwrap();
        // No shapes.txt

        let config = Config::for_dir(&dir, "autobusosalmassora");
        let model = Model::load(&config).await.unwrap();
        assert_eq!(model.agency, "autobusosalmassora");
        assert!(model.gtfs.shapes.is_empty());
        assert!(model.route_polylines().is_empty());

        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(23, 50, 0)
            .unwrap();
        let departures = model.upcoming_departures(&StopID::new("S1"), now);
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].countdown, Countdown::Minutes(5));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn bad_delimiter_is_an_error() {
        let mut config = Config::for_dir("/nonexistent", "x");
        config.delimiter = 'é';
        assert!(Model::load(&config).await.is_err());
    }

    #[test]
    fn now_uses_the_clock() {
        let model = Model::new("empty", GTFS::empty(), "007bff");
        assert!(model
            .upcoming_departures_now(&StopID::new("S1"))
            .is_empty());
    }
}
