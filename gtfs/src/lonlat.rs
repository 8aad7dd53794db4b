/// A WGS84 position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// None if either coordinate isn't a finite decimal number
    pub fn parse(lon: &str, lat: &str) -> Option<Self> {
        let longitude = lon.trim().parse::<f64>().ok().filter(|x| x.is_finite())?;
        let latitude = lat.trim().parse::<f64>().ok().filter(|x| x.is_finite())?;
        Some(Self::new(longitude, latitude))
    }

    /// (longitude, latitude), the GeoJSON order
    pub fn to_vec(self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}
