use std::collections::BTreeMap;

use serde::Deserialize;

use super::{LonLat, ShapeID, Table};

/// Groups points per shape in file order, which defines the polyline. Points with bad
/// coordinates are skipped.
pub fn load(table: &Table) -> BTreeMap<ShapeID, Vec<LonLat>> {
    let mut pts_per_shape: BTreeMap<ShapeID, Vec<LonLat>> = BTreeMap::new();
    let mut skipped = 0;
    for rec in table.deserialize::<Record>("shapes") {
        match LonLat::parse(&rec.shape_pt_lon, &rec.shape_pt_lat) {
            Some(pt) => {
                pts_per_shape
                    .entry(rec.shape_id)
                    .or_insert_with(Vec::new)
                    .push(pt);
            }
            None => {
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!("Skipped {skipped} shape points with invalid coordinates");
    }
    pts_per_shape
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Record {
    shape_id: ShapeID,
    shape_pt_lat: String,
    shape_pt_lon: String,
}
