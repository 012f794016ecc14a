//! Reporting over the stored listings: which adverts sit near the
//! Khujand city centre, plus a per-district tally.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::models::Listing;
use crate::store;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Khujand city centre
const CENTER_LATITUDE: f64 = 40.285158;
const CENTER_LONGITUDE: f64 = 69.618972;
const CENTER_RADIUS_KM: f64 = 1.0;

/// Title keywords that stand in for coordinates on non-geotagged adverts
const CENTER_KEYWORDS: [&str; 4] = ["универмаг", "центр", "бог", "ватан"];

/// Print every stored listing that is in or near the city centre.
///
/// Geotagged listings are filtered by haversine distance from the centre
/// point; the rest fall back to a keyword match on the title. Any file or
/// decode error is fatal to the whole report.
pub fn run(path: &Path) -> Result<()> {
    let listings = store::load(path)?;

    let mut districts: HashMap<String, usize> = HashMap::new();
    for listing in &listings {
        *districts.entry(listing.attributes.district.clone()).or_insert(0) += 1;
    }

    for (district, count) in &districts {
        debug!("District {:?}: {} listings", district, count);
    }

    for listing in select_centers(&listings) {
        println!("{}", listing.title);
        println!(" {}", listing.detail_url());
    }

    Ok(())
}

/// Pick the listings in or near the city centre: geotagged ones by
/// distance from the centre point, the rest by title keywords.
fn select_centers(listings: &[Listing]) -> Vec<&Listing> {
    listings
        .iter()
        .filter(|listing| match &listing.coordinates {
            Some(coordinates) => is_near_center(coordinates.latitude, coordinates.longitude),
            None => title_matches_keywords(&listing.title),
        })
        .collect()
}

/// Great-circle distance in kilometres between two points given in
/// degrees (haversine formula).
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let delta_lat = lat2 - lat1;
    let delta_lon = lon2 - lon1;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether the point lies within the configured radius of the city centre
pub fn is_near_center(latitude: f64, longitude: f64) -> bool {
    haversine(latitude, longitude, CENTER_LATITUDE, CENTER_LONGITUDE) <= CENTER_RADIUS_KM
}

/// Case-insensitive substring match against the centre keyword list
pub fn title_matches_keywords(title: &str) -> bool {
    let title = title.to_lowercase();
    CENTER_KEYWORDS.iter().any(|keyword| title.contains(keyword))
}
