//! Coordinate reference systems used by the Lot-2 products.
//!
//! Burst products carry geographic coordinates (EPSG:4326) while the gridded
//! 2D-deformation tiles are delivered on the ETRS89-LAEA grid (EPSG:3035).
//! The transform between the two is the ellipsoidal Lambert azimuthal
//! equal-area mapping on GRS80 with the European false origin.
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// GRS80 semi-major axis (m).
const A: f64 = 6_378_137.0;
/// GRS80 flattening.
const F: f64 = 1.0 / 298.257_222_101;

/// EPSG:3035 natural origin and false offsets.
const LAT_0: f64 = 52.0;
const LON_0: f64 = 10.0;
const FALSE_EASTING: f64 = 4_321_000.0;
const FALSE_NORTHING: f64 = 3_210_000.0;

/// The two reference systems handled by the crate.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Crs {
    /// WGS84 geographic, longitude/latitude in degrees
    Epsg4326,
    /// ETRS89-LAEA, easting/northing in metres
    Epsg3035,
}

impl Crs {
    pub fn code(&self) -> &'static str {
        match self {
            Crs::Epsg4326 => "EPSG:4326",
            Crs::Epsg3035 => "EPSG:3035",
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

fn e2() -> f64 {
    F * (2.0 - F)
}

fn ecc() -> f64 {
    e2().sqrt()
}

/// Authalic function q(phi) (Snyder 3-12).
fn q(lat: f64) -> f64 {
    let e = ecc();
    let s = lat.sin();
    (1.0 - e2()) * (s / (1.0 - e2() * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

/// Forward mapping: WGS84 degrees to EPSG:3035 metres.
pub fn laea_forward(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lat0 = LAT_0.to_radians();
    let lon0 = LON_0.to_radians();

    let qp = q(std::f64::consts::FRAC_PI_2);
    let rq = A * (qp / 2.0).sqrt();
    let beta = (q(lat) / qp).asin();
    let beta1 = (q(lat0) / qp).asin();
    let d = A * lat0.cos() / ((1.0 - e2() * lat0.sin().powi(2)).sqrt() * rq * beta1.cos());

    let dl = lon - lon0;
    let b = rq
        * (2.0 / (1.0 + beta1.sin() * beta.sin() + beta1.cos() * beta.cos() * dl.cos())).sqrt();

    let easting = FALSE_EASTING + b * d * beta.cos() * dl.sin();
    let northing =
        FALSE_NORTHING + (b / d) * (beta1.cos() * beta.sin() - beta1.sin() * beta.cos() * dl.cos());
    (easting, northing)
}

/// Inverse mapping: EPSG:3035 metres to WGS84 degrees.
pub fn laea_inverse(easting: f64, northing: f64) -> (f64, f64) {
    let lat0 = LAT_0.to_radians();
    let lon0 = LON_0.to_radians();

    let qp = q(std::f64::consts::FRAC_PI_2);
    let rq = A * (qp / 2.0).sqrt();
    let beta1 = (q(lat0) / qp).asin();
    let d = A * lat0.cos() / ((1.0 - e2() * lat0.sin().powi(2)).sqrt() * rq * beta1.cos());

    let x = easting - FALSE_EASTING;
    let y = northing - FALSE_NORTHING;

    let rho = ((x / d).powi(2) + (d * y).powi(2)).sqrt();
    if rho == 0.0 {
        return (LON_0, LAT_0);
    }
    let c = 2.0 * (rho / (2.0 * rq)).asin();
    let beta =
        (c.cos() * beta1.sin() + d * y * c.sin() * beta1.cos() / rho).asin();

    let lon = lon0
        + (x * c.sin()).atan2(d * rho * beta1.cos() * c.cos() - d * d * y * beta1.sin() * c.sin());

    // Series expansion from authalic to geodetic latitude (Snyder 3-18).
    let e2 = e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let lat = beta
        + (e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0) * (2.0 * beta).sin()
        + (23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0) * (4.0 * beta).sin()
        + (761.0 * e6 / 45360.0) * (6.0 * beta).sin();

    (lon.to_degrees(), lat.to_degrees())
}

/// Transform a coordinate between the two supported systems.
/// A no-op when `from` and `to` coincide.
pub fn transform(coord: Coord<f64>, from: Crs, to: Crs) -> Coord<f64> {
    match (from, to) {
        (Crs::Epsg4326, Crs::Epsg3035) => {
            let (x, y) = laea_forward(coord.x, coord.y);
            Coord { x, y }
        }
        (Crs::Epsg3035, Crs::Epsg4326) => {
            let (x, y) = laea_inverse(coord.x, coord.y);
            Coord { x, y }
        }
        _ => coord,
    }
}

/// Reproject a polygon ring in place.
pub fn transform_polygon(
    polygon: &geo_types::Polygon<f64>,
    from: Crs,
    to: Crs,
) -> geo_types::Polygon<f64> {
    let map_ring = |ring: &geo_types::LineString<f64>| {
        geo_types::LineString::from(
            ring.coords()
                .map(|c| transform(*c, from, to))
                .collect::<Vec<_>>(),
        )
    };
    geo_types::Polygon::new(
        map_ring(polygon.exterior()),
        polygon.interiors().iter().map(map_ring).collect(),
    )
}

pub fn transform_multi_polygon(
    mp: &geo_types::MultiPolygon<f64>,
    from: Crs,
    to: Crs,
) -> geo_types::MultiPolygon<f64> {
    geo_types::MultiPolygon(mp.0.iter().map(|p| transform_polygon(p, from, to)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn natural_origin_maps_to_false_origin() {
        let (e, n) = laea_forward(LON_0, LAT_0);
        assert_relative_eq!(e, FALSE_EASTING, epsilon = 1e-6);
        assert_relative_eq!(n, FALSE_NORTHING, epsilon = 1e-6);
    }

    #[test]
    fn epsg_guidance_sample_point() {
        // EPSG Guidance Note 7-2 worked example for ETRS89-LAEA:
        // 50N 5E -> 3962799.45E 2999718.85N
        let (e, n) = laea_forward(5.0, 50.0);
        assert_relative_eq!(e, 3_962_799.45, epsilon = 0.5);
        assert_relative_eq!(n, 2_999_718.85, epsilon = 0.5);
    }

    #[test]
    fn round_trip_over_italy() {
        for &(lon, lat) in &[(12.5, 41.9), (9.19, 45.46), (13.36, 38.12), (15.55, 38.19)] {
            let (e, n) = laea_forward(lon, lat);
            let (lon2, lat2) = laea_inverse(e, n);
            assert_relative_eq!(lon, lon2, epsilon = 1e-9);
            assert_relative_eq!(lat, lat2, epsilon = 1e-9);
        }
    }

    #[test]
    fn transform_is_identity_for_same_crs() {
        let c = Coord { x: 4_500_000.0, y: 2_100_000.0 };
        let out = transform(c, Crs::Epsg3035, Crs::Epsg3035);
        assert_eq!(c, out);
    }
}
