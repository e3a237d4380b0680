use crate::cell::LatLon;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres.
#[must_use]
pub fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = LatLon::new(25.033, 121.565_4);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn taipei_to_kaohsiung() {
        let taipei = LatLon::new(25.047_7, 121.517_1);
        let kaohsiung = LatLon::new(22.627_3, 120.301_4);
        let d = haversine_km(taipei, kaohsiung);
        assert!((d - 297.0).abs() < 5.0, "expected ~297 km, got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LatLon::new(24.147_7, 120.673_6);
        let b = LatLon::new(23.480_0, 120.449_0);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn one_cell_is_roughly_one_kilometre() {
        let corner = LatLon::new(25.029, 121.56);
        let north = haversine_km(corner, LatLon::new(25.038, 121.56));
        let east = haversine_km(corner, LatLon::new(25.029, 121.57));
        assert!((north - 1.0).abs() < 0.05, "north edge {north} km");
        assert!((east - 1.0).abs() < 0.05, "east edge {east} km");
    }
}
