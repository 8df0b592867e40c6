//! 地理围栏计算

/// 地球平均半径（米）
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// 两点间的大圆距离（米），使用 haversine 公式
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// 距离不超过半径即视为在围栏内（边界包含）
pub fn within_radius(distance_meters: f64, radius_meters: u32) -> bool {
    distance_meters <= f64::from(radius_meters)
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_distance(-6.2, 106.8, -6.2, 106.8), 0.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        // 1 度纬度约 111.19 km
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_194.93).abs() < 1.0, "distance was {d}");
    }

    #[test]
    fn test_radius_boundary() {
        let d = haversine_distance(-6.2, 106.816666, -6.2009, 106.816666);
        let radius = d.round() as u32;
        // 恰好等于半径时接受
        assert!(within_radius(f64::from(radius), radius));
        assert!(!within_radius(f64::from(radius) + 0.001, radius));
        assert!(within_radius(d, radius + 1));
        assert!(!within_radius(d, radius.saturating_sub(1)));
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(-6.2, 106.8).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }
}
