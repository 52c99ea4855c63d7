//! Grazing kinematics

use rand::Rng;

use crate::core::config::KM_PER_DEGREE;
use crate::core::types::GeoPoint;

/// Longitude degrees never shrink below this factor, so positions stay finite near the poles
const MIN_LNG_SCALE: f64 = 1e-6;

/// Move `position` along `heading` (degrees clockwise from north) at
/// `speed_kmh` for `elapsed_seconds`
pub fn advance_position(position: GeoPoint, heading: f64, speed_kmh: f64, elapsed_seconds: f64) -> GeoPoint {
    let distance_km = speed_kmh.max(0.0) * elapsed_seconds / 3600.0;
    if distance_km == 0.0 {
        return position;
    }

    let rad = heading.to_radians();
    let lng_scale = position.lat.to_radians().cos().abs().max(MIN_LNG_SCALE);

    GeoPoint::new(
        position.lat + distance_km * rad.cos() / KM_PER_DEGREE,
        position.lng + distance_km * rad.sin() / (KM_PER_DEGREE * lng_scale),
    )
}

/// Nudge a heading by a uniform draw in ±`max_drift` degrees, wrapped into [0, 360)
pub fn drift_heading<R: Rng + ?Sized>(heading: f64, max_drift: f64, rng: &mut R) -> f64 {
    let delta = if max_drift > 0.0 {
        rng.gen_range(-max_drift..=max_drift)
    } else {
        0.0
    };
    let wrapped = (heading + delta).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_stationary_animal_stays_put() {
        let p = GeoPoint::new(26.1158, 91.7086);
        assert_eq!(advance_position(p, 45.0, 0.0, 5.0), p);
    }

    #[test]
    fn test_north_heading_moves_latitude_only() {
        let p = GeoPoint::new(26.1158, 91.7086);
        let moved = advance_position(p, 0.0, 3.6, 3600.0);
        // 3.6 km due north
        assert!((moved.lat - p.lat - 3.6 / KM_PER_DEGREE).abs() < 1e-12);
        assert!((moved.lng - p.lng).abs() < 1e-12);
    }

    #[test]
    fn test_east_heading_scales_with_latitude() {
        let p = GeoPoint::new(60.0, 10.0);
        let moved = advance_position(p, 90.0, 1.0, 3600.0);
        // cos(60°) = 0.5, so one km east is twice as many degrees
        assert!((moved.lng - p.lng - 2.0 / KM_PER_DEGREE).abs() < 1e-9);
        assert!((moved.lat - p.lat).abs() < 1e-12);
    }

    #[test]
    fn test_drift_is_bounded_and_wrapped() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for start in [0.0, 5.0, 180.0, 355.0, 359.999] {
            for _ in 0..200 {
                let h = drift_heading(start, 10.0, &mut rng);
                assert!((0.0..360.0).contains(&h), "heading {} out of range", h);
                let diff = (h - start).rem_euclid(360.0);
                let diff = diff.min(360.0 - diff);
                assert!(diff <= 10.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_drift_keeps_heading() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(drift_heading(123.0, 0.0, &mut rng), 123.0);
    }
}
