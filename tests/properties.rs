//! Property tests over randomly generated herds, vitals and points

use proptest::prelude::*;

use herd_watch::alerts::AlertKind;
use herd_watch::core::config::TelemetryConfig;
use herd_watch::core::types::{Category, GeoPoint};
use herd_watch::geofence::{classify, FenceSet};
use herd_watch::health::{assess, summarize};
use herd_watch::herd::{HerdCounts, Vitals};
use herd_watch::simulation::Simulation;

fn counts_strategy() -> impl Strategy<Value = HerdCounts> {
    (0i64..8, 0i64..8, 0i64..8, 0i64..8, 0i64..12).prop_map(|(cattle, mithun, goats, pigs, poultry)| {
        HerdCounts { cattle, mithun, goats, pigs, poultry }
    })
}

fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_step_preserves_population(counts in counts_strategy(), seed in any::<u64>(), ticks in 1u64..6) {
        let mut sim = Simulation::new(TelemetryConfig::default(), seed).unwrap();
        sim.reset(&counts).unwrap();
        for _ in 0..ticks {
            sim.tick().unwrap();
            prop_assert_eq!(sim.animals().len() as i64, counts.total());
        }
        let summary = summarize(sim.animals());
        prop_assert_eq!(summary.total as i64, counts.total());
        prop_assert_eq!(summary.health.total() as i64, counts.total());
    }

    #[test]
    fn prop_health_status_follows_vitals(counts in counts_strategy(), seed in any::<u64>()) {
        let config = TelemetryConfig::default();
        let mut sim = Simulation::new(config.clone(), seed).unwrap();
        sim.reset(&counts).unwrap();
        sim.run(3).unwrap();
        for animal in sim.animals() {
            let thresholds = &config.profile(animal.category).thresholds;
            prop_assert_eq!(animal.health_status(), assess(&animal.vitals, thresholds));
        }
    }

    #[test]
    fn prop_assess_is_pure(
        category in category_strategy(),
        temperature in 35.0f64..45.0,
        heart_rate in 0.0f64..500.0,
        activity in 0.0f64..100.0,
        stress in 0.0f64..100.0,
    ) {
        let config = TelemetryConfig::default();
        let thresholds = &config.profile(category).thresholds;
        let vitals = Vitals::new(temperature, heart_rate, activity, stress);
        prop_assert_eq!(assess(&vitals, thresholds), assess(&vitals, thresholds));
    }

    #[test]
    fn prop_classification_is_idempotent(lat in 26.09f64..26.14, lng in 91.69f64..91.73) {
        let fences = FenceSet::default_farm();
        let point = GeoPoint::new(lat, lng);
        prop_assert_eq!(classify(point, &fences), classify(point, &fences));
    }

    #[test]
    fn prop_far_points_are_outside(lat in -80.0f64..80.0, lng in -170.0f64..170.0) {
        let fences = FenceSet::default_farm();
        let point = GeoPoint::new(lat, lng);
        prop_assume!((lat - 26.1158).abs() > 1.0 || (lng - 91.7086).abs() > 1.0);
        prop_assert_eq!(classify(point, &fences), herd_watch::herd::BoundaryStatus::Outside);
    }

    #[test]
    fn prop_events_match_status_transitions(seed in any::<u64>(), ticks in 1u64..15) {
        let mut sim = Simulation::new(TelemetryConfig::default(), seed).unwrap();
        sim.reset(&HerdCounts::only(Category::Cattle, 10)).unwrap();

        for _ in 0..ticks {
            let before = sim.animals().to_vec();
            let events = sim.tick().unwrap();

            for (old, new) in before.iter().zip(sim.animals()) {
                let transitions = [
                    (AlertKind::Health, old.health_status().is_violating(), new.health_status().is_violating()),
                    (AlertKind::GeoFence, old.boundary_status().is_violating(), new.boundary_status().is_violating()),
                ];
                for (kind, was, is) in transitions {
                    let emitted: Vec<_> = events
                        .iter()
                        .filter(|e| e.subject_id() == &new.id && e.kind() == kind)
                        .collect();
                    match (was, is) {
                        (false, true) => {
                            prop_assert_eq!(emitted.len(), 1);
                            prop_assert!(emitted[0].is_opened());
                        }
                        (true, false) => {
                            prop_assert_eq!(emitted.len(), 1);
                            prop_assert!(!emitted[0].is_opened());
                        }
                        _ => prop_assert!(emitted.is_empty()),
                    }
                    prop_assert_eq!(sim.ledger().is_open(&new.id, kind), is);
                }
            }
            prop_assert!(sim.ledger().check_invariants().is_ok());
        }
    }
}
