#[cfg(test)]
mod tests {
    use dnc_trace::config::PointBounds;
    use dnc_trace::input::{parse_points, random_points};
    use dnc_trace::{ClosestPairRun, Phase, PointSet, closest_pair, trace_digest};
    use proptest::prelude::*;

    fn brute_force_min(points: &PointSet) -> f64 {
        let pts = points.points();
        let mut best = f64::INFINITY;
        for i in 0..pts.len() {
            for j in i + 1..pts.len() {
                best = best.min(pts[i].distance(&pts[j]));
            }
        }
        best
    }

    fn assert_step_shapes(run: &ClosestPairRun) {
        for step in &run.steps {
            match step.phase {
                Phase::Base => {
                    assert!(step.comparing.is_some());
                    assert!(step.distance.is_some());
                    assert!(step.median_x.is_none());
                }
                Phase::Divide => {
                    assert!(step.comparing.is_none());
                    assert!(step.distance.is_none());
                    assert!(!step.is_best);
                    assert!(step.median_x.is_some());
                }
                Phase::Strip => {
                    assert!(step.comparing.is_some());
                    assert!(step.median_x.is_some());
                }
            }
        }
    }

    #[test]
    fn test_scenario_three_points() {
        let set = PointSet::from_coords(&[(0.0, 0.0), (1.0, 1.0), (5.0, 5.0)]).unwrap();
        let run = closest_pair(&set);
        assert!((run.min_dist - 1.41421).abs() < 1e-5);
        assert_eq!(run.pair.0.id, 0);
        assert_eq!(run.pair.1.id, 1);
        assert!(run.steps.iter().all(|s| s.phase == Phase::Base));
    }

    #[test]
    fn test_scenario_two_points() {
        let set = PointSet::from_coords(&[(0.0, 0.0), (3.0, 4.0)]).unwrap();
        assert_eq!(closest_pair(&set).min_dist, 5.0);
    }

    #[test]
    fn test_parsed_file_end_to_end() {
        let text = "# header line\n0,0\n10,10\n10.5,10\n20 0\n-3 7\n4 4\n";
        let set = parse_points(text).unwrap();
        assert_eq!(set.len(), 6);
        let run = closest_pair(&set);
        assert_eq!(run.min_dist, 0.5);
        assert_eq!(run.pair.0.id.min(run.pair.1.id), 1);
        assert_eq!(run.pair.0.id.max(run.pair.1.id), 2);
        assert_eq!(run.steps[0].phase, Phase::Divide);
        assert_step_shapes(&run);
    }

    #[test]
    fn test_tied_halves_take_right_pair() {
        let set = PointSet::from_coords(&[
            (0.0, 0.0),
            (0.0, 3.0),
            (100.0, 0.0),
            (100.0, 3.0),
        ])
        .unwrap();
        let run = closest_pair(&set);
        assert_eq!(run.min_dist, 3.0);
        assert_eq!(run.all_pairs.len(), 1);
        assert!(run.in_final_pair(2) && run.in_final_pair(3));
    }

    #[test]
    fn test_random_sets_idempotent() {
        let bounds = PointBounds::default();
        for seed in 0..10 {
            let set = random_points(100, &bounds, Some(seed)).unwrap();
            let a = closest_pair(&set);
            let b = closest_pair(&set);
            assert_eq!(a, b);
            assert_eq!(trace_digest(&a.steps).unwrap(), trace_digest(&b.steps).unwrap());
            assert_eq!(a.min_dist, brute_force_min(&set));
        }
    }

    fn point_sets() -> impl Strategy<Value = PointSet> {
        proptest::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 2..=200)
            .prop_map(|coords| PointSet::from_coords(&coords).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            .. ProptestConfig::default()
        })]

        #[test]
        fn prop_matches_brute_force(set in point_sets()) {
            let run = closest_pair(&set);
            prop_assert_eq!(run.min_dist, brute_force_min(&set));
            prop_assert_eq!(run.pair.0.distance(&run.pair.1), run.min_dist);
            prop_assert_eq!(run.all_pairs[0], run.pair);
            assert_step_shapes(&run);
        }

        #[test]
        fn prop_idempotent(set in point_sets()) {
            let a = closest_pair(&set);
            let b = closest_pair(&set);
            prop_assert_eq!(a, b);
        }
    }
}
