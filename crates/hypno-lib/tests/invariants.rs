use hypno_lib::{
    config::ChartConfig, detect_rem_markers, generate_series, ChartController, CoordinateMapper,
    JitterConfig, PhaseSpec, SequenceSource, Viewport,
};
use rand::{rngs::StdRng, SeedableRng};

fn scenario_phases() -> Vec<PhaseSpec> {
    vec![
        PhaseSpec::new("Light Sleep", 45.0, 57.0),
        PhaseSpec::new("Deep Sleep", 30.0, 52.0),
        PhaseSpec::new("REM Sleep", 25.0, 63.0),
    ]
}

#[test]
fn generated_nights_hold_every_invariant() {
    let jitter = JitterConfig::default();
    for seed in 0..100u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = (seed as usize * 7) % 300;
        let series = generate_series(&scenario_phases(), count, 2.5, &jitter, &mut rng).unwrap();
        assert_eq!(series.len(), count);
        for w in series.samples().windows(2) {
            assert!(w[0].time < w[1].time);
        }
        for (window, spacing) in [(6, 18), (3, 4), (12, 0)] {
            let markers = detect_rem_markers(&series, window, spacing).unwrap();
            for pair in markers.windows(2) {
                assert!(pair[1].sample_index > pair[0].sample_index);
                assert!(pair[1].sample_index - pair[0].sample_index > spacing);
            }
        }
    }
}

#[test]
fn injected_sequence_replays_identically() {
    let draws: Vec<f64> = (0..37).map(|i| (i as f64 * 0.137) % 1.0).collect();
    let mut a = SequenceSource::new(draws.clone());
    let mut b = SequenceSource::new(draws);
    let jitter = JitterConfig::default();
    let first = generate_series(&scenario_phases(), 96, 2.5, &jitter, &mut a).unwrap();
    let second = generate_series(&scenario_phases(), 96, 2.5, &jitter, &mut b).unwrap();
    assert_eq!(first, second);
    assert!(a.draws() > 0);
}

#[test]
fn zero_jitter_night_cycles_through_phases() {
    let mut source = SequenceSource::new(Vec::new());
    let series =
        generate_series(&scenario_phases(), 96, 2.5, &JitterConfig::none(), &mut source).unwrap();
    let values: Vec<f64> = series.values().collect();
    assert_eq!(values[0], 57.0);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(min, 52.0);
    assert_eq!(max, 63.0);
    // one cycle is 18 + 12 + 10 samples, so the second cycle opens at 40
    assert!((values[42] - 57.0).abs() < 1e-9);
    assert_eq!(values[60], 52.0);
}

#[test]
fn mapper_corners_and_round_trip() {
    let viewport = Viewport::new(1280.0, 720.0, 50.0);
    let mapper = CoordinateMapper::new(viewport, 40.0, 120.0, 96);
    assert_eq!(mapper.to_pixel(0, 40.0), (50.0, 670.0));
    let (x, y) = mapper.to_pixel(95, 120.0);
    assert!((x - 1230.0).abs() < 1e-9);
    assert!((y - 50.0).abs() < 1e-9);
    for i in 0..96 {
        let (x, _) = mapper.to_pixel(i, 70.0);
        assert_eq!(mapper.to_sample_index(x), i as i64);
    }
}

#[test]
fn controller_cursor_tracks_resized_viewport() {
    let mut controller = ChartController::with_seed(ChartConfig::default(), 5).unwrap();
    controller.resize(500.0, 300.0);
    let mapper = controller.mapper();
    let (x, _) = mapper.to_pixel(40, 0.0);
    assert_eq!(
        controller.cursor_sample(x + 0.5, 10.0),
        controller.current_series().get(40).copied()
    );
    assert!(controller.cursor_sample(x, 10.0).is_some());
    assert!(controller.cursor_sample(-20.0, 10.0).is_none());
}
