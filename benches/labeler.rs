use criterion::{criterion_group, criterion_main, Criterion};
use flightseg::{label_track, AnalysisConfig, TrackPoint};

fn synthetic_track(n: usize) -> Vec<TrackPoint> {
    // Alternating straight legs and thermal circles, close to a real flight.
    let dt = std::f64::consts::TAU / 90.0;
    (0..n)
        .map(|k| {
            let leg = k / 300;
            let (lon, lat) = if leg % 2 == 0 {
                (7.0 + 0.0001 * k as f64, 46.0 + 0.0002 * k as f64)
            } else {
                let t = dt * (k % 300) as f64;
                (
                    7.0 + 0.0001 * k as f64 + 0.003 * t.sin(),
                    46.0 + 0.0002 * k as f64 - 0.003 * t.cos(),
                )
            };
            TrackPoint {
                timestamp: format!("2024-02-11 14:{:02}:{:02}", k / 60 % 60, k % 60),
                altitude: 1800.0 - 0.3 * k as f64,
                horizontal_velocity: 10.5,
                vertical_velocity: -1.1,
                distance_to_takeoff: 0.01 * k as f64,
                longitude: lon,
                latitude: lat,
            }
        })
        .collect()
}

fn benchmark_label_track(c: &mut Criterion) {
    let points = synthetic_track(3000);
    let config = AnalysisConfig::default();
    c.bench_function("label_track 3000 samples", |b| {
        b.iter(|| label_track(&points, &config).unwrap())
    });
}

criterion_group!(benches, benchmark_label_track);
criterion_main!(benches);
