use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use polars::prelude::*;
use std::hint::black_box;

use ozdes_lightcurve::algorithms::coadd::{CalibrationCorrection, NightCoadder};
use ozdes_lightcurve::core::domain::PhotometryPoint;
use ozdes_lightcurve::transformations::{quality_filter, sort_by_band_and_date};

const BANDS: [&str; 3] = ["g", "r", "i"];

/// Band-grouped, date-sorted points with `per_night` exposures each night
fn sorted_points(nights: usize, per_night: usize) -> Vec<PhotometryPoint> {
    let mut points = Vec::with_capacity(BANDS.len() * nights * per_night);
    for band in BANDS {
        for night in 0..nights {
            for exposure in 0..per_night {
                let mjd = 56530.0 + night as f64 + 0.01 * exposure as f64;
                let mag = 20.0 + 0.05 * ((night + exposure) % 7) as f64;
                points.push(PhotometryPoint::new(mjd, mag, 0.02, band));
            }
        }
    }
    points
}

fn raw_frame(rows: usize) -> DataFrame {
    let mjd: Vec<f64> = (0..rows).map(|i| 56530.0 + (i / 4) as f64 + 0.01 * (i % 4) as f64).collect();
    let band: Vec<&str> = (0..rows).map(|i| BANDS[i % 3]).collect();
    let flux: Vec<f64> = (0..rows).map(|i| 1000.0 + (i % 13) as f64).collect();
    let flux_err: Vec<f64> = vec![10.0; rows];
    let zp: Vec<f64> = vec![30.0; rows];
    let flags: Vec<i64> = (0..rows).map(|i| (i % 5) as i64).collect();
    df!(
        "MJD_OBS" => mjd,
        "BAND" => band,
        "FLUX_AUTO" => flux,
        "FLUXERR_AUTO" => flux_err,
        "MAG_ZERO" => zp,
        "FLAGS" => flags
    )
    .expect("benchmark frame")
}

fn bench_night_coadd(c: &mut Criterion) {
    let mut group = c.benchmark_group("night_coadd");
    let coadder = NightCoadder::new(CalibrationCorrection::des());

    for per_night in [1usize, 4, 16] {
        let points = sorted_points(500, per_night);
        group.bench_with_input(
            BenchmarkId::new("points_per_night", per_night),
            &points,
            |b, points| b.iter(|| coadder.coadd(black_box(points))),
        );
    }

    group.finish();
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_sort");
    let bands: Vec<String> = BANDS.iter().map(|b| b.to_string()).collect();
    let raw = raw_frame(20_000);

    group.bench_function("quality_filter", |b| {
        b.iter(|| quality_filter(black_box(&raw), &bands))
    });

    let filtered = quality_filter(&raw, &bands).expect("filtered frame");
    group.bench_function("sort_by_band_and_date", |b| {
        b.iter(|| sort_by_band_and_date(black_box(&filtered), &bands))
    });

    group.finish();
}

criterion_group!(benches, bench_night_coadd, bench_filter_and_sort);
criterion_main!(benches);
