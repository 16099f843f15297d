//! Criterion benchmarks for the indicator layer and the simulation loop.
//!
//! The single-pass indicator requirement only matters if it stays fast as
//! series grow; these benches watch the hot paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use siglab_core::domain::Bar;
use siglab_core::indicators::{
    Adx, Bollinger, Ema, IndicatorCache, Indicator, Macd, Mfi, Rsi, Sma, Stochastic,
};
use siglab_core::sim::{SimConfig, TradeSimulator};
use siglab_core::strategies::{create_strategy, StrategyConfig};

fn make_bars(n: usize) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn bench_single_indicators(c: &mut Criterion) {
    let bars = make_bars(2520); // ~10 years of daily bars
    let roster: Vec<(&str, Box<dyn Indicator>)> = vec![
        ("sma_20", Box::new(Sma::new(20))),
        ("ema_20", Box::new(Ema::new(20))),
        ("rsi_14", Box::new(Rsi::new(14))),
        ("stoch_14", Box::new(Stochastic::new(14))),
        ("mfi_14", Box::new(Mfi::new(14))),
        ("macd_12_26", Box::new(Macd::new(12, 26))),
        ("adx_14", Box::new(Adx::new(14))),
        ("bb_pctb_20", Box::new(Bollinger::percent_b(20, 2.0))),
    ];

    let mut group = c.benchmark_group("indicator_compute");
    for (name, indicator) in &roster {
        group.bench_with_input(BenchmarkId::from_parameter(name), indicator, |b, ind| {
            b.iter(|| black_box(ind.compute(&bars)));
        });
    }
    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let bars = make_bars(2520);
    let cache = IndicatorCache::new();
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Sma::new(5)),
        Box::new(Sma::new(20)),
        Box::new(Rsi::new(14)),
    ];
    cache.compute(&bars, &indicators).unwrap();

    c.bench_function("cache_hit", |b| {
        b.iter(|| black_box(cache.compute(&bars, &indicators).unwrap()));
    });
}

fn bench_full_evaluation(c: &mut Criterion) {
    let bars = make_bars(2520);
    let config = StrategyConfig::new("consensus");
    let strategy = create_strategy(&config).unwrap();
    let cache = IndicatorCache::new();
    let set = cache.compute(&bars, &strategy.indicators()).unwrap();
    let sim = TradeSimulator::new(SimConfig::default()).unwrap();

    c.bench_function("consensus_simulation_10y", |b| {
        b.iter(|| black_box(sim.run(&bars, strategy.as_ref(), &set).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_single_indicators,
    bench_cache_hit,
    bench_full_evaluation
);
criterion_main!(benches);
