//! UBKE Performance Benchmarks
//!
//! Offline enhancement per second of audio, the per-frame path alone,
//! and streaming at typical host block sizes.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rustfft::num_complex::Complex32;
use ubke_core::{BlockProcessor, FrameProcessor, NoisePowerTracker, UbkeConfig, UbkeEnhancer, UbkeStream};

const SAMPLE_RATE: f32 = 16000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

/// Tone plus a deterministic broadband component
fn generate_test_audio(samples: usize) -> Vec<f32> {
    (0..samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let tone = (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.1;
            let hiss = (((i * 7919) % 1000) as f32 / 1000.0 - 0.5) * 0.04;
            tone + hiss
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// OFFLINE BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════════

fn bench_offline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Offline");

    for seconds in [1usize, 5] {
        group.bench_with_input(
            BenchmarkId::new("enhance", format!("{}s", seconds)),
            &seconds,
            |b, &secs| {
                let input = generate_test_audio(secs * SAMPLE_RATE as usize);
                let enhancer = UbkeEnhancer::new(UbkeConfig::default()).unwrap();

                b.iter(|| black_box(enhancer.process(black_box(&input)).mean_alpha));
            },
        );
    }

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════════
// FRAME BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════════

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("Frame");

    for n_fft in [256usize, 512, 1024] {
        group.bench_with_input(BenchmarkId::new("process_frame", n_fft), &n_fft, |b, &n| {
            let config = UbkeConfig::default().with_stft(n, n, n / 2);
            let bins = config.audio.num_bins();
            let noise = NoisePowerTracker::new(vec![0.01; bins], 0.98);
            let mut processor = FrameProcessor::new(&config, noise);
            let spectrum: Vec<Complex32> = (0..bins)
                .map(|k| Complex32::from_polar(0.2 + (k % 13) as f32 * 0.05, k as f32 * 0.3))
                .collect();

            b.iter(|| {
                let mut frame = spectrum.clone();
                black_box(processor.process_frame(black_box(&mut frame)))
            });
        });
    }

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════════
// STREAMING BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════════

fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("Streaming");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("UbkeStream", block_size),
            &block_size,
            |b, &size| {
                let input = generate_test_audio(size);
                let mut output = vec![0.0f32; size];
                let mut stream = UbkeStream::new(UbkeConfig::default()).unwrap();

                b.iter(|| {
                    stream.process(black_box(&input), &mut output).unwrap();
                    black_box(output[size - 1])
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_offline, bench_frame, bench_streaming);
criterion_main!(benches);
