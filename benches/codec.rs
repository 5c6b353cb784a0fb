use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use imstof_store::codec;

/// A synthetic sparse spectrum resembling a real IMS-TOF scan: mostly
/// zero, with `non_zero_fraction` of `num_bins` bins carrying a positive
/// intensity.
fn synthetic_scan(num_bins: u32, non_zero_fraction: f64) -> Vec<(u32, i32)> {
    let stride = (1.0 / non_zero_fraction).round().max(1.0) as u32;
    (0..num_bins)
        .step_by(stride as usize)
        .enumerate()
        .map(|(i, bin)| (bin, 1 + (i as i32 * 37) % 5000))
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_sparse");
    for &num_bins in &[1_000u32, 50_000, 400_000] {
        let pairs = synthetic_scan(num_bins, 0.02);
        group.throughput(Throughput::Elements(pairs.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_bins), &pairs, |b, pairs| {
            b.iter(|| codec::encode_sparse(pairs, 0).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_blob");
    for &num_bins in &[1_000u32, 50_000, 400_000] {
        let pairs = synthetic_scan(num_bins, 0.02);
        let encoded = codec::encode_sparse(&pairs, 0).unwrap();
        group.throughput(Throughput::Bytes(encoded.blob.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_bins), &encoded.blob, |b, blob| {
            b.iter(|| codec::decode_blob(blob).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
