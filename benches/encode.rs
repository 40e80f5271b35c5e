use criterion::{criterion_group, criterion_main, Criterion};
use scanner_bridge::image::encode_jpeg;

pub fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("jpeg");
    for dim in [
        (320, 240),
        (640, 480),
        (960, 540),
        (1280, 720),
        (1920, 1080),
        (3840, 2160),
    ]
    .iter()
    {
        let nv21 = vec![128u8; dim.0 as usize * dim.1 as usize * 3 / 2];
        group.bench_with_input(format!("{}x{}", dim.0, dim.1), &nv21, |b, nv21| {
            b.iter(|| encode_jpeg(nv21, dim.0, dim.1).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_encode);
criterion_main!(benches);
