use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cv_disparity_tuner::prelude::*;
use image::{GrayImage, Luma};

fn texture(width: u32, height: u32, shift: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let x = x + shift;
        let h = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503))
            .wrapping_mul(2_246_822_519);
        Luma([(h >> 24) as u8])
    })
}

fn block_match_bench(c: &mut Criterion) {

    // Build pair
    let pair = StereoPair::new(texture(320, 240, 0), texture(320, 240, 8)).unwrap();

    // Build disparity alg with the tuner defaults
    let mut disp = BlockMatcher::new();
    let params = MatchParams {
        num_disparities: 64,
        block_size: 15
    };

    // Benchmark compute function
    c.bench_function("block_match 320x240", |b| b.iter(|| disp.compute(black_box(&pair), &params)));
}

criterion_group!(benches, block_match_bench);
criterion_main!(benches);
