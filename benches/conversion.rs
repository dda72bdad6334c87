use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use ulpcheck::{
    Bfloat, Half, PrecisionComparator, PrecisionRequirement, RoundingMode, Tfloat, UlpComparator,
};

fn inputs() -> Vec<f32> {
    (0..4096).map(|i| (i as f32 - 2048.0) * 0.37).collect()
}

fn bench_narrowing(c: &mut Criterion) {
    let values = inputs();

    c.bench_function("half_from_f32_4k", |b| {
        b.iter(|| {
            for &v in black_box(&values) {
                black_box(Half::from_f32(v));
            }
        })
    });

    c.bench_function("half_from_f32_stochastic_4k", |b| {
        b.iter(|| {
            for (i, &v) in black_box(&values).iter().enumerate() {
                black_box(Half::from_f32_stochastic(v, f32::from_bits(i as u32 & 0x1fff)));
            }
        })
    });

    c.bench_function("bfloat_from_f32_upward_4k", |b| {
        b.iter(|| {
            for &v in black_box(&values) {
                black_box(Bfloat::from_f32_with_rounding(v, RoundingMode::Upward));
            }
        })
    });

    c.bench_function("tfloat_round_trip_4k", |b| {
        b.iter(|| {
            for &v in black_box(&values) {
                black_box(Tfloat::from_f32(v).to_f32());
            }
        })
    });
}

fn bench_comparators(c: &mut Criterion) {
    let references: Vec<[Half; 4]> = inputs()
        .chunks_exact(4)
        .map(|chunk| [
            Half::from_f32(chunk[0]),
            Half::from_f32(chunk[1]),
            Half::from_f32(chunk[2]),
            Half::from_f32(chunk[3]),
        ])
        .collect();
    let candidates = references.clone();

    c.bench_function("ulp_comparator_1k_vec4", |b| {
        let cmp = UlpComparator::uniform(candidates.clone(), references.clone(), Half::from_f32(1.0));
        b.iter(|| black_box(cmp.matches(black_box(&candidates))))
    });

    c.bench_function("precision_comparator_vec4", |b| {
        let cmp = PrecisionComparator::new(
            references[7],
            references[7],
            PrecisionRequirement::ulp_value(Half::from_f32(2.0)),
        );
        b.iter(|| black_box(cmp.matches(black_box(&candidates[7]))))
    });
}

criterion_group!(benches, bench_narrowing, bench_comparators);
criterion_main!(benches);
