//! Benchmarks for the core field operations, mirroring the shape of the
//! reference crate's per-curve field benchmarks.

use bandersnatch_field::field::FieldElement;
use bandersnatch_field::serialize::{self, ByteOrder};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand_core::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_field(c: &mut Criterion) {
    let mut rng = XorShiftRng::from_seed([42u8; 16]);
    let a = FieldElement::random_unsafe(&mut rng);
    let b = FieldElement::random_unsafe(&mut rng);
    let exponent = FieldElement::random_unsafe(&mut rng).to_u256();

    c.bench_function("field_mul", |bencher| {
        bencher.iter(|| black_box(a).mul(&black_box(b)));
    });

    c.bench_function("field_square", |bencher| {
        bencher.iter(|| black_box(a).square());
    });

    c.bench_function("field_add", |bencher| {
        bencher.iter(|| black_box(a).add(&black_box(b)));
    });

    c.bench_function("field_invert", |bencher| {
        bencher.iter(|| black_box(a).invert());
    });

    c.bench_function("field_pow", |bencher| {
        bencher.iter(|| black_box(a).pow(&black_box(exponent)));
    });

    c.bench_function("field_sqrt", |bencher| {
        let square = a.square();
        bencher.iter(|| black_box(square).sqrt());
    });

    c.bench_function("field_serialize", |bencher| {
        bencher.iter(|| serialize::serialize_field(&black_box(a), ByteOrder::LittleEndian));
    });

    let bytes = serialize::serialize_field(&a, ByteOrder::LittleEndian);
    c.bench_function("field_deserialize", |bencher| {
        bencher.iter(|| serialize::deserialize_field(&black_box(bytes), ByteOrder::LittleEndian));
    });
}

criterion_group!(benches, bench_field);
criterion_main!(benches);
