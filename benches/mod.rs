use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    mtd::bench_read_split,
    mtd::bench_write_raw_split,
    mtd::bench_write_emulated
);
criterion_main!(benches);
