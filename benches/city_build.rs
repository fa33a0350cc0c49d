use criterion::{black_box, criterion_group, criterion_main, Criterion};

use contrib_city::city::{ActivityGrid, CityModelBuilder};
use contrib_city::data::demo::demo_year;

fn bench_city_build(c: &mut Criterion) {
    let year = demo_year(42, 365);

    c.bench_function("fold_grid", |b| {
        b.iter(|| ActivityGrid::fold(black_box(&year)))
    });

    let grid = ActivityGrid::fold(&year);
    c.bench_function("build_model", |b| {
        let mut builder = CityModelBuilder::new();
        b.iter(|| builder.build(black_box(&grid)))
    });
}

criterion_group!(benches, bench_city_build);
criterion_main!(benches);
