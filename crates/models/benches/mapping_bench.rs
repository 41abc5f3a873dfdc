use criterion::{black_box, criterion_group, criterion_main, Criterion};

use models::catalog::ServicePagedRow;
use models::db::{MappingCache, ResultCursor, ResultSet, SqlValue};

fn services_cursor(rows: i64) -> ResultCursor {
    let mut set = ResultSet::new(["ServiceId", "ServiceName", "HourlyRateUSD", "Description", "CreatedAt", "UpdatedAt"]);
    for i in 0..rows {
        set = set.row([
            SqlValue::Int(i),
            SqlValue::Text(format!("Service {i}")),
            SqlValue::Text("85.50".into()),
            SqlValue::Null,
            SqlValue::Text("2024-01-01T08:00:00".into()),
            SqlValue::Null,
        ]);
    }
    ResultCursor::single(set)
}

fn bench_map_all(c: &mut Criterion) {
    let cache = MappingCache::new();
    let template = services_cursor(1_000);

    c.bench_function("map_all_1000_services_warm_cache", |b| {
        b.iter(|| {
            let mut cursor = template.clone();
            let rows: Vec<ServicePagedRow> = cache.map_all(&mut cursor).unwrap();
            black_box(rows)
        });
    });

    c.bench_function("map_all_1000_services_cold_cache", |b| {
        b.iter(|| {
            cache.clear();
            let mut cursor = template.clone();
            let rows: Vec<ServicePagedRow> = cache.map_all(&mut cursor).unwrap();
            black_box(rows)
        });
    });
}

criterion_group!(benches, bench_map_all);
criterion_main!(benches);
