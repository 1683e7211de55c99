//! Join benchmarks.
//!
//! Measures left and full joins at different table sizes and fan-outs.

use bivdb_core::{full_join, left_join, row, Database, ScalarType, TableDef};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Build a database with `users` (n rows) and `posts` (n * fanout rows, half
/// of them matching a user).
fn fixture(n: i64, fanout: i64) -> Database {
    let mut db = Database::new("bench");
    {
        let mut users = db
            .create_table(
                TableDef::new("users", "id")
                    .column("id", ScalarType::Integer)
                    .column("name", ScalarType::Text),
            )
            .unwrap();
        for i in 0..n {
            users.insert(row![i, format!("user{}", i)]).unwrap();
        }
    }
    {
        let mut posts = db
            .create_table(
                TableDef::new("posts", "id")
                    .column("id", ScalarType::Integer)
                    .column("title", ScalarType::Text),
            )
            .unwrap();
        for i in 0..n * fanout {
            // Every other key misses the users table.
            let key = if i % 2 == 0 { i % n } else { n + i };
            posts.insert(row![key, format!("post{}", i)]).unwrap();
        }
    }
    db
}

fn bench_left_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join/left");

    for size in [10, 100, 1000] {
        let db = fixture(size, 2);
        group.bench_with_input(BenchmarkId::new("rows", size), &db, |b, db| {
            let users = db.table("users").unwrap();
            let posts = db.table("posts").unwrap();
            b.iter(|| {
                black_box(left_join(users, posts));
            });
        });
    }

    group.finish();
}

fn bench_full_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join/full");

    for size in [10, 100, 1000] {
        let db = fixture(size, 2);
        group.bench_with_input(BenchmarkId::new("rows", size), &db, |b, db| {
            let users = db.table("users").unwrap();
            let posts = db.table("posts").unwrap();
            b.iter(|| {
                black_box(full_join(users, posts));
            });
        });
    }

    group.finish();
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("join/fanout");

    for fanout in [1, 4, 16] {
        let db = fixture(100, fanout);
        group.bench_with_input(BenchmarkId::new("per_key", fanout), &db, |b, db| {
            let users = db.table("users").unwrap();
            let posts = db.table("posts").unwrap();
            b.iter(|| {
                black_box(left_join(users, posts));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_left_join, bench_full_join, bench_fanout);
criterion_main!(benches);
