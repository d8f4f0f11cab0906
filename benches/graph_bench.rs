//! Benchmarks for diagram construction.
//!
//! Tests:
//! - Grid layout over wide schemas
//! - Full graph build (classification, layout, edges)
//! - Selection updates on a loaded state
//! - DDL parsing of generated dumps

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schema_canvas::graph::{build_graph, compute_layout, to_json, to_mermaid};
use schema_canvas::schema::{Column, DatabaseSchema, Relation, RelationType, SchemaBuilder, Table};
use schema_canvas::state::DiagramState;
use std::hint::black_box;

/// Chain-shaped schema: every table references the previous one
fn generate_schema(tables: usize) -> DatabaseSchema {
    let tables_vec = (0..tables)
        .map(|t| {
            let mut columns = vec![
                Column::new("id", "int").primary_key(),
                Column::new("name", "varchar(255)"),
                Column::new("created_at", "timestamp").with_default("now()"),
            ];
            if t > 0 {
                columns.push(Column::new("parent_id", "int").foreign_key());
            }
            columns.extend((0..t % 8).map(|c| Column::new(format!("extra_{}", c), "text")));
            Table::new(format!("table_{}", t), columns)
        })
        .collect();

    let relations = (1..tables)
        .map(|t| {
            Relation::new(
                format!("table_{}", t),
                "parent_id",
                format!("table_{}", t - 1),
                "id",
                RelationType::ManyToOne,
            )
        })
        .collect();

    DatabaseSchema::new(tables_vec, relations)
}

fn generate_ddl(tables: usize) -> String {
    let mut sql = String::new();
    for t in 0..tables {
        sql.push_str(&format!(
            "CREATE TABLE `table_{}` (\n  `id` INT NOT NULL,\n  `name` VARCHAR(255) DEFAULT NULL,\n  `parent_id` INT,\n  PRIMARY KEY (`id`)",
            t
        ));
        if t > 0 {
            sql.push_str(&format!(
                ",\n  CONSTRAINT `fk_{}` FOREIGN KEY (`parent_id`) REFERENCES `table_{}` (`id`)",
                t,
                t - 1
            ));
        }
        sql.push_str("\n) ENGINE=InnoDB;\n\n");
    }
    sql
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for size in [10, 100, 1000] {
        let schema = generate_schema(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &schema, |b, schema| {
            b.iter(|| black_box(compute_layout(&schema.tables)))
        });
    }

    group.finish();
}

fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for size in [10, 100, 1000] {
        let schema = generate_schema(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &schema, |b, schema| {
            b.iter(|| black_box(build_graph(schema)))
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    let mut state = DiagramState::new();
    state.load_schema(generate_schema(500));

    group.bench_function("select_table_toggle", |b| {
        b.iter(|| {
            state.select_table("table_250");
            black_box(state.select_table("table_250").len())
        })
    });

    group.bench_function("select_column", |b| {
        b.iter(|| black_box(state.select_column("table_499", "parent_id").len()))
    });

    group.finish();
}

fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("formats");
    let graph = build_graph(&generate_schema(200));

    group.bench_function("json", |b| {
        b.iter(|| black_box(to_json(&graph, Some("bench"), None)))
    });
    group.bench_function("mermaid", |b| b.iter(|| black_box(to_mermaid(&graph))));

    group.finish();
}

fn bench_ddl_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("ddl_parse");

    for size in [10, 100] {
        let sql = generate_ddl(size);
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &sql, |b, sql| {
            b.iter(|| {
                let mut builder = SchemaBuilder::new();
                builder.parse_script(sql);
                black_box(builder.table_count())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_layout,
    bench_build_graph,
    bench_selection,
    bench_formats,
    bench_ddl_parse,
);

criterion_main!(benches);
