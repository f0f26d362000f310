//! Record codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use safedb_bench::{encode_database, populated_database, random_record};
use safedb_codec::{FormatVersion, TlvReader, TlvWriter};
use safedb_core::codec;

const VERSIONS: [FormatVersion; 2] = [FormatVersion::V3, FormatVersion::V4];

/// Benchmark encoding a single record.
fn bench_encode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_record");

    for version in VERSIONS {
        for notes_len in [0usize, 256, 4096] {
            let record = random_record(notes_len);
            group.bench_with_input(
                BenchmarkId::new(version.to_string(), notes_len),
                &record,
                |b, record| {
                    b.iter(|| {
                        let mut writer = TlvWriter::new(Vec::with_capacity(notes_len + 256));
                        codec::write_record(black_box(record), &mut writer, version).unwrap();
                        black_box(writer.into_inner());
                    });
                },
            );
        }
    }
    group.finish();
}

/// Benchmark decoding a single record.
fn bench_decode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_record");

    for version in VERSIONS {
        for notes_len in [0usize, 256, 4096] {
            let mut writer = TlvWriter::new(Vec::new());
            codec::write_record(&random_record(notes_len), &mut writer, version).unwrap();
            let bytes = writer.into_inner();

            group.throughput(Throughput::Bytes(bytes.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(version.to_string(), notes_len),
                &bytes,
                |b, bytes| {
                    b.iter(|| {
                        let record = codec::read_record(TlvReader::new(black_box(bytes.as_slice())), version)
                            .unwrap();
                        black_box(record);
                    });
                },
            );
        }
    }
    group.finish();
}

/// Benchmark loading a whole file, including dependency linking.
fn bench_load_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_file");

    for version in VERSIONS {
        for count in [100usize, 1000] {
            let (db, _) = populated_database(count);
            let bytes = encode_database(&db, version);

            group.throughput(Throughput::Elements(count as u64));
            group.bench_with_input(
                BenchmarkId::new(version.to_string(), count),
                &bytes,
                |b, bytes| {
                    b.iter(|| {
                        let loaded = safedb_core::Database::read(
                            TlvReader::new(black_box(bytes.as_slice())),
                            version,
                            db.preferences().clone(),
                        )
                        .unwrap();
                        black_box(loaded);
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_encode_record, bench_decode_record, bench_load_file);
criterion_main!(benches);
