use std::io::Write;

use one_brc::planner::boundaries;
use one_brc::{
    aggregate_chunk, merge_maps, plan_chunks, render, AggregateMap, ChunkSummary, Config, Engine,
    Error, Executor, Record,
};
use tempfile::NamedTempFile;

fn write_input(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

fn run_file(contents: &[u8], config: Config) -> ChunkSummary {
    let file = write_input(contents);
    let engine = Engine::new(Config {
        input_path: file.path().to_path_buf(),
        ..config
    })
    .unwrap();
    engine.run().unwrap()
}

fn report_for(contents: &[u8], config: Config) -> String {
    render(&run_file(contents, config).aggregates)
}

fn assert_equivalent(a: &AggregateMap, b: &AggregateMap, context: &str) {
    assert_eq!(a.len(), b.len(), "{context}");
    for (key, x) in a.iter() {
        let y = b.get(key).unwrap_or_else(|| panic!("{context}: missing {key}"));
        assert_eq!(x.count, y.count, "{context}: {key}");
        assert_eq!(x.min, y.min, "{context}: {key}");
        assert_eq!(x.max, y.max, "{context}: {key}");
        assert!((x.mean() - y.mean()).abs() < 1e-9, "{context}: {key}");
    }
}

fn small_chunks(chunk_count: usize) -> Config {
    Config::default()
        .with_chunk_count(chunk_count)
        .with_min_chunk_bytes(1)
        .with_threads(4)
}

/// Deterministic pseudo-random measurements.
fn generate(lines: usize) -> Vec<u8> {
    const STATIONS: [&str; 8] = [
        "Abha", "Accra", "Bangkok", "Dakar", "Hamburg", "Reykjavík", "São Paulo", "Zürich",
    ];
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut out = Vec::with_capacity(lines * 16);
    for _ in 0..lines {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let station = STATIONS[(state % STATIONS.len() as u64) as usize];
        let tenths = (state >> 8) % 1999;
        let value = tenths as f64 / 10.0 - 99.9;
        writeln!(out, "{station};{value:.1}").unwrap();
    }
    out
}

#[test]
fn single_record() {
    assert_eq!(
        report_for(b"Tokyo;10.0\n", Config::default()),
        "{\nTokyo=10.0/10.0/10.0/1\n}"
    );
}

#[test]
fn malformed_line_is_skipped() {
    assert_eq!(
        report_for(b"Paris;15.5\nBADLINE\nParis;20.5\n", Config::default()),
        "{\nParis=15.5/18.0/20.5/2\n}"
    );
}

#[test]
fn keys_are_sorted() {
    let report = report_for(b"Zurich;1.0\nAmsterdam;2.0\n", Config::default());
    assert_eq!(report, "{\nAmsterdam=2.0/2.0/2.0/1\nZurich=1.0/1.0/1.0/1\n}");
}

#[test]
fn empty_key_is_aggregated() {
    let report = report_for(b";1.0\nOslo;2.0\n;3.0\n", Config::default());
    assert_eq!(report, "{\n=1.0/2.0/3.0/2\nOslo=2.0/2.0/2.0/1\n}");
}

#[test]
fn all_malformed_gives_empty_report() {
    let report = report_for(b"nope\nstill nope\nA;x\n\n", Config::default());
    assert_eq!(report, "{\n}");
}

#[test]
fn empty_file_gives_empty_report() {
    assert_eq!(report_for(b"", Config::default()), "{\n}");
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(Config::new(dir.path().join("missing.txt"))).unwrap();
    assert!(matches!(engine.run(), Err(Error::FileOpen { .. })));
}

#[test]
fn one_chunk_equals_three_merged_chunks() {
    let whole = aggregate_chunk(b"A;1.0\nA;2.0\nA;3.0\n").aggregates;
    let merged = merge_maps(
        [&b"A;1.0"[..], &b"A;2.0"[..], &b"A;3.0"[..]]
            .into_iter()
            .map(|span| aggregate_chunk(span).aggregates),
    );
    assert_eq!(render(&whole), "{\nA=1.0/2.0/3.0/3\n}");
    assert_eq!(render(&merged), render(&whole));
}

#[test]
fn chunked_records_match_whole_file_records() {
    let data = generate(2_000);
    let whole: Vec<Record<'_>> = data
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| one_brc::parse_record(line).unwrap())
        .collect();

    for n in [1, 2, 7, 64, 999, 5_000] {
        let chunks = plan_chunks(&data, n, 1);
        let offsets = boundaries(&chunks);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]), "chunk count {n}");
        assert_eq!(offsets.last(), Some(&data.len()));
        for &offset in &offsets[1..offsets.len() - 1] {
            assert_eq!(data[offset - 1], b'\n', "chunk count {n}, offset {offset}");
        }

        let rejoined: Vec<u8> = chunks.iter().flat_map(|c| data[c.clone()].to_vec()).collect();
        assert_eq!(rejoined, data);

        let from_chunks: Vec<Record<'_>> = chunks
            .iter()
            .flat_map(|c| data[c.clone()].split(|&b| b == b'\n'))
            .filter(|line| !line.is_empty())
            .map(|line| one_brc::parse_record(line).unwrap())
            .collect();
        assert_eq!(from_chunks, whole, "chunk count {n}");
    }
}

#[test]
fn report_does_not_depend_on_chunking_or_executor() {
    let data = generate(20_000);
    let expected = run_file(&data, small_chunks(1));
    assert_eq!(expected.stats.records, 20_000);
    for n in [3, 16, 257, 10_000] {
        for executor in [Executor::Rayon, Executor::Threads] {
            let got = run_file(&data, small_chunks(n).with_executor(executor));
            assert_equivalent(
                &got.aggregates,
                &expected.aggregates,
                &format!("{executor} with {n} chunks"),
            );
            assert_eq!(got.stats.records, expected.stats.records);
        }
    }
}

#[test]
fn formatting_is_idempotent() {
    let file = write_input(&generate(500));
    let engine = Engine::new(Config::new(file.path())).unwrap();
    let summary = engine.run().unwrap();
    let formatter = engine.formatter();
    assert_eq!(
        formatter.render(&summary.aggregates),
        formatter.render(&summary.aggregates)
    );
}

#[test]
fn stats_count_lines() {
    let summary = run_file(
        b"A;1.0\nbad\nB;2.0\n\nC;oops\nA;3.0",
        small_chunks(3).with_executor(Executor::Threads),
    );
    assert_eq!(summary.stats.records, 3);
    assert_eq!(summary.stats.skipped, 2);
    assert_eq!(summary.stats.lines(), 5);
    assert_eq!(summary.aggregates.get("A").unwrap().count, 2);
}
