use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use copy_bench::{
    Benchmark, Combination, Format, Options, Output, Report, Statistics, Strategy, TimeUnit,
    Mode, Verbose,
};

pub mod common;
use common::Workspace;

/// A writer whose contents stay readable after it is boxed.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("lock").clone()).expect("utf8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn verbose_into(format: Format) -> (Verbose, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let verbose = Verbose::new(Output::from_writer(buffer.clone()), format);
    (verbose, buffer)
}

#[test]
fn test_output_file() {
    let workspace = Workspace::with_bytes(b"");
    let path = workspace.path("report.txt");

    let mut output = Output::new(Some(path.as_path())).expect("create output");
    output.write_chunk("hello\n").expect("write");
    output.flush().expect("flush");
    drop(output);

    assert_eq!(fs::read_to_string(&path).expect("read"), "hello\n");
}

#[test]
fn test_output_file_in_missing_directory() {
    let workspace = Workspace::with_bytes(b"");
    let path = workspace.path("missing/report.txt");

    assert!(Output::new(Some(path.as_path())).is_err());
}

#[test]
fn test_write_report_appends_newline() {
    let buffer = SharedBuffer::default();
    let mut output = Output::from_writer(buffer.clone());

    output
        .write_report(&Report::default(), Format::Json)
        .expect("write report");

    assert_eq!(buffer.contents(), "[]\n");
}

#[test]
fn test_disabled_verbose_writes_nothing() {
    let workspace = Workspace::with_bytes(b"abc");
    let benchmark = Benchmark::setup(&workspace.source, &workspace.target).expect("setup");
    let mut verbose = Verbose::disabled();

    assert!(!verbose.is_enabled());
    verbose
        .write_config(&Options::default(), &benchmark)
        .expect("config");
    verbose.write_fork(1, 1).expect("fork");
}

#[test]
fn test_verbose_text_config() {
    let workspace = Workspace::with_bytes(b"abcdef");
    let benchmark = Benchmark::setup(&workspace.source, &workspace.target).expect("setup");
    let (mut verbose, buffer) = verbose_into(Format::Text);

    assert!(verbose.is_enabled());
    verbose
        .write_config(&Options::default(), &benchmark)
        .expect("config");

    let text = buffer.contents();
    assert!(text.contains(&format!("source {}\n", workspace.source.display())));
    assert!(text.contains("source-bytes 6\n"));
    assert!(text.contains("buffer-sizes 1024,4096,16384,65536\n"));
    assert!(text.contains("warmup 2 iterations, 5s each\n"));
    assert!(text.contains("measurement 5 iterations, 10s each\n"));
    assert!(text.contains("forks 1\n"));
    assert!(text.contains("threads 1\n"));
    assert!(text.contains("mode avgt\n"));
    assert!(text.contains("time-unit ms\n"));
    assert!(text.ends_with("\n\n"));
}

#[test]
fn test_verbose_json_config() {
    let workspace = Workspace::with_bytes(b"abcdef");
    let benchmark = Benchmark::setup(&workspace.source, &workspace.target).expect("setup");
    let (mut verbose, buffer) = verbose_into(Format::Json);

    verbose
        .write_config(&Options::default(), &benchmark)
        .expect("config");

    let contents = buffer.contents();
    let value: serde_json::Value =
        serde_json::from_str(contents.trim()).expect("parse verbose JSON");
    assert_eq!(value["sourceBytes"], 6);
    assert_eq!(value["forks"], 1);
    assert_eq!(value["timeUnit"], "ms");
}

#[test]
fn test_verbose_csv_config() {
    let workspace = Workspace::with_bytes(b"abcdef");
    let benchmark = Benchmark::setup(&workspace.source, &workspace.target).expect("setup");
    let (mut verbose, buffer) = verbose_into(Format::Csv);

    verbose
        .write_config(&Options::default(), &benchmark)
        .expect("config");

    let contents = buffer.contents();
    let mut lines = contents.lines();
    let header = lines.next().expect("header");
    assert!(header.starts_with("source,target,source-bytes,strategies"));
    assert!(lines.next().expect("values").contains(",6,"));
}

#[test]
fn test_verbose_progress_lines() {
    let (mut verbose, buffer) = verbose_into(Format::Text);
    let combination = Combination::new(Strategy::ChannelTransferTo, None);
    let stats = Statistics::from_samples(&[Duration::from_millis(3), Duration::from_millis(5)]);

    verbose.write_fork(2, 3).expect("fork");
    verbose.write_combination(&combination).expect("combination");
    verbose
        .write_iteration(
            "Iteration",
            1,
            &stats,
            Mode::AverageTime,
            TimeUnit::Milliseconds,
        )
        .expect("iteration");
    verbose
        .write_iteration(
            "Iteration",
            2,
            &Statistics::default(),
            Mode::AverageTime,
            TimeUnit::Milliseconds,
        )
        .expect("empty iteration");

    assert_eq!(
        buffer.contents(),
        "# Fork: 2 of 3\n# Benchmark: channel-transfer-to\nIteration   1: 4.000 ms/op (2 copies)\n"
    );
}
