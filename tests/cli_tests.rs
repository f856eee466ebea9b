use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::{self, contains};
use std::fs;
use std::time::Duration;

pub mod common;
use common::{Workspace, same_contents};

fn copy_bench() -> Command {
    Command::cargo_bin("copy-bench").unwrap()
}

/// A command that runs each combination once, with no warm-up.
fn quick(workspace: &Workspace) -> Command {
    let mut cmd = copy_bench();
    cmd.arg(&workspace.source)
        .arg(&workspace.target)
        .args(["--warmup-iterations", "0"])
        .args(["--measurement-iterations", "1"])
        .args(["--measurement-time", "0"]);
    cmd
}

#[test]
fn version() {
    let assert = copy_bench().arg("-V").assert();
    assert.success().stdout(str::starts_with("copy-bench "));
}

#[test]
fn help() {
    let assert = copy_bench().arg("-h").assert();
    assert.success().stdout(contains("\nUsage"));
}

#[test]
fn help_long_hides_fork_child() {
    let assert = copy_bench().arg("--help").assert();
    assert
        .success()
        .stdout(contains("--buffer-sizes").and(contains("--fork-child").not()));
}

#[test]
fn unknown_flag_is_usage_error() {
    let assert = copy_bench().arg("--nope").assert();
    assert.code(64).stderr(contains("--nope"));
}

#[test]
fn missing_source_is_no_input() {
    let workspace = Workspace::with_bytes(b"");
    let assert = copy_bench()
        .arg(workspace.path("missing.jpg"))
        .arg(&workspace.target)
        .assert();
    assert.code(66).stderr(contains("copy-bench:"));
}

#[test]
fn threads_other_than_one_is_config_error() {
    let workspace = Workspace::with_random(100);
    let assert = quick(&workspace).args(["--threads", "2", "--forks", "0"]).assert();
    assert.code(78).stderr(contains("threads"));
}

#[test]
fn zero_buffer_size_is_usage_error() {
    let workspace = Workspace::with_random(100);
    let assert = quick(&workspace).args(["--buffer-sizes", "1024,0"]).assert();
    assert.code(64);
}

#[test]
fn in_process_text_report() {
    let workspace = Workspace::with_random(10_000);
    let assert = quick(&workspace).args(["--forks", "0"]).assert();

    assert
        .success()
        .stdout(
            str::starts_with("Benchmark")
                .and(contains("channel-with-direct-buffer"))
                .and(contains("ms/op")),
        )
        .stderr("");
    assert!(same_contents(&workspace.source, &workspace.target));
}

#[test]
fn json_report_has_every_combination() {
    let workspace = Workspace::with_random(10_000);
    let output = quick(&workspace)
        .args(["--forks", "0", "--format", "json", "--time-unit", "us"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).expect("JSON rows");
    assert_eq!(rows.len(), 18);
    assert!(rows.iter().all(|row| row["count"] == 1));
    assert!(rows.iter().all(|row| row["unit"] == "us/op"));
}

#[test]
fn csv_report_for_selected_strategies() {
    let workspace = Workspace::with_random(10_000);
    let assert = quick(&workspace)
        .args(["--forks", "0", "-F", "csv"])
        .args(["--strategies", "streams,channel-transfer-to"])
        .args(["--buffer-sizes", "4096"])
        .assert();

    assert.success().stdout(
        str::starts_with("strategy,bufferSize,mode,count,score,stdDev,min,max,unit\n")
            .and(contains("streams,4096,average-time,1,"))
            .and(contains("channel-transfer-to,,average-time,1,")),
    );
}

#[test]
fn process_forks_merge_counts() {
    let workspace = Workspace::with_random(10_000);
    let output = quick(&workspace)
        .args(["--forks", "2", "--isolation", "process", "--format", "json"])
        .args(["--strategies", "buffered-streams", "--buffer-sizes", "1024"])
        .output()
        .expect("run");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).expect("JSON rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[0]["bufferSize"], 1024);
}

#[test]
fn in_process_forks_with_cooldown() {
    let workspace = Workspace::with_random(1_000);
    let output = quick(&workspace)
        .args(["--forks", "3", "--isolation", "in-process", "--cooldown", "0.01"])
        .args(["--strategies", "channel-transfer-from", "--format", "json"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).expect("JSON rows");
    assert_eq!(rows[0]["count"], 3);
    assert!(rows[0]["bufferSize"].is_null());
}

#[test]
fn throughput_mode() {
    let workspace = Workspace::with_random(1_000);
    let assert = quick(&workspace)
        .args(["--forks", "0", "--mode", "thrpt", "--strategies", "streams"])
        .args(["--buffer-sizes", "1024"])
        .assert();

    assert.success().stdout(contains("thrpt").and(contains("ops/ms")));
}

#[test]
fn single_shot_mode_ignores_iteration_time() {
    let workspace = Workspace::with_random(1_000);
    let assert = copy_bench()
        .arg(&workspace.source)
        .arg(&workspace.target)
        .args(["--mode", "ss", "--forks", "0", "--strategies", "channel-transfer-to"])
        .args(["--warmup-iterations", "1", "--measurement-iterations", "3"])
        .args(["-F", "json"])
        .assert();

    assert.success().stdout(contains("\"count\":3"));
}

#[test]
fn output_file() {
    let workspace = Workspace::with_random(1_000);
    let report = workspace.path("report.json");
    let assert = quick(&workspace)
        .args(["--forks", "0", "--format", "json", "--strategies", "channel-transfer-from"])
        .arg("--output")
        .arg(&report)
        .assert();

    assert.success().stdout("");
    let contents = fs::read_to_string(&report).expect("read report");
    assert!(contents.starts_with("[{\"strategy\":\"channel-transfer-from\""));
}

#[test]
fn verbose_logs_to_stderr() {
    let workspace = Workspace::with_random(1_000);
    let assert = quick(&workspace)
        .args(["--forks", "1", "--isolation", "in-process", "-v"])
        .args(["--strategies", "streams", "--buffer-sizes", "1024"])
        .assert();

    assert.success().stderr(
        contains("source-bytes 1000\n")
            .and(contains("strategies streams\n"))
            .and(contains("# Fork: 1 of 1\n"))
            .and(contains("# Benchmark: streams (buffer size 1024)\n"))
            .and(contains("Iteration   1: ")),
    );
}

#[test]
fn verbose_fork_child_logs_to_stderr() {
    let workspace = Workspace::with_random(1_000);
    let assert = quick(&workspace)
        .args(["--forks", "1", "--isolation", "process", "-v"])
        .args(["--strategies", "channel-transfer-to"])
        .assert();

    assert
        .success()
        .stderr(contains("# Fork: 1 of 1\n").and(contains("# Benchmark: channel-transfer-to\n")));
}

#[test]
fn create_source_writes_fixture() {
    let workspace = Workspace::with_bytes(b"");
    let source = workspace.path("testfiles/input-1000KB.jpg");
    let target = workspace.path("testfiles/output-1000KB.jpg");

    let assert = copy_bench()
        .arg(&source)
        .arg(&target)
        .args(["--create-source", "1024000", "--forks", "0"])
        .args(["--warmup-iterations", "0", "--measurement-iterations", "1"])
        .args(["--measurement-time", "0", "--strategies", "channel-transfer-from"])
        .assert();

    assert.success();
    assert_eq!(fs::metadata(&source).expect("source").len(), 1_024_000);
    assert!(same_contents(&source, &target));
}

#[test]
fn env_overrides_iterations() {
    let workspace = Workspace::with_random(1_000);
    let assert = copy_bench()
        .arg(&workspace.source)
        .arg(&workspace.target)
        .env("COPY_BENCH_FORKS", "0")
        .env("COPY_BENCH_WARMUP_ITERATIONS", "0")
        .env("COPY_BENCH_MEASUREMENT_ITERATIONS", "2")
        .env("COPY_BENCH_BUFFER_SIZES", "2048")
        .env("COPY_BENCH_TIME_UNIT", "ns")
        .args(["--mode", "ss", "--strategies", "streams", "-F", "csv"])
        .assert();

    assert
        .success()
        .stdout(contains("streams,2048,single-shot-time,2,").and(contains("ns/op")));
}

#[test]
fn flags_override_env() {
    let workspace = Workspace::with_random(1_000);
    let assert = copy_bench()
        .arg(&workspace.source)
        .arg(&workspace.target)
        .env("COPY_BENCH_MEASUREMENT_ITERATIONS", "4")
        .env("COPY_BENCH_TIME_UNIT", "ns")
        .args(["--mode", "ss", "--forks", "0", "--warmup-iterations", "0"])
        .args(["--measurement-iterations", "1", "--time-unit", "s"])
        .args(["--strategies", "channel-transfer-to", "-F", "csv"])
        .assert();

    assert
        .success()
        .stdout(contains("channel-transfer-to,,single-shot-time,1,").and(contains("s/op")));
}

#[test]
fn output_over_source_is_usage_error() {
    let workspace = Workspace::with_random(100);
    let assert = quick(&workspace)
        .arg("--output")
        .arg(&workspace.source)
        .assert();

    assert.code(64).stderr(contains("overwrite"));
    assert_eq!(fs::metadata(&workspace.source).expect("source").len(), 100);
}

#[test]
fn output_over_aliased_source_is_usage_error() {
    let workspace = Workspace::with_random(100);
    let alias = workspace.dir.path().join(".").join("input.bin");
    let assert = quick(&workspace).arg("--output").arg(&alias).assert();

    assert.code(64).stderr(contains("overwrite"));
    assert_eq!(fs::metadata(&workspace.source).expect("source").len(), 100);
}

#[test]
fn target_same_as_source_is_config_error() {
    let workspace = Workspace::with_random(100);
    let assert = copy_bench()
        .arg(&workspace.source)
        .arg(&workspace.source)
        .args(["--forks", "0"])
        .assert();

    assert.code(78).stderr(contains("source"));
    assert_eq!(fs::metadata(&workspace.source).expect("source").len(), 100);
}

#[test]
fn unwritable_output_fails_before_measuring() {
    let workspace = Workspace::with_random(100);
    let assert = copy_bench()
        .arg(&workspace.source)
        .arg(&workspace.target)
        .args(["--forks", "0", "--strategies", "streams", "--buffer-sizes", "1024"])
        .args(["--warmup-iterations", "0", "--measurement-iterations", "1"])
        .args(["--measurement-time", "60"])
        .arg("--output")
        .arg(workspace.path("missing/report.txt"))
        .timeout(Duration::from_secs(20))
        .assert();

    assert.code(66).stderr(contains("failed to create output file"));
}

/// procfs files report a length of zero but read back real bytes.
#[cfg(target_os = "linux")]
#[test]
fn byte_count_mismatch_exit_code_is_the_same_in_a_fork() {
    let workspace = Workspace::with_bytes(b"");

    for forks in [["--forks", "0"], ["--forks", "1"]] {
        let assert = copy_bench()
            .arg("/proc/version")
            .arg(&workspace.target)
            .args(forks)
            .args(["--isolation", "process", "--strategies", "streams"])
            .args(["--buffer-sizes", "1024", "--warmup-iterations", "0"])
            .args(["--measurement-iterations", "1", "--measurement-time", "0"])
            .assert();

        assert.code(65).stderr(contains("expected 0"));
    }
}

#[test]
fn broken_fork_spec_fails() {
    let assert = copy_bench().args(["--fork-child", "{not json"]).assert();
    assert.code(65);
}
