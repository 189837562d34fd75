mod common;

use common::{MERGED_HEADER, TestWorkspace, VALUES_HEADER, bin, strain_fixture, tsv};
use predicates::str::contains;

fn run_discover(workspace: &TestWorkspace, prefix: &str) {
    let (merged, values) = strain_fixture(workspace);
    bin()
        .args([
            "discover",
            "--merged-file",
            merged.to_str().unwrap(),
            "--values-file",
            values.to_str().unwrap(),
            "--output-prefix",
            workspace.prefix(prefix).as_str(),
        ])
        .assert()
        .success();
}

#[test]
fn discover_writes_all_four_tables() {
    let workspace = TestWorkspace::new();
    run_discover(&workspace, "run");

    assert_eq!(
        workspace.read("run_enum_value_pairs.tsv"),
        tsv(
            &["enum", "value"],
            &[
                &["Enum_0001", "no"],
                &["Enum_0001", "yes"],
                &["Enum_0002", "coccus"],
                &["Enum_0002", "no"],
                &["Enum_0002", "rod"],
                &["Enum_0002", "spiral"],
                &["Enum_0002", "yes"],
            ],
        )
    );
    assert_eq!(
        workspace.read("run_path_to_enum.tsv"),
        tsv(
            &["path", "enum"],
            &[
                &["[].Culture.medium", "Enum_0001"],
                &["[].Morphology.cell.shape", "Enum_0002"],
                &["[].Morphology.cell.motility", "Enum_0002"],
                &["[].Safety.flag", "Enum_0001"],
            ],
        )
    );
    assert_eq!(
        workspace.read("run_decision_log.tsv"),
        tsv(
            &["path", "decision", "reason", "lineage"],
            &[
                &["[].Culture.temp", "exclude", "numeric-dominated", "[].Culture"],
                &["[].Culture.link", "exclude", "long-text-non-biological", "[].Culture"],
                &["[].Culture.medium", "include", "categorical", "[].Culture"],
                &["[].Morphology.cell.shape", "include", "categorical", "[].Morphology.cell"],
                &["[].Morphology.cell.motility", "include", "categorical", "[].Morphology.cell"],
                &["[].Safety.flag", "include", "categorical", "[].Safety"],
            ],
        )
    );
    assert_eq!(
        workspace.read("run_enum_merge_log.tsv"),
        tsv(&["old_enum", "new_enum"], &[&["Enum_0003", "Enum_0001"]])
    );
}

#[test]
fn discover_is_idempotent() {
    let workspace = TestWorkspace::new();
    run_discover(&workspace, "first");
    run_discover(&workspace, "second");
    for table in [
        "enum_value_pairs",
        "path_to_enum",
        "decision_log",
        "enum_merge_log",
    ] {
        assert_eq!(
            workspace.read(&format!("first_{table}.tsv")),
            workspace.read(&format!("second_{table}.tsv")),
            "{table} differs between runs"
        );
    }
}

#[test]
fn discover_creates_missing_output_directories() {
    let workspace = TestWorkspace::new();
    run_discover(&workspace, "nested/dir/run");
    assert!(workspace.exists("nested/dir/run_decision_log.tsv"));
}

#[test]
fn malformed_statistics_abort_without_output() {
    let workspace = TestWorkspace::new();
    let merged = workspace.write(
        "merged.tsv",
        &tsv(
            MERGED_HEADER,
            &[&["3", "a.kind", "2"], &["3", "a.other", "several"]],
        ),
    );
    let values = workspace.write("values.tsv", &tsv(VALUES_HEADER, &[&["a.kind", "x"]]));
    bin()
        .args([
            "discover",
            "--merged-file",
            merged.to_str().unwrap(),
            "--values-file",
            values.to_str().unwrap(),
            "--output-prefix",
            workspace.prefix("broken").as_str(),
        ])
        .assert()
        .failure()
        .stderr(contains("line 3"))
        .stderr(contains("distinct_value_count"))
        .stderr(contains("several"));
    assert!(!workspace.exists("broken_enum_value_pairs.tsv"));
    assert!(!workspace.exists("broken_decision_log.tsv"));
}

#[test]
fn missing_value_column_is_reported() {
    let workspace = TestWorkspace::new();
    let merged = workspace.write("merged.tsv", &tsv(MERGED_HEADER, &[&["3", "a.kind", "2"]]));
    let values = workspace.write("values.tsv", &tsv(&["path", "sample"], &[&["a.kind", "x"]]));
    bin()
        .args([
            "discover",
            "--merged-file",
            merged.to_str().unwrap(),
            "--values-file",
            values.to_str().unwrap(),
            "--output-prefix",
            workspace.prefix("broken").as_str(),
        ])
        .assert()
        .failure()
        .stderr(contains("missing required column 'value'"));
    assert!(!workspace.exists("broken_path_to_enum.tsv"));
}

#[test]
fn config_null_tokens_turn_samples_into_nulls() {
    let workspace = TestWorkspace::new();
    let merged = workspace.write(
        "merged.tsv",
        &tsv(MERGED_HEADER, &[&["3", "a.kind", "2"], &["3", "a.mode", "2"]]),
    );
    let values = workspace.write(
        "values.tsv",
        &tsv(
            VALUES_HEADER,
            &[
                &["a.kind", "NA"],
                &["a.kind", "n/a"],
                &["a.mode", "fast"],
                &["a.mode", "slow"],
            ],
        ),
    );
    let config = workspace.write("thresholds.yml", "null_tokens: [NA, n/a]\n");
    bin()
        .args([
            "discover",
            "--merged-file",
            merged.to_str().unwrap(),
            "--values-file",
            values.to_str().unwrap(),
            "--output-prefix",
            workspace.prefix("nulls").as_str(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success();

    let log = workspace.read("nulls_decision_log.tsv");
    assert!(log.contains("a.kind\texclude\tno-data\ta\n"));
    assert!(log.contains("a.mode\tinclude\tcategorical\ta\n"));
    assert_eq!(
        workspace.read("nulls_path_to_enum.tsv"),
        "path\tenum\na.mode\tEnum_0001\n"
    );
}

#[test]
fn invalid_config_is_rejected() {
    let workspace = TestWorkspace::new();
    let (merged, values) = strain_fixture(&workspace);
    let config = workspace.write("bad.yml", "min_enum_values: 20\nmax_enum_values: 5\n");
    bin()
        .args([
            "discover",
            "--merged-file",
            merged.to_str().unwrap(),
            "--values-file",
            values.to_str().unwrap(),
            "--output-prefix",
            workspace.prefix("bad").as_str(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("must not exceed max_enum_values"));
}
