#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{TempDir, tempdir};

/// Scratch directory that removes its tables on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` under the workspace and returns the file path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(name)).expect("read output file")
    }

    pub fn exists(&self, name: &str) -> bool {
        self.temp_dir.path().join(name).exists()
    }

    /// Output prefix inside the workspace, as a string argument.
    pub fn prefix(&self, name: &str) -> String {
        self.temp_dir.path().join(name).to_string_lossy().into_owned()
    }
}

pub fn bin() -> Command {
    Command::cargo_bin("bacdive-enums").expect("binary exists")
}

/// Builds a tab-separated table from a header and rows of cells.
pub fn tsv(header: &[&str], rows: &[&[&str]]) -> String {
    let mut text = header.join("\t");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join("\t"));
        text.push('\n');
    }
    text
}

pub const MERGED_HEADER: &[&str] = &["path_count", "path", "distinct_value_count"];
pub const VALUES_HEADER: &[&str] = &["path", "value"];

/// A small strain dataset covering exclusions, sibling grouping and a duplicate enum.
pub fn strain_fixture(workspace: &TestWorkspace) -> (PathBuf, PathBuf) {
    let merged = workspace.write(
        "merged.tsv",
        &tsv(
            MERGED_HEADER,
            &[
                &["8", "[].Culture.temp", "5"],
                &["3", "[].Culture.medium", "2"],
                &["2", "[].Culture.link", "2"],
                &["10", "[].Morphology.cell.shape", "3"],
                &["5", "[].Morphology.cell.motility", "2"],
                &["5", "[].Morphology.cell.motility.[]", "2"],
                &["4", "[].Safety.flag", "2"],
                &["1", "[].Single", "1"],
            ],
        ),
    );
    let values = workspace.write(
        "values.tsv",
        &tsv(
            VALUES_HEADER,
            &[
                &["[].Culture.temp", "30"],
                &["[].Culture.temp", "37"],
                &["[].Culture.temp", "28"],
                &["[].Culture.medium", "yes"],
                &["[].Culture.medium", "no"],
                &["[].Culture.link", "http://a"],
                &["[].Culture.link", "http://b"],
                &["[].Morphology.cell.shape", "rod"],
                &["[].Morphology.cell.shape", "coccus"],
                &["[].Morphology.cell.shape", "spiral"],
                &["[].Morphology.cell.motility", "yes"],
                &["[].Morphology.cell.motility.[]", "no"],
                &["[].Safety.flag", "no"],
                &["[].Safety.flag", ""],
                &["[].Safety.flag", "yes"],
            ],
        ),
    );
    (merged, values)
}
