#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::fs;
use tempfile::TempDir;

/// A third-quarter call with a header, a handful of metrics and narrative
pub const ACME_Q3: &str = "\
Acme Industries Inc. (NYSE:ACME)
Q3 2024 Earnings Call
October 24, 2024

Operator: Good afternoon and welcome to the Acme third quarter call.

Jane Doe, CFO: Thank you. Revenue was $4.2 billion, up 8% year-over-year.
Adjusted EBITDA was $610 million compared to $540 million in the prior year.
Net loss of $35 million reflected a one-time impairment.
Adjusted net income was $120 million.
Free cash flow was $300 million and we ended the quarter with total liquidity of $1.1 billion.
Actual EPS of seventeen cents.
We are raising our full-year guidance as demand remains strong.
Looking ahead, we expect supply challenges to ease.
";

/// No header and no revenue; identity comes from the file name
pub const GLOBEX_NO_HEADER: &str = "\
Operator: Welcome everyone.
Net income of $200 million was in line with plan.
Demand for our services remained healthy year over year.
";

/// Isolated input directory, output path and config home
pub struct TestContext {
    pub temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input_dir = temp_dir.path().join("transcripts");
        let output_file = temp_dir.path().join("parsed").join("parsed_transcripts.json");

        fs::create_dir_all(&input_dir).expect("Failed to create input dir");
        fs::create_dir_all(temp_dir.path().join("config")).expect("Failed to create config dir");

        Self {
            temp_dir,
            input_dir,
            output_file,
        }
    }

    pub fn write_transcript(&self, name: &str, text: &str) -> PathBuf {
        let path = self.input_dir.join(name);
        fs::write(&path, text).expect("Failed to write transcript");
        path
    }

    pub fn config_home(&self) -> PathBuf {
        self.temp_dir.path().join("config")
    }

    /// Run the binary with the user config directory pointed at the temp dir
    pub fn run_cli(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_callsheet"))
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run callsheet")
    }

    pub fn read_output(&self) -> serde_json::Value {
        read_json(&self.output_file)
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).expect("Failed to read output");
    serde_json::from_str(&content).expect("Output is not valid JSON")
}
