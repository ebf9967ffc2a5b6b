//! CI output sink
//!
//! GitHub Actions hands steps a file path via `GITHUB_ENV`; appending
//! `KEY=value` lines there exports them to subsequent steps. This is the
//! only place results are persisted.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Append-only view of the GITHUB_ENV file.
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, key: &str, value: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}={}", key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn append_creates_the_file_and_adds_one_line_per_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("github_env");

        let env_file = EnvFile::new(&path);
        env_file.append("NEXT_TAG", "1.2.0-rc.4").unwrap();
        env_file.append("BUILD_IMAGE", "false").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "NEXT_TAG=1.2.0-rc.4\nBUILD_IMAGE=false\n");
    }

    #[test]
    fn append_preserves_lines_written_by_earlier_steps() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("github_env");
        std::fs::write(&path, "OTHER_STEP=done\n").unwrap();

        EnvFile::new(&path).append("NEXT_TAG", "2.5.2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "OTHER_STEP=done\nNEXT_TAG=2.5.2\n");
    }
}
