use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// CsvConnection owns the data directory and hands out per-subject
/// paths. The layout is one directory per subject:
///
/// ```text
/// <base>/subjects.csv
/// <base>/<subject_id>/metrics.csv
/// <base>/<subject_id>/expenses.csv
/// <base>/<subject_id>/income.csv
/// <base>/<subject_id>/savings.csv
/// <base>/<subject_id>/fitness_profile.json
/// <base>/<subject_id>/finance_profile.json
/// <base>/<subject_id>/insights.jsonl
/// <base>/<subject_id>/summaries/<kind>_<period>.json
/// ```
///
/// Metric, ledger and insight files are written by the logging
/// subsystem; the engine only reads them. The summaries directory is
/// the engine's own output.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a connection rooted at `base_directory`, creating the
    /// directory if it does not exist.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default location:
    /// `INSIGHT_ENGINE_DATA_DIR` if set, otherwise `~/.insight-engine`.
    pub fn new_default() -> Result<Self> {
        if let Ok(dir) = std::env::var("INSIGHT_ENGINE_DATA_DIR") {
            info!("Using data directory from INSIGHT_ENGINE_DATA_DIR: {}", dir);
            return Self::new(dir);
        }

        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let default_dir = PathBuf::from(home_dir).join(".insight-engine");
        info!("Using default data directory: {}", default_dir.display());
        Self::new(default_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding one subject's raw logs and profiles.
    pub fn subject_directory(&self, subject_id: &str) -> PathBuf {
        self.base_directory.join(subject_id)
    }

    pub fn subjects_file_path(&self) -> PathBuf {
        self.base_directory.join("subjects.csv")
    }

    pub fn metrics_file_path(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("metrics.csv")
    }

    pub fn expenses_file_path(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("expenses.csv")
    }

    pub fn income_file_path(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("income.csv")
    }

    pub fn savings_file_path(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("savings.csv")
    }

    pub fn fitness_profile_path(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("fitness_profile.json")
    }

    pub fn finance_profile_path(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("finance_profile.json")
    }

    pub fn insights_file_path(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("insights.jsonl")
    }

    /// Directory for the engine's summary output, created on demand.
    pub fn summaries_directory(&self, subject_id: &str) -> Result<PathBuf> {
        let dir = self.subject_directory(subject_id).join("summaries");
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}
