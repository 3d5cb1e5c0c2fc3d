use anyhow::{Context, Result};
use csv::Reader;
use log::debug;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::domain::models::{FinanceProfile, FitnessProfile, Subject};
use crate::storage::traits::ProfileStorage;

use super::connection::CsvConnection;

/// Reader for the subject roster (`subjects.csv`) and the per-subject
/// profile JSON files. Profiles are optional: a subject with no
/// `fitness_profile.json` simply has no fitness agent.
#[derive(Clone)]
pub struct ProfileRepository {
    connection: Arc<CsvConnection>,
}

impl ProfileRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn read_json_if_present<T: serde::de::DeserializeOwned>(
        &self,
        file_path: &Path,
    ) -> Result<Option<T>> {
        if !file_path.exists() {
            debug!("No profile file at {}", file_path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed profile JSON in {}", file_path.display()))?;
        Ok(Some(value))
    }
}

impl ProfileStorage for ProfileRepository {
    fn list_subjects(&self) -> Result<Vec<Subject>> {
        let file_path = self.connection.subjects_file_path();

        if !file_path.exists() {
            debug!("No subjects file, returning empty roster");
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut subjects = Vec::new();
        for result in csv_reader.deserialize() {
            let subject: Subject = result
                .with_context(|| format!("Malformed subject row in {}", file_path.display()))?;
            subjects.push(subject);
        }
        // Stable ordering keeps tick logs and failure reports readable.
        subjects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(subjects)
    }

    fn get_fitness_profile(&self, subject_id: &str) -> Result<Option<FitnessProfile>> {
        self.read_json_if_present(&self.connection.fitness_profile_path(subject_id))
    }

    fn get_finance_profile(&self, subject_id: &str) -> Result<Option<FinanceProfile>> {
        self.read_json_if_present(&self.connection.finance_profile_path(subject_id))
    }
}
