//! Shared fixtures for the storage tests: a temp data directory plus
//! writers that lay files down exactly the way the logging subsystem
//! does.

use anyhow::Result;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use super::connection::CsvConnection;

pub struct TestEnvironment {
    connection: Arc<CsvConnection>,
    // Held so the directory outlives the test.
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = Arc::new(CsvConnection::new(temp_dir.path())?);
        Ok(Self {
            connection,
            _temp_dir: temp_dir,
        })
    }

    pub fn connection(&self) -> Arc<CsvConnection> {
        Arc::clone(&self.connection)
    }

    fn ensure_subject_dir(&self, subject_id: &str) -> Result<std::path::PathBuf> {
        let dir = self.connection.subject_directory(subject_id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Write a metrics.csv with the full header; each tuple is
    /// (date, calories, water_ml, workout_count, workout_mins), the
    /// remaining columns zeroed.
    pub fn write_metrics(
        &self,
        subject_id: &str,
        rows: &[(&str, f64, f64, u32, u32)],
    ) -> Result<()> {
        let dir = self.ensure_subject_dir(subject_id)?;
        let mut contents = String::from(
            "subject_id,date,total_calories,total_protein_g,total_carbs_g,total_fat_g,\
             meal_count,total_water_ml,workout_count,workout_mins,total_spent,total_income,\
             expense_count\n",
        );
        for (date, calories, water, workout_count, workout_mins) in rows {
            contents.push_str(&format!(
                "{},{},{},0,0,0,1,{},{},{},0,0,0\n",
                subject_id, date, calories, water, workout_count, workout_mins
            ));
        }
        fs::write(dir.join("metrics.csv"), contents)?;
        Ok(())
    }

    pub fn write_expenses(&self, subject_id: &str, rows: &[(&str, f64, &str)]) -> Result<()> {
        let dir = self.ensure_subject_dir(subject_id)?;
        let mut contents = String::from("date,amount,category\n");
        for (date, amount, category) in rows {
            contents.push_str(&format!("{},{},{}\n", date, amount, category));
        }
        fs::write(dir.join("expenses.csv"), contents)?;
        Ok(())
    }

    /// Write a dated-amount file (income.csv or savings.csv).
    pub fn write_amounts(
        &self,
        subject_id: &str,
        file_name: &str,
        rows: &[(&str, f64)],
    ) -> Result<()> {
        let dir = self.ensure_subject_dir(subject_id)?;
        let mut contents = String::from("date,amount\n");
        for (date, amount) in rows {
            contents.push_str(&format!("{},{}\n", date, amount));
        }
        fs::write(dir.join(file_name), contents)?;
        Ok(())
    }

    pub fn write_subjects(&self, rows: &[(&str, &str)]) -> Result<()> {
        let mut contents = String::from("id,display_name\n");
        for (id, display_name) in rows {
            contents.push_str(&format!("{},{}\n", id, display_name));
        }
        fs::write(self.connection.subjects_file_path(), contents)?;
        Ok(())
    }

    pub fn write_fitness_profile(
        &self,
        subject_id: &str,
        daily_calorie_target: f64,
        daily_water_target_ml: f64,
        timezone: &str,
    ) -> Result<()> {
        let dir = self.ensure_subject_dir(subject_id)?;
        let profile = serde_json::json!({
            "subject_id": subject_id,
            "daily_calorie_target": daily_calorie_target,
            "daily_water_target_ml": daily_water_target_ml,
            "timezone": timezone,
            "push_tokens": [format!("token-{}", subject_id)],
        });
        fs::write(
            dir.join("fitness_profile.json"),
            serde_json::to_string_pretty(&profile)?,
        )?;
        Ok(())
    }

    pub fn write_finance_profile(
        &self,
        subject_id: &str,
        monthly_income: f64,
        savings_goal_target: Option<f64>,
    ) -> Result<()> {
        let dir = self.ensure_subject_dir(subject_id)?;
        let profile = serde_json::json!({
            "subject_id": subject_id,
            "monthly_income": monthly_income,
            "savings_goal_target": savings_goal_target,
        });
        fs::write(
            dir.join("finance_profile.json"),
            serde_json::to_string_pretty(&profile)?,
        )?;
        Ok(())
    }

    /// Write arbitrary contents into a subject's directory, for
    /// malformed-input tests.
    pub fn write_raw_subject_file(
        &self,
        subject_id: &str,
        file_name: &str,
        contents: &str,
    ) -> Result<()> {
        let dir = self.ensure_subject_dir(subject_id)?;
        fs::write(dir.join(file_name), contents)?;
        Ok(())
    }
}
