use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Reader;
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::domain::models::Expense;
use crate::storage::traits::LedgerStorage;

use super::connection::CsvConnection;

/// One dated amount, the shared row shape of `income.csv` and
/// `savings.csv`.
#[derive(Debug, Deserialize)]
struct AmountRow {
    date: NaiveDate,
    amount: f64,
}

/// CSV-backed reader for the money ledger: categorized expenses plus
/// flat income and savings-contribution rows. All three files are
/// owned by the logging subsystem; missing files read as empty.
#[derive(Clone)]
pub struct LedgerRepository {
    connection: Arc<CsvConnection>,
}

impl LedgerRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn read_amount_rows(&self, file_path: &Path) -> Result<Vec<AmountRow>> {
        if !file_path.exists() {
            debug!("No ledger file at {}, returning empty list", file_path.display());
            return Ok(Vec::new());
        }

        let file = File::open(file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for result in csv_reader.deserialize() {
            let row: AmountRow = result
                .with_context(|| format!("Malformed ledger row in {}", file_path.display()))?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn sum_amounts(&self, file_path: &Path, start: NaiveDate, end: NaiveDate) -> Result<f64> {
        Ok(self
            .read_amount_rows(file_path)?
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| r.amount)
            .sum())
    }
}

impl LedgerStorage for LedgerRepository {
    fn get_expenses(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let file_path = self.connection.expenses_file_path(subject_id);

        if !file_path.exists() {
            debug!("No expenses file for {}, returning empty list", subject_id);
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut expenses = Vec::new();
        for result in csv_reader.deserialize() {
            let expense: Expense = result
                .with_context(|| format!("Malformed expense row in {}", file_path.display()))?;
            if expense.date >= start && expense.date <= end {
                expenses.push(expense);
            }
        }
        expenses.sort_by_key(|e| e.date);
        Ok(expenses)
    }

    fn get_income_total(&self, subject_id: &str, start: NaiveDate, end: NaiveDate) -> Result<f64> {
        self.sum_amounts(&self.connection.income_file_path(subject_id), start, end)
    }

    fn get_savings_contributions(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<f64> {
        self.sum_amounts(&self.connection.savings_file_path(subject_id), start, end)
    }

    fn get_savings_total(&self, subject_id: &str, end: NaiveDate) -> Result<f64> {
        let earliest = NaiveDate::MIN;
        self.sum_amounts(&self.connection.savings_file_path(subject_id), earliest, end)
    }
}
