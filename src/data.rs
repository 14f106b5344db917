//! Dataset loading and the fixed 80/20 training/validation split.

use crate::errors::{NeuroxError, NeuroxResult};
use std::path::Path;

/// A row-major dataset: each row holds `input_size + output_size`
/// doubles. Training and validation views are disjoint prefixes/suffixes
/// of the same row block.
pub struct Dataset {
    pub rows: Vec<Vec<f64>>,
    pub input_size: usize,
    pub output_size: usize,
}

impl Dataset {
    /// Loads a headerless CSV file where every row holds exactly
    /// `input_size + output_size` numeric fields. Fails if the file is
    /// empty or any row's field count disagrees with the first row's.
    pub fn load_csv<P: AsRef<Path>>(path: P, input_size: usize, output_size: usize) -> NeuroxResult<Self> {
        let width = input_size + output_size;
        let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() != width {
                return Err(NeuroxError::Dataset(format!(
                    "expected {width} fields per row, found {}",
                    record.len()
                )));
            }
            let mut row = Vec::with_capacity(width);
            for field in record.iter() {
                let value: f64 = field
                    .trim()
                    .parse()
                    .map_err(|_| NeuroxError::Dataset(format!("non-numeric field {field:?}")))?;
                row.push(value);
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(NeuroxError::Dataset("dataset file is empty".into()));
        }
        Ok(Self { rows, input_size, output_size })
    }

    /// Splits this dataset's rows into a training prefix holding
    /// `floor(n * ratio)` entries and a validation suffix holding the
    /// remainder, by whole-row copies.
    pub fn split(&self, ratio: f64) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let train_n = ((self.rows.len() as f64) * ratio).floor() as usize;
        let train = self.rows[..train_n].to_vec();
        let validation = self.rows[train_n..].to_vec();
        (train, validation)
    }
}

/// Splits a dataset row into its input and expected-output slices.
pub fn split_row(row: &[f64], input_size: usize) -> (&[f64], &[f64]) {
    row.split_at(input_size)
}
