//! CSV writers for the two output artifacts: per-epoch validation loss
//! and the final validation-set prediction scatter.

use crate::errors::NeuroxResult;
use std::path::Path;

/// Writes the loss log. The header reserves three columns
/// (`epoch,loss,accuracy`) but accuracy is never computed or emitted,
/// per the external interface's documented (and preserved) quirk; data
/// rows have only two fields.
pub struct LossWriter {
    writer: csv::Writer<std::fs::File>,
}

impl LossWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> NeuroxResult<Self> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).flexible(true).from_path(path)?;
        writer.write_record(["epoch", "loss", "accuracy"])?;
        Ok(Self { writer })
    }

    pub fn write_epoch(&mut self, epoch: usize, loss: f64) -> NeuroxResult<()> {
        self.writer.write_record([epoch.to_string(), loss.to_string()])?;
        tracing::info!(epoch, loss, "validation loss");
        Ok(())
    }

    pub fn flush(&mut self) -> NeuroxResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one row per validation entry:
/// `input_1..input_I,expected_1..expected_O,predicted_1..predicted_O`.
pub struct ScatterWriter {
    writer: csv::Writer<std::fs::File>,
}

impl ScatterWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> NeuroxResult<Self> {
        let writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        Ok(Self { writer })
    }

    pub fn write_row(&mut self, input: &[f64], expected: &[f64], predicted: &[f64]) -> NeuroxResult<()> {
        let fields: Vec<String> = input
            .iter()
            .chain(expected.iter())
            .chain(predicted.iter())
            .map(|v| v.to_string())
            .collect();
        self.writer.write_record(fields)?;
        Ok(())
    }

    pub fn flush(&mut self) -> NeuroxResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
