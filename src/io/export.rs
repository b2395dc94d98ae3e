use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::AppError;
use crate::domain::{Operation, Units};

/// Supported export encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Journal snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub final_balance: Units,
    pub operations: Vec<Operation>,
}

/// Exporter for writing a session journal out of the process
pub struct Exporter<'a> {
    operations: &'a [Operation],
    balance: Units,
}

impl<'a> Exporter<'a> {
    pub fn new(operations: &'a [Operation], balance: Units) -> Self {
        Self {
            operations,
            balance,
        }
    }

    /// Export in the requested format. Returns the number of operations written.
    pub fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize, AppError> {
        match format {
            ExportFormat::Csv => self.export_csv(writer),
            ExportFormat::Json => self.export_json(writer),
        }
    }

    /// Export operations to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "sequence",
            "kind",
            "amount",
            "balance_after",
            "item",
            "image",
            "recorded_at",
        ])?;

        for op in self.operations {
            let (item, image) = op
                .item
                .as_ref()
                .map(|i| (i.name.as_str(), i.image.as_str()))
                .unwrap_or_default();

            csv_writer.write_record([
                op.id.to_string().as_str(),
                op.sequence.to_string().as_str(),
                op.kind.as_str(),
                op.amount.to_string().as_str(),
                op.balance_after.to_string().as_str(),
                item,
                image,
                op.recorded_at.to_rfc3339().as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.operations.len())
    }

    /// Export the whole journal as pretty-printed JSON
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<usize, AppError> {
        let snapshot = JournalSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            final_balance: self.balance,
            operations: self.operations.to_vec(),
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(self.operations.len())
    }
}
