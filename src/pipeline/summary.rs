//! Cumulative rejection summary across the files of a batch.

use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const SUMMARY_FILE: &str = "rejected.count.tsv";
const HEADER: [&str; 3] = ["SAMPLE", "NUMBER_SEQUENCES_WO_GENE", "NUMBER_SEQUENCES_LESS_GENE"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "SAMPLE")]
    pub sample: String,
    #[serde(rename = "NUMBER_SEQUENCES_WO_GENE")]
    pub without_gene: usize,
    #[serde(rename = "NUMBER_SEQUENCES_LESS_GENE")]
    pub less_gene: usize,
}

/// Rows collected in processing order, written out once.
#[derive(Debug, Default)]
pub struct RunSummary {
    rows: Vec<SummaryRow>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: SummaryRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Append the rows to `path`. A new file gets the header first; an
    /// existing one only gets rows.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let exists = path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open summary '{}'", path.display()))?;
        let mut w = csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(file);
        if !exists {
            w.write_record(HEADER)?;
        }
        for row in &self.rows {
            w.serialize(row)?;
        }
        w.flush()?;
        Ok(())
    }
}

pub fn read_summary(path: &Path) -> Result<Vec<SummaryRow>> {
    let file = File::open(path).with_context(|| format!("cannot open summary '{}'", path.display()))?;
    let mut r = csv::ReaderBuilder::new().delimiter(b'\t').from_reader(file);
    let rows = r.deserialize().collect::<std::result::Result<Vec<SummaryRow>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sample: &str, without_gene: usize, less_gene: usize) -> SummaryRow {
        SummaryRow { sample: sample.to_string(), without_gene, less_gene }
    }

    #[test]
    fn header_is_written_once_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUMMARY_FILE);

        let mut first = RunSummary::new();
        first.push(row("s1", 2, 0));
        first.push(row("s2", 0, 1));
        first.write_to(&path).unwrap();

        let mut second = RunSummary::new();
        second.push(row("s3", 4, 5));
        second.write_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "SAMPLE\tNUMBER_SEQUENCES_WO_GENE\tNUMBER_SEQUENCES_LESS_GENE\ns1\t2\t0\ns2\t0\t1\ns3\t4\t5\n"
        );
        assert_eq!(read_summary(&path).unwrap(), vec![row("s1", 2, 0), row("s2", 0, 1), row("s3", 4, 5)]);
    }

    #[test]
    fn empty_batch_still_creates_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUMMARY_FILE);
        RunSummary::new().write_to(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "SAMPLE\tNUMBER_SEQUENCES_WO_GENE\tNUMBER_SEQUENCES_LESS_GENE\n"
        );
    }
}
