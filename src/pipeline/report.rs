//! Per-file counters and the human-readable processing log.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::summary::SummaryRow;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileCounters {
    pub records: usize,
    pub reverse_complemented: usize,
    pub unresolved: usize,
    pub rotated: usize,
    pub without_gene: usize,
    pub less_gene: usize,
}

/// Identifiers behind each counter, for the processing log.
#[derive(Debug, Default, Clone)]
pub struct ProcessingLog {
    pub reverse_complemented: Vec<String>,
    pub unresolved: Vec<String>,
    pub without_gene: Vec<String>,
    pub less_gene: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub sample: String,
    pub counters: FileCounters,
    pub log: ProcessingLog,
}

impl FileReport {
    pub fn summary_row(&self) -> SummaryRow {
        SummaryRow {
            sample: self.sample.clone(),
            without_gene: self.counters.without_gene,
            less_gene: self.counters.less_gene,
        }
    }
}

fn section<W: Write>(out: &mut W, title: &str, ids: &[String]) -> std::io::Result<()> {
    writeln!(out, "*---------- {} ({}) :", title, ids.len())?;
    for id in ids {
        writeln!(out, "{}", id)?;
    }
    writeln!(out)
}

impl ProcessingLog {
    pub fn write<W: Write>(&self, out: &mut W, sample: &str) -> std::io::Result<()> {
        writeln!(out, "# {} processed {}", sample, chrono::Local::now().to_rfc3339())?;
        section(out, "Sequences reverse complemented", &self.reverse_complemented)?;
        section(out, "Sequences where strand was not found", &self.unresolved)?;
        section(out, "Sequences where the gene for rotation was not found", &self.without_gene)?;
        section(out, "Sequences where the gene was only partially present", &self.less_gene)
    }

    pub fn write_to_path(&self, path: &Path, sample: &str) -> Result<()> {
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("cannot create log '{}'", path.display()))?;
        self.write(&mut f, sample)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lists_every_section_with_counts() {
        let log = ProcessingLog {
            reverse_complemented: vec!["r1".into(), "r2".into()],
            unresolved: vec![],
            without_gene: vec!["r3".into()],
            less_gene: vec![],
        };
        let mut out = Vec::new();
        log.write(&mut out, "sample").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# sample processed "));
        assert!(text.contains("*---------- Sequences reverse complemented (2) :\nr1\nr2\n"));
        assert!(text.contains("*---------- Sequences where strand was not found (0) :\n"));
        assert!(text.contains("*---------- Sequences where the gene for rotation was not found (1) :\nr3\n"));
    }
}
