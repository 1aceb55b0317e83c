use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use super::hits::{parse_gene_table, parse_strand_table, GeneHit, StrandHit};
use super::Aligner;
use crate::error::ViroError;
use crate::io::{fasta, SeqRecord};

const GENOME_OUTFMT: &str = "6 qseqid sstrand";
const GENE_OUTFMT: &str = "6 qseqid qstart qend";

#[derive(Clone, Debug)]
pub struct BlastnOpt {
    /// Path or name of the `blastn` executable.
    pub executable: String,
}

impl Default for BlastnOpt {
    fn default() -> Self {
        Self { executable: "blastn".to_string() }
    }
}

/// Runs NCBI `blastn` against the reference files with `-subject`, so no
/// database has to be built. Queries go through a temporary FASTA file that
/// is removed when the call returns, whichever way it returns.
pub struct BlastnAligner {
    genome: PathBuf,
    gene: PathBuf,
    opt: BlastnOpt,
}

impl BlastnAligner {
    pub fn new(genome: impl Into<PathBuf>, gene: impl Into<PathBuf>, opt: BlastnOpt) -> Self {
        Self { genome: genome.into(), gene: gene.into(), opt }
    }

    fn args(query: &Path, subject: &Path, extra: &[&str], outfmt: &str) -> Vec<String> {
        let mut args = vec![
            "-query".to_string(),
            query.display().to_string(),
            "-subject".to_string(),
            subject.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        args.push("-outfmt".to_string());
        args.push(outfmt.to_string());
        args
    }

    fn run(&self, records: &[SeqRecord], subject: &Path, extra: &[&str], outfmt: &str) -> Result<String> {
        let mut query = tempfile::Builder::new()
            .prefix("virotator-query-")
            .suffix(".fasta")
            .tempfile()
            .context("cannot create temporary blastn query file")?;
        for rec in records {
            fasta::write_record(&mut query, rec)?;
        }
        query.flush().context("cannot write temporary blastn query file")?;

        let args = Self::args(query.path(), subject, extra, outfmt);
        log::debug!("running {} {}", self.opt.executable, args.join(" "));
        let output = Command::new(&self.opt.executable).args(&args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::Error::from(ViroError::ToolNotFound { tool: self.opt.executable.clone() })
            } else {
                anyhow::Error::from(e).context(format!("cannot run '{}'", self.opt.executable))
            }
        })?;

        if !output.status.success() {
            return Err(ViroError::ToolFailed {
                tool: self.opt.executable.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Aligner for BlastnAligner {
    fn align_genome(&self, records: &[SeqRecord]) -> Result<Vec<StrandHit>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let table = self.run(records, &self.genome, &[], GENOME_OUTFMT)?;
        parse_strand_table(&table)
    }

    fn align_gene(&self, records: &[SeqRecord]) -> Result<Vec<GeneHit>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let table = self.run(records, &self.gene, &["-strand", "plus"], GENE_OUTFMT)?;
        parse_gene_table(&table)
    }
}
