//! FASTA / FASTQ reading and writing over one shared record type.

pub mod fasta;
pub mod fastq;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// One sequence record, in either of the two supported formats.
///
/// `qual` is `Some` exactly when the record came from (or is destined for)
/// FASTQ, and then has the same length as `seq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}

impl SeqRecord {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self { id: id.into(), desc: None, seq: seq.into(), qual: None }
    }

    pub fn with_qual(id: impl Into<String>, seq: impl Into<Vec<u8>>, qual: impl Into<Vec<u8>>) -> Self {
        Self { id: id.into(), desc: None, seq: seq.into(), qual: Some(qual.into()) }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SeqFormat {
    Fasta,
    Fastq,
}

impl SeqFormat {
    /// File extensions accepted for input discovery; the first one is used
    /// for outputs.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SeqFormat::Fasta => &["fasta", "fa", "fna", "fas"],
            SeqFormat::Fastq => &["fastq", "fq"],
        }
    }

    pub fn matches_path(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions().iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for SeqFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeqFormat::Fasta => f.write_str("fasta"),
            SeqFormat::Fastq => f.write_str("fastq"),
        }
    }
}

/// Read every record of a file into memory.
pub fn read_records(path: &Path, format: SeqFormat) -> Result<Vec<SeqRecord>> {
    let fh = File::open(path).with_context(|| format!("cannot open '{}'", path.display()))?;
    let buf = BufReader::new(fh);
    let mut out = Vec::new();
    match format {
        SeqFormat::Fasta => {
            let mut reader = fasta::FastaReader::new(buf);
            while let Some(rec) = reader.next_record()? {
                out.push(rec);
            }
        }
        SeqFormat::Fastq => {
            let mut reader = fastq::FastqReader::new(buf);
            while let Some(rec) = reader.next_record()? {
                out.push(rec);
            }
        }
    }
    Ok(out)
}

pub fn write_records<W: Write>(out: &mut W, format: SeqFormat, records: &[SeqRecord]) -> Result<()> {
    for rec in records {
        match format {
            SeqFormat::Fasta => fasta::write_record(out, rec)?,
            SeqFormat::Fastq => fastq::write_record(out, rec)?,
        }
    }
    Ok(())
}

pub fn write_records_to_path(path: &Path, format: SeqFormat, records: &[SeqRecord]) -> Result<()> {
    let fh = File::create(path).with_context(|| format!("cannot create '{}'", path.display()))?;
    let mut w = BufWriter::new(fh);
    write_records(&mut w, format, records)?;
    w.flush()?;
    Ok(())
}
