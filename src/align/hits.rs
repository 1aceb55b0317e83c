use anyhow::Result;

use crate::error::ViroError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Plus,
    Minus,
}

impl Orientation {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "plus" | "+" => Some(Orientation::Plus),
            "minus" | "-" => Some(Orientation::Minus),
            _ => None,
        }
    }
}

/// A genome-stage hit: the read aligned on this strand of the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandHit {
    pub id: String,
    pub orientation: Orientation,
}

/// A gene-stage hit on a tripled read, 1-based inclusive query coordinates.
/// `end` is absent when the table only carried the start column. A start of
/// 0 marks a gene that would begin before the first base of the read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneHit {
    pub id: String,
    pub start: usize,
    pub end: Option<usize>,
}

impl GeneHit {
    pub fn new(id: impl Into<String>, start: usize, end: Option<usize>) -> Self {
        Self { id: id.into(), start, end }
    }
}

fn malformed(line: usize, msg: impl Into<String>) -> anyhow::Error {
    ViroError::MalformedTable { line, msg: msg.into() }.into()
}

fn rows<'a>(text: &'a str) -> impl Iterator<Item = (usize, Vec<&'a str>)> + 'a {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .map(|(i, l)| (i, l.split('\t').map(str::trim).collect()))
}

/// Parse a `qseqid sstrand` table.
pub fn parse_strand_table(text: &str) -> Result<Vec<StrandHit>> {
    let mut hits = Vec::new();
    for (line, cols) in rows(text) {
        if cols.len() < 2 {
            return Err(malformed(line, "expected 2 columns: qseqid sstrand"));
        }
        let orientation = Orientation::parse(cols[1])
            .ok_or_else(|| malformed(line, format!("unknown strand '{}'", cols[1])))?;
        hits.push(StrandHit { id: cols[0].to_string(), orientation });
    }
    Ok(hits)
}

/// Parse a `qseqid qstart [qend]` table.
pub fn parse_gene_table(text: &str) -> Result<Vec<GeneHit>> {
    let mut hits = Vec::new();
    for (line, cols) in rows(text) {
        if cols.len() < 2 {
            return Err(malformed(line, "expected at least 2 columns: qseqid qstart"));
        }
        let coord = |s: &str| -> Result<usize> {
            match s.parse::<usize>() {
                Ok(v) if v >= 1 => Ok(v),
                _ => Err(malformed(line, format!("invalid 1-based coordinate '{}'", s))),
            }
        };
        let start = coord(cols[1])?;
        let end = cols.get(2).map(|s| coord(*s)).transpose()?;
        hits.push(GeneHit { id: cols[0].to_string(), start, end });
    }
    Ok(hits)
}
