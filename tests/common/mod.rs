#![allow(dead_code)]

use std::path::Path;

use anyhow::{bail, Result};
use virotator::align::{Aligner, GeneHit, Orientation, StrandHit};
use virotator::io::SeqRecord;

/// Replays canned alignment tables, as if an external tool had produced them.
#[derive(Default)]
pub struct MockAligner {
    pub genome: Vec<StrandHit>,
    pub gene: Vec<GeneHit>,
    /// Any batch containing this identifier makes the aligner fail.
    pub fail_on: Option<String>,
}

impl MockAligner {
    pub fn strand(mut self, id: &str, orientation: Orientation) -> Self {
        self.genome.push(StrandHit { id: id.to_string(), orientation });
        self
    }

    pub fn gene(mut self, id: &str, start: usize, end: Option<usize>) -> Self {
        self.gene.push(GeneHit::new(id, start, end));
        self
    }

    fn check(&self, records: &[SeqRecord]) -> Result<()> {
        if let Some(bad) = &self.fail_on {
            if records.iter().any(|r| &r.id == bad) {
                bail!("alignment tool exited with status 2");
            }
        }
        Ok(())
    }
}

impl Aligner for MockAligner {
    fn align_genome(&self, records: &[SeqRecord]) -> Result<Vec<StrandHit>> {
        self.check(records)?;
        Ok(self.genome.clone())
    }

    fn align_gene(&self, records: &[SeqRecord]) -> Result<Vec<GeneHit>> {
        self.check(records)?;
        Ok(self.gene.clone())
    }
}

pub fn pseudo_random(len: usize, seed: u32) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut x = seed;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            bases[(x >> 16) as usize % 4]
        })
        .collect()
}

/// Circular rotation so that `genome[by]` becomes the first base.
pub fn rotated(genome: &[u8], by: usize) -> Vec<u8> {
    let mut out = genome[by..].to_vec();
    out.extend_from_slice(&genome[..by]);
    out
}

pub fn write_fasta(path: &Path, records: &[(&str, &[u8])]) {
    let mut text = String::new();
    for (id, seq) in records {
        text.push_str(&format!(">{}\n{}\n", id, String::from_utf8_lossy(seq)));
    }
    std::fs::write(path, text).expect("write fasta");
}
