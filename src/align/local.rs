use anyhow::Result;
use rayon::prelude::*;

use super::chain::{build_chains, filter_chains};
use super::hits::{GeneHit, Orientation, StrandHit};
use super::seed::find_seeds;
use super::Aligner;
use crate::index::fm::FmIndex;
use crate::io::SeqRecord;
use crate::util::dna;

const OCC_BLOCK: usize = 32;
const MAX_CHAINS_PER_CONTIG: usize = 5;
const MAX_CHAIN_OVERLAP: f64 = 0.8;

#[derive(Clone, Copy, Debug)]
pub struct FmAlignOpt {
    pub min_seed_len: usize,
    pub max_gap: usize,
    pub min_chain_score: u32,
    pub max_occ: usize,
    pub threads: usize,
}

impl Default for FmAlignOpt {
    fn default() -> Self {
        Self { min_seed_len: 15, max_gap: 50, min_chain_score: 30, max_occ: 64, threads: 1 }
    }
}

/// In-process aligner: exact seeds from an FM index, chained collinearly.
pub struct FmAligner {
    genome: FmIndex,
    gene: FmIndex,
    opt: FmAlignOpt,
    pool: rayon::ThreadPool,
}

impl FmAligner {
    pub fn new(genome: &[SeqRecord], gene: &[SeqRecord], opt: FmAlignOpt) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(opt.threads.max(1)).build()?;
        log::debug!(
            "FM index: genome {} sequence(s), gene {} sequence(s)",
            genome.len(),
            gene.len()
        );
        Ok(Self {
            genome: FmIndex::from_records(genome, OCC_BLOCK),
            gene: FmIndex::from_records(gene, OCC_BLOCK),
            opt,
            pool,
        })
    }

    fn best_score(&self, fm: &FmIndex, seq: &[u8]) -> u32 {
        let seeds = find_seeds(fm, &dna::encode(seq), self.opt.min_seed_len, self.opt.max_occ);
        build_chains(&seeds, self.opt.max_gap, 1).first().map_or(0, |c| c.score)
    }

    fn strand_hits(&self, rec: &SeqRecord) -> Vec<StrandHit> {
        let plus = self.best_score(&self.genome, &rec.seq);
        let minus = self.best_score(&self.genome, &dna::revcomp(&rec.seq));
        let mut scored = vec![(plus, Orientation::Plus), (minus, Orientation::Minus)];
        // stable: plus stays first on a tie
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .filter(|&(score, _)| score >= self.opt.min_chain_score)
            .map(|(_, orientation)| StrandHit { id: rec.id.clone(), orientation })
            .collect()
    }

    fn gene_hits(&self, rec: &SeqRecord) -> Vec<GeneHit> {
        let seeds = find_seeds(&self.gene, &dna::encode(&rec.seq), self.opt.min_seed_len, self.opt.max_occ);
        let mut chains = build_chains(&seeds, self.opt.max_gap, MAX_CHAINS_PER_CONTIG);
        filter_chains(&mut chains, self.opt.min_chain_score, MAX_CHAIN_OVERLAP);
        // chain ends projected onto the gene ends
        chains
            .iter()
            .filter_map(|c| {
                let first = c.seeds.first()?;
                let last = c.seeds.last()?;
                let gene_len = self.gene.contigs[c.contig].len as usize;
                let start = (first.qb + 1).saturating_sub(first.rb as usize);
                let end = last.qe + (gene_len - last.re as usize);
                Some(GeneHit::new(rec.id.clone(), start, Some(end)))
            })
            .collect()
    }

    fn per_record<T, F>(&self, records: &[SeqRecord], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&SeqRecord) -> Vec<T> + Sync + Send,
    {
        let nested: Vec<Vec<T>> = self.pool.install(|| records.par_iter().map(f).collect());
        nested.into_iter().flatten().collect()
    }
}

impl Aligner for FmAligner {
    fn align_genome(&self, records: &[SeqRecord]) -> Result<Vec<StrandHit>> {
        Ok(self.per_record(records, |r| self.strand_hits(r)))
    }

    fn align_gene(&self, records: &[SeqRecord]) -> Result<Vec<GeneHit>> {
        Ok(self.per_record(records, |r| self.gene_hits(r)))
    }
}
