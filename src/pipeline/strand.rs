//! Strand classification and orientation normalization.

use std::collections::{HashMap, HashSet};

use crate::align::{Orientation, StrandHit};
use crate::io::SeqRecord;
use crate::util::dna;

/// Strand decision for one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
    /// No genome hit; the sequence is kept as it is.
    Unknown,
}

impl From<Orientation> for Strand {
    fn from(o: Orientation) -> Self {
        match o {
            Orientation::Plus => Strand::Plus,
            Orientation::Minus => Strand::Minus,
        }
    }
}

#[derive(Debug, Default)]
pub struct StrandCalls {
    calls: HashMap<String, Strand>,
}

impl StrandCalls {
    pub fn get(&self, id: &str) -> Strand {
        self.calls.get(id).copied().unwrap_or(Strand::Unknown)
    }
}

/// First hit of each identifier wins; hits are never re-sorted.
pub fn classify(records: &[SeqRecord], hits: &[StrandHit]) -> StrandCalls {
    let known: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let mut out = StrandCalls::default();
    for hit in hits {
        if !known.contains(hit.id.as_str()) {
            log::warn!("strand hit for unknown sequence '{}' ignored", hit.id);
            continue;
        }
        out.calls.entry(hit.id.clone()).or_insert_with(|| hit.orientation.into());
    }
    out
}

/// Reverse-complement the sequence and reverse (not complement) the quality.
pub fn reverse_complement(mut rec: SeqRecord) -> SeqRecord {
    rec.seq = dna::revcomp(&rec.seq);
    if let Some(q) = rec.qual.as_mut() {
        q.reverse();
    }
    rec
}

#[derive(Debug, Default)]
pub struct Oriented {
    pub records: Vec<SeqRecord>,
    pub reverse_complemented: Vec<String>,
    pub unresolved: Vec<String>,
}

pub fn orient(records: Vec<SeqRecord>, calls: &StrandCalls) -> Oriented {
    let mut out = Oriented { records: Vec::with_capacity(records.len()), ..Default::default() };
    for rec in records {
        let strand = calls.get(&rec.id);
        log::debug!("{}: strand {:?}", rec.id, strand);
        let rec = match strand {
            Strand::Plus => rec,
            Strand::Minus => {
                out.reverse_complemented.push(rec.id.clone());
                reverse_complement(rec)
            }
            Strand::Unknown => {
                out.unresolved.push(rec.id.clone());
                rec
            }
        };
        out.records.push(rec);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, orientation: Orientation) -> StrandHit {
        StrandHit { id: id.to_string(), orientation }
    }

    #[test]
    fn first_hit_wins_and_missing_is_unknown() {
        let recs = vec![SeqRecord::new("a", b"ACGT".to_vec()), SeqRecord::new("b", b"AAAA".to_vec())];
        let hits = vec![hit("a", Orientation::Minus), hit("a", Orientation::Plus)];
        let calls = classify(&recs, &hits);
        assert_eq!(calls.get("a"), Strand::Minus);
        assert_eq!(calls.get("b"), Strand::Unknown);
    }

    #[test]
    fn orphan_hits_are_skipped() {
        let recs = vec![SeqRecord::new("a", b"ACGT".to_vec())];
        let calls = classify(&recs, &[hit("ghost", Orientation::Minus), hit("a", Orientation::Minus)]);
        assert_eq!(calls.get("ghost"), Strand::Unknown);
        assert_eq!(calls.get("a"), Strand::Minus);
    }

    #[test]
    fn orient_counts_and_transforms() {
        let recs = vec![
            SeqRecord::with_qual("plus", b"AACG".to_vec(), b"ABCD".to_vec()),
            SeqRecord::with_qual("minus", b"AACG".to_vec(), b"ABCD".to_vec()),
            SeqRecord::with_qual("none", b"AACG".to_vec(), b"ABCD".to_vec()),
        ];
        let calls = classify(&recs, &[hit("plus", Orientation::Plus), hit("minus", Orientation::Minus)]);
        let out = orient(recs, &calls);

        assert_eq!(out.records.len(), 3);
        assert_eq!(out.records[0].seq, b"AACG");
        assert_eq!(out.records[1].seq, b"CGTT");
        assert_eq!(out.records[1].qual.as_deref(), Some(&b"DCBA"[..]));
        assert_eq!(out.records[2].seq, b"AACG");
        assert_eq!(out.reverse_complemented, vec!["minus".to_string()]);
        assert_eq!(out.unresolved, vec!["none".to_string()]);
    }

    #[test]
    fn scenario_minus_strand_read() {
        let rec = reverse_complement(SeqRecord::new("s", b"ACGTACGTTTGCA".to_vec()));
        assert_eq!(rec.seq, b"TGCAAACGTACGT");
    }
}
