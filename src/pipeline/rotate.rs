//! Rotation of tripled sequences onto the chosen gene start.

use anyhow::{bail, Result};

use super::locate::Placements;
use crate::align::GeneHit;
use crate::io::SeqRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Rotated so that 1-based position `start` of the tripled sequence is
    /// the new first base.
    Rotated { start: usize },
    RejectedNoGene,
    RejectedPartialGene,
}

/// Rotate one tripled record of per-copy length `tripled.len() / 3`.
///
/// The hit is rejected as partial when the window of one copy length
/// starting at it runs past the end of the tripled sequence, or when the
/// aligned gene extends over more than one copy length.
pub fn rotate_record(tripled: &SeqRecord, hit: Option<&GeneHit>) -> (RotationOutcome, Option<SeqRecord>) {
    let Some(hit) = hit else {
        return (RotationOutcome::RejectedNoGene, None);
    };
    let total = tripled.len();
    let copy_len = total / 3;
    let s = hit.start;

    let window_fits = s >= 1 && s - 1 + copy_len <= total;
    let gene_fits = hit.end.map_or(true, |end| end < s || end - s < copy_len);
    if !window_fits || !gene_fits {
        return (RotationOutcome::RejectedPartialGene, None);
    }

    let range = s - 1..s - 1 + copy_len;
    let rotated = SeqRecord {
        id: tripled.id.clone(),
        desc: tripled.desc.clone(),
        seq: tripled.seq[range.clone()].to_vec(),
        qual: tripled.qual.as_ref().map(|q| q[range].to_vec()),
    };
    (RotationOutcome::Rotated { start: s }, Some(rotated))
}

#[derive(Debug, Default)]
pub struct Rotation {
    pub records: Vec<SeqRecord>,
    pub outcomes: Vec<(String, RotationOutcome)>,
    pub without_gene: Vec<String>,
    pub less_gene: Vec<String>,
}

pub fn rotate(tripled: &[SeqRecord], placements: &Placements) -> Result<Rotation> {
    let mut out = Rotation::default();
    for rec in tripled {
        if rec.len() % 3 != 0 {
            bail!("sequence '{}' has length {}, which is not a tripled length", rec.id, rec.len());
        }
        let (outcome, rotated) = rotate_record(rec, placements.get(&rec.id));
        match outcome {
            RotationOutcome::Rotated { .. } => {}
            RotationOutcome::RejectedNoGene => out.without_gene.push(rec.id.clone()),
            RotationOutcome::RejectedPartialGene => out.less_gene.push(rec.id.clone()),
        }
        log::debug!("{}: {:?}", rec.id, outcome);
        out.outcomes.push((rec.id.clone(), outcome));
        out.records.extend(rotated);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::triple::triple_record;
    use proptest::prelude::*;

    fn tripled(seq: &[u8]) -> SeqRecord {
        triple_record(&SeqRecord::new("r", seq.to_vec()))
    }

    #[test]
    fn rotates_to_the_gene_start() {
        let t = tripled(b"TGCAAACGTACGT");
        let (outcome, rec) = rotate_record(&t, Some(&GeneHit::new("r", 14, None)));
        assert_eq!(outcome, RotationOutcome::Rotated { start: 14 });
        assert_eq!(rec.unwrap().seq, b"TGCAAACGTACGT");

        let (_, rec) = rotate_record(&t, Some(&GeneHit::new("r", 18, Some(22))));
        assert_eq!(rec.unwrap().seq, b"AACGTACGTTGCA");
    }

    #[test]
    fn quality_is_sliced_with_the_sequence() {
        let t = triple_record(&SeqRecord::with_qual("r", b"ACGT".to_vec(), b"ABCD".to_vec()));
        let (_, rec) = rotate_record(&t, Some(&GeneHit::new("r", 7, None)));
        let rec = rec.unwrap();
        assert_eq!(rec.seq, b"GTAC");
        assert_eq!(rec.qual.as_deref(), Some(&b"CDAB"[..]));
    }

    #[test]
    fn no_hit_is_rejected_for_missing_gene() {
        let (outcome, rec) = rotate_record(&tripled(b"ACGT"), None);
        assert_eq!(outcome, RotationOutcome::RejectedNoGene);
        assert!(rec.is_none());
    }

    #[test]
    fn window_past_the_end_is_a_partial_gene() {
        let t = tripled(b"ACGTACGTTTGCA");
        // last start that still fits is 2L + 1 = 27
        assert!(matches!(rotate_record(&t, Some(&GeneHit::new("r", 27, None))).0, RotationOutcome::Rotated { .. }));
        let (outcome, rec) = rotate_record(&t, Some(&GeneHit::new("r", 28, None)));
        assert_eq!(outcome, RotationOutcome::RejectedPartialGene);
        assert!(rec.is_none());
    }

    #[test]
    fn gene_longer_than_one_copy_is_a_partial_gene() {
        let t = tripled(b"ACGTACGTTTGCA");
        let (outcome, _) = rotate_record(&t, Some(&GeneHit::new("r", 14, Some(27))));
        assert_eq!(outcome, RotationOutcome::RejectedPartialGene);
        let (outcome, _) = rotate_record(&t, Some(&GeneHit::new("r", 14, Some(26))));
        assert_eq!(outcome, RotationOutcome::Rotated { start: 14 });
    }

    #[test]
    fn rotate_rejects_untripled_input() {
        let placements = Placements::default();
        assert!(rotate(&[SeqRecord::new("r", b"ACGTA".to_vec())], &placements).is_err());
    }

    proptest! {
        #[test]
        fn rotation_is_a_cyclic_permutation(
            seq in proptest::collection::vec(proptest::sample::select(b"ACGTN".to_vec()), 1..200),
            offset in 0usize..1000,
        ) {
            let l = seq.len();
            let start = l + 1 + offset % l;
            let t = tripled(&seq);
            let (outcome, rec) = rotate_record(&t, Some(&GeneHit::new("r", start, None)));
            prop_assert_eq!(outcome, RotationOutcome::Rotated { start });
            let rotated = rec.unwrap().seq;
            prop_assert_eq!(rotated.len(), l);

            let k = start - 1 - l;
            let mut expected = seq[k..].to_vec();
            expected.extend_from_slice(&seq[..k]);
            prop_assert_eq!(&rotated, &expected);

            let mut a = rotated.clone();
            let mut b = seq.clone();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }
    }
}
