//! Triplication: every sequence concatenated with itself three times, so a
//! gene crossing the circular origin appears whole in the middle copy.

use crate::io::SeqRecord;

/// Concatenate a record with itself three times, quality included.
pub fn triple_record(rec: &SeqRecord) -> SeqRecord {
    SeqRecord {
        id: rec.id.clone(),
        desc: rec.desc.clone(),
        seq: rec.seq.repeat(3),
        qual: rec.qual.as_ref().map(|q| q.repeat(3)),
    }
}

pub fn triple(records: &[SeqRecord]) -> Vec<SeqRecord> {
    records.iter().map(triple_record).collect()
}
