//! Choosing one gene start per tripled sequence.

use std::collections::{HashMap, HashSet};

use crate::align::GeneHit;
use crate::io::SeqRecord;

/// Picks the hit that anchors the rotation of one sequence.
///
/// `hits` are the hits of a single identifier in input order and are never
/// empty; `copy_len` is the length of one copy of the tripled sequence.
pub trait StartPolicy: Send + Sync {
    fn choose<'a>(&self, hits: &[&'a GeneHit], copy_len: usize) -> Option<&'a GeneHit>;
}

/// First hit whose start lies in the middle copy, `L < start <= 2L`;
/// otherwise the first hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiddleThird;

impl StartPolicy for MiddleThird {
    fn choose<'a>(&self, hits: &[&'a GeneHit], copy_len: usize) -> Option<&'a GeneHit> {
        hits.iter()
            .find(|h| h.start > copy_len && h.start <= 2 * copy_len)
            .or_else(|| hits.first())
            .copied()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstHit;

impl StartPolicy for FirstHit {
    fn choose<'a>(&self, hits: &[&'a GeneHit], _copy_len: usize) -> Option<&'a GeneHit> {
        hits.first().copied()
    }
}

/// Second-smallest start, i.e. the occurrence following the first one in the
/// tripled sequence. A single hit is used as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondOccurrence;

impl StartPolicy for SecondOccurrence {
    fn choose<'a>(&self, hits: &[&'a GeneHit], _copy_len: usize) -> Option<&'a GeneHit> {
        let mut sorted = hits.to_vec();
        sorted.sort_by_key(|h| h.start);
        sorted.get(1).or_else(|| sorted.first()).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PolicyKind {
    #[default]
    MiddleThird,
    FirstHit,
    SecondOccurrence,
}

impl PolicyKind {
    pub fn policy(self) -> Box<dyn StartPolicy> {
        match self {
            PolicyKind::MiddleThird => Box::new(MiddleThird),
            PolicyKind::FirstHit => Box::new(FirstHit),
            PolicyKind::SecondOccurrence => Box::new(SecondOccurrence),
        }
    }
}

#[derive(Debug, Default)]
pub struct Placements {
    chosen: HashMap<String, GeneHit>,
}

impl Placements {
    pub fn get(&self, id: &str) -> Option<&GeneHit> {
        self.chosen.get(id)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

pub fn locate(tripled: &[SeqRecord], hits: &[GeneHit], policy: &dyn StartPolicy) -> Placements {
    let known: HashSet<&str> = tripled.iter().map(|r| r.id.as_str()).collect();
    let mut grouped: HashMap<&str, Vec<&GeneHit>> = HashMap::new();
    let mut out = Placements::default();
    for hit in hits {
        if known.contains(hit.id.as_str()) {
            grouped.entry(hit.id.as_str()).or_default().push(hit);
        } else {
            log::warn!("gene hit for unknown sequence '{}' ignored", hit.id);
        }
    }

    for rec in tripled {
        let Some(group) = grouped.get(rec.id.as_str()) else { continue };
        if let Some(hit) = policy.choose(group, rec.len() / 3) {
            log::debug!("{}: gene start {} ({} hit(s))", rec.id, hit.start, group.len());
            out.chosen.insert(rec.id.clone(), hit.clone());
        }
    }
    out
}
