//! Reference dataset lookup: `<root>/<dataset>/` holds exactly one
//! `*genome.<fasta ext>` and one `*gene.<fasta ext>` file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::{RefKind, ViroError};
use crate::io::{read_records, SeqFormat, SeqRecord};

#[derive(Debug, Clone)]
pub struct ReferenceSet {
    pub dir: PathBuf,
    pub genome_path: PathBuf,
    pub gene_path: PathBuf,
    pub genome: Vec<SeqRecord>,
    pub gene: Vec<SeqRecord>,
}

impl ReferenceSet {
    pub fn discover(root: &Path, dataset: &str) -> Result<Self> {
        let dir = root.join(dataset);
        if !dir.is_dir() {
            return Err(ViroError::UnknownDataset { path: dir }.into());
        }
        let genome_path = find_one(&dir, RefKind::Genome)?;
        let gene_path = find_one(&dir, RefKind::Gene)?;
        let genome = load(&genome_path)?;
        let gene = load(&gene_path)?;
        log::info!(
            "reference '{}': genome {}, gene {}",
            dataset,
            genome_path.display(),
            gene_path.display()
        );
        Ok(Self { dir, genome_path, gene_path, genome, gene })
    }
}

fn load(path: &Path) -> Result<Vec<SeqRecord>> {
    let records = read_records(path, SeqFormat::Fasta)
        .with_context(|| format!("cannot read reference '{}'", path.display()))?;
    if records.iter().all(SeqRecord::is_empty) {
        return Err(ViroError::EmptyReference { path: path.to_path_buf() }.into());
    }
    Ok(records)
}

/// `genome` and `gene` never collide: a stem ending in "genome" does not end in "gene".
fn find_one(dir: &Path, kind: RefKind) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("cannot list '{}'", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() || !SeqFormat::Fasta.matches_path(&path) {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        if stem.to_ascii_lowercase().ends_with(kind.suffix()) {
            candidates.push(path);
        }
    }
    candidates.sort();
    match candidates.len() {
        0 => Err(ViroError::MissingReference { kind, dir: dir.to_path_buf() }.into()),
        1 => Ok(candidates.remove(0)),
        _ => Err(ViroError::AmbiguousReference { kind, dir: dir.to_path_buf(), candidates }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dataset(files: &[(&str, &str)]) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("hbv");
        fs::create_dir(&dir).unwrap();
        for (name, body) in files {
            fs::write(dir.join(name), body).unwrap();
        }
        root
    }

    #[test]
    fn finds_genome_and_gene() {
        let root = dataset(&[("hbv_genome.fasta", ">g\nACGT\n"), ("hbv_gene.fa", ">p\nCG\n"), ("notes.txt", "x")]);
        let refs = ReferenceSet::discover(root.path(), "hbv").unwrap();
        assert!(refs.genome_path.ends_with("hbv_genome.fasta"));
        assert!(refs.gene_path.ends_with("hbv_gene.fa"));
        assert_eq!(refs.genome[0].seq, b"ACGT");
        assert_eq!(refs.gene[0].id, "p");
    }

    #[test]
    fn missing_gene_is_a_typed_error() {
        let root = dataset(&[("hbv_genome.fasta", ">g\nACGT\n")]);
        let err = ReferenceSet::discover(root.path(), "hbv").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ViroError>(),
            Some(ViroError::MissingReference { kind: RefKind::Gene, .. })
        ));
    }

    #[test]
    fn two_genomes_are_ambiguous() {
        let root = dataset(&[
            ("a_genome.fasta", ">g\nACGT\n"),
            ("b_genome.fasta", ">g\nACGT\n"),
            ("x_gene.fasta", ">p\nCG\n"),
        ]);
        let err = ReferenceSet::discover(root.path(), "hbv").unwrap_err();
        match err.downcast_ref::<ViroError>() {
            Some(ViroError::AmbiguousReference { kind, candidates, .. }) => {
                assert_eq!(*kind, RefKind::Genome);
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn unknown_dataset() {
        let root = tempfile::tempdir().unwrap();
        let err = ReferenceSet::discover(root.path(), "nope").unwrap_err();
        assert!(matches!(err.downcast_ref::<ViroError>(), Some(ViroError::UnknownDataset { .. })));
    }

    #[test]
    fn empty_reference_file() {
        let root = dataset(&[("hbv_genome.fasta", ""), ("hbv_gene.fasta", ">p\nCG\n")]);
        let err = ReferenceSet::discover(root.path(), "hbv").unwrap_err();
        assert!(matches!(err.downcast_ref::<ViroError>(), Some(ViroError::EmptyReference { .. })));
    }
}
