use std::path::PathBuf;

use thiserror::Error;

/// Which of the two reference files of a dataset a lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Genome,
    Gene,
}

impl RefKind {
    /// File-stem suffix that identifies this kind of reference file.
    pub fn suffix(self) -> &'static str {
        match self {
            RefKind::Genome => "genome",
            RefKind::Gene => "gene",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Error)]
pub enum ViroError {
    #[error("reference dataset directory '{}' does not exist", path.display())]
    UnknownDataset { path: PathBuf },

    #[error("no *{kind} reference file found in '{}'", dir.display())]
    MissingReference { kind: RefKind, dir: PathBuf },

    #[error("several *{kind} reference files found in '{}': {candidates:?}", dir.display())]
    AmbiguousReference {
        kind: RefKind,
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("reference file '{}' contains no sequences", path.display())]
    EmptyReference { path: PathBuf },

    #[error("no {format} files found in '{}'", dir.display())]
    EmptyInput { dir: PathBuf, format: String },

    #[error("input files {paths:?} share the sample name '{sample}'")]
    DuplicateSample { sample: String, paths: Vec<PathBuf> },

    #[error("identifier '{id}' appears more than once in '{}'", path.display())]
    DuplicateId { id: String, path: PathBuf },

    #[error("cannot find executable '{tool}'")]
    ToolNotFound { tool: String },

    #[error("{tool} exited with status {status:?}: {stderr}")]
    ToolFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("malformed alignment table at line {line}: {msg}")]
    MalformedTable { line: usize, msg: String },

    #[error("malformed record at line {line}: {msg}")]
    MalformedRecord { line: usize, msg: String },
}
