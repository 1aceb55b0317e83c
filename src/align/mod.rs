//! 比对协作者：给定一批序列，回答“在参考基因组的哪条链上”以及“参考基因从哪里开始”。
//!
//! [`Aligner`] 是流水线与具体比对工具之间的接缝：
//! [`BlastnAligner`] 调用外部 `blastn`，[`FmAligner`] 在进程内用 FM 索引种子 + 链完成同样的事。

pub mod blast;
pub mod chain;
pub mod hits;
pub mod local;
pub mod seed;

use anyhow::Result;

use crate::io::SeqRecord;

pub use blast::{BlastnAligner, BlastnOpt};
pub use hits::{parse_gene_table, parse_strand_table, GeneHit, Orientation, StrandHit};
pub use local::{FmAlignOpt, FmAligner};

pub trait Aligner {
    /// `records` 对参考基因组的链比对结果，保持工具输出顺序（每条序列最佳命中在前）。
    fn align_genome(&self, records: &[SeqRecord]) -> Result<Vec<StrandHit>>;

    /// 三倍序列对参考基因的同向比对结果；`start` 为 1-based 基因起点。
    fn align_gene(&self, records: &[SeqRecord]) -> Result<Vec<GeneHit>>;
}

