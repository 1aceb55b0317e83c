//! # virotator
//!
//! 环状病毒基因组序列的方向归一化与旋转。
//!
//! 对每条序列：
//!
//! - **链判定**：与参考基因组比对，决定正链 / 负链 / 未知
//! - **方向归一化**：负链序列反向互补（质量值只反转）
//! - **三倍化**：序列自身拼接三次，使跨越原点的基因也能线性找到
//! - **基因定位**：在三倍序列中为参考基因选出一个起点（策略可替换）
//! - **旋转**：从该起点截取原长度，使基因起点成为第 1 位；找不到或只有部分基因的序列被计数拒绝
//!
//! ## 快速示例
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use virotator::align::{FmAlignOpt, FmAligner};
//! use virotator::io::SeqFormat;
//! use virotator::pipeline::{self, locate::MiddleThird, RunConfig};
//! use virotator::reference::ReferenceSet;
//!
//! let refs = ReferenceSet::discover("references".as_ref(), "hbv")?;
//! let aligner = FmAligner::new(&refs.genome, &refs.gene, FmAlignOpt::default())?;
//! let cfg = RunConfig {
//!     input_dir: PathBuf::from("reads"),
//!     output_dir: PathBuf::from("rotated"),
//!     format: SeqFormat::Fastq,
//! };
//! let report = pipeline::run_batch(&cfg, &aligner, &MiddleThird)?;
//! println!("summary written to {}", report.summary_path.display());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA / FASTQ 读写
//! - [`index`] — 参考序列 FM 索引（后缀数组、BWT、Occ 采样）
//! - [`align`] — 比对协作者接口，外部 blastn 与进程内 FM 实现
//! - [`pipeline`] — 五个阶段、每文件日志与批次汇总
//! - [`reference`] — 参考数据集查找
//! - [`util`] — 碱基编码与反向互补

pub mod align;
pub mod error;
pub mod index;
pub mod io;
pub mod pipeline;
pub mod reference;
pub mod util;

pub use error::ViroError;
