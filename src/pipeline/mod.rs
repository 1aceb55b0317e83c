//! 方向归一化与旋转流水线：
//! 链判定 → 反向互补 → 三倍化 → 基因定位 → 旋转。
//!
//! 每个输入文件完整走完所有阶段后才处理下一个文件；
//! 拒绝计数汇总在 [`summary::RunSummary`] 中，批处理结束时一次性写出。

pub mod locate;
pub mod report;
pub mod rotate;
pub mod strand;
pub mod summary;
pub mod triple;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::align::Aligner;
use crate::error::ViroError;
use crate::io::{self, SeqFormat, SeqRecord};
use locate::StartPolicy;
use report::{FileCounters, FileReport, ProcessingLog};
use summary::{RunSummary, SUMMARY_FILE};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: SeqFormat,
}

/// 单个文件走完全部阶段后的结果
#[derive(Debug)]
pub struct Processed {
    pub records: Vec<SeqRecord>,
    pub counters: FileCounters,
    pub log: ProcessingLog,
}

#[derive(Debug)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub summary_path: PathBuf,
}

/// 列出目录中该格式的输入文件，按文件名排序；样本名重复时报错。
pub fn discover_inputs(dir: &Path, format: SeqFormat) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("cannot list '{}'", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && format.matches_path(&path) {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(ViroError::EmptyInput { dir: dir.to_path_buf(), format: format.to_string() }.into());
    }
    files.sort();

    let mut by_sample: HashMap<String, Vec<PathBuf>> = HashMap::new();
    for path in &files {
        by_sample.entry(sample_name(path)).or_default().push(path.clone());
    }
    if let Some((sample, paths)) = by_sample.into_iter().find(|(_, p)| p.len() > 1) {
        return Err(ViroError::DuplicateSample { sample, paths }.into());
    }
    Ok(files)
}

/// 去掉格式扩展名的文件名：`reads/s1.fastq` -> `s1`
pub fn sample_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_unique(records: &[SeqRecord], path: &Path) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for rec in records {
        if !seen.insert(rec.id.as_str()) {
            return Err(ViroError::DuplicateId { id: rec.id.clone(), path: path.to_path_buf() }.into());
        }
    }
    Ok(())
}

/// 对一个文件的全部记录执行链判定、方向归一化、三倍化、基因定位与旋转。
pub fn process_records(
    records: Vec<SeqRecord>,
    aligner: &dyn Aligner,
    policy: &dyn StartPolicy,
) -> Result<Processed> {
    let total = records.len();

    let genome_hits = aligner.align_genome(&records).context("strand detection failed")?;
    let calls = strand::classify(&records, &genome_hits);
    let oriented = strand::orient(records, &calls);

    let tripled = triple::triple(&oriented.records);
    let gene_hits = aligner.align_gene(&tripled).context("gene search failed")?;
    let placements = locate::locate(&tripled, &gene_hits, policy);
    let rotation = rotate::rotate(&tripled, &placements)?;

    let counters = FileCounters {
        records: total,
        reverse_complemented: oriented.reverse_complemented.len(),
        unresolved: oriented.unresolved.len(),
        rotated: rotation.records.len(),
        without_gene: rotation.without_gene.len(),
        less_gene: rotation.less_gene.len(),
    };
    let log = ProcessingLog {
        reverse_complemented: oriented.reverse_complemented,
        unresolved: oriented.unresolved,
        without_gene: rotation.without_gene,
        less_gene: rotation.less_gene,
    };
    Ok(Processed { records: rotation.records, counters, log })
}

pub fn output_paths(cfg: &RunConfig, sample: &str) -> (PathBuf, PathBuf) {
    let ext = cfg.format.extensions()[0];
    (
        cfg.output_dir.join(format!("{}.rotated.{}", sample, ext)),
        cfg.output_dir.join(format!("{}.log", sample)),
    )
}

pub fn process_file(
    path: &Path,
    cfg: &RunConfig,
    aligner: &dyn Aligner,
    policy: &dyn StartPolicy,
) -> Result<FileReport> {
    let sample = sample_name(path);
    let records = io::read_records(path, cfg.format)?;
    if records.is_empty() {
        log::warn!("{}: no sequences in '{}'", sample, path.display());
    }
    check_unique(&records, path)?;

    let processed = process_records(records, aligner, policy)
        .with_context(|| format!("processing '{}' failed", path.display()))?;

    let (out_path, log_path) = output_paths(cfg, &sample);
    io::write_records_to_path(&out_path, cfg.format, &processed.records)?;
    processed.log.write_to_path(&log_path, &sample)?;

    let c = processed.counters;
    log::info!(
        "{}: {} sequence(s), {} reverse complemented, {} strand unresolved, {} rotated, {} without gene, {} partial gene",
        sample,
        c.records,
        c.reverse_complemented,
        c.unresolved,
        c.rotated,
        c.without_gene,
        c.less_gene
    );
    Ok(FileReport { sample, counters: c, log: processed.log })
}

/// 按文件名顺序处理所有输入文件。遇到第一个失败即停止，
/// 但此前已完成文件的汇总行仍会写出。
pub fn run_batch(cfg: &RunConfig, aligner: &dyn Aligner, policy: &dyn StartPolicy) -> Result<BatchReport> {
    let inputs = discover_inputs(&cfg.input_dir, cfg.format)?;
    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("cannot create output directory '{}'", cfg.output_dir.display()))?;
    log::info!("{} {} file(s) in '{}'", inputs.len(), cfg.format, cfg.input_dir.display());

    let mut summary = RunSummary::new();
    let mut files = Vec::with_capacity(inputs.len());
    let outcome = inputs.iter().try_for_each(|path| -> Result<()> {
        let report = process_file(path, cfg, aligner, policy)?;
        summary.push(report.summary_row());
        files.push(report);
        Ok(())
    });

    let summary_path = cfg.output_dir.join(SUMMARY_FILE);
    let written = summary.write_to(&summary_path);
    if let Err(err) = outcome {
        if let Err(summary_err) = written {
            log::error!("{:#}", summary_err);
        }
        return Err(err);
    }
    written?;
    Ok(BatchReport { files, summary_path })
}
