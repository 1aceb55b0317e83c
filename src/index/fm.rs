use crate::io::SeqRecord;
use crate::util::dna;

use super::sa;

/// 索引中一条参考序列的位置信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub len: u32,
    pub offset: u32,
}

/// 内存中的 FM 索引：
/// - 字母表固定为 dna::SIGMA（0 预留为分隔符 $）。
/// - Occ 按定长分块采样，块内顺扫补偿。
/// - 保存完整 SA，参考序列（病毒基因组 / 基因）规模很小。
#[derive(Debug)]
pub struct FmIndex {
    block: usize,
    /// C[a] = 文本中字母 < a 的累计数量
    c: Vec<u32>,
    bwt: Vec<u8>,
    /// occ_samples[block_id * SIGMA + a] = BWT[0..block_id*block) 中 a 的数量
    occ_samples: Vec<u32>,
    sa: Vec<u32>,
    pub contigs: Vec<Contig>,
}

/// SA 区间 [l, r)
pub type Interval = (usize, usize);

impl FmIndex {
    /// 把所有记录拼接（以 0 分隔）后建索引。
    pub fn from_records(records: &[SeqRecord], block: usize) -> Self {
        let mut text: Vec<u8> = Vec::new();
        let mut contigs = Vec::with_capacity(records.len());
        for rec in records {
            let offset = text.len() as u32;
            text.extend(rec.seq.iter().map(|&b| dna::to_alphabet(b)));
            contigs.push(Contig { name: rec.id.clone(), len: rec.seq.len() as u32, offset });
            text.push(0);
        }
        let sa = sa::build_sa(&text);
        Self::build(&text, sa, contigs, block.max(1))
    }

    fn build(text: &[u8], sa: Vec<u32>, contigs: Vec<Contig>, block: usize) -> Self {
        let n = text.len();
        let bwt: Vec<u8> = sa
            .iter()
            .map(|&p| if p == 0 { text[n - 1] } else { text[p as usize - 1] })
            .collect();

        let mut c = vec![0u32; dna::SIGMA];
        for &ch in &bwt {
            for slot in c.iter_mut().skip(ch as usize + 1) {
                *slot += 1;
            }
        }

        let num_blocks = (n + block - 1) / block;
        let mut occ_samples = Vec::with_capacity(num_blocks * dna::SIGMA);
        let mut running = [0u32; dna::SIGMA];
        for chunk in bwt.chunks(block) {
            occ_samples.extend_from_slice(&running);
            for &ch in chunk {
                running[ch as usize] += 1;
            }
        }

        Self { block, c, bwt, occ_samples, sa, contigs }
    }

    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    /// BWT[0..pos) 中 a 的出现次数
    #[inline]
    pub fn occ(&self, a: u8, pos: usize) -> u32 {
        if pos == 0 {
            return 0;
        }
        let bi = (pos - 1) / self.block;
        let base = self.occ_samples[bi * dna::SIGMA + a as usize];
        let start = bi * self.block;
        base + self.bwt[start..pos].iter().filter(|&&ch| ch == a).count() as u32
    }

    /// 整个文本对应的 SA 区间
    pub fn full(&self) -> Interval {
        (0, self.bwt.len())
    }

    /// 在区间左侧扩展一个字母；N 与分隔符永不匹配。
    #[inline]
    pub fn extend_left(&self, a: u8, (l, r): Interval) -> Option<Interval> {
        if a == 0 || a as usize >= dna::SIGMA - 1 {
            return None;
        }
        let c0 = self.c[a as usize] as usize;
        let nl = c0 + self.occ(a, l) as usize;
        let nr = c0 + self.occ(a, r) as usize;
        (nl < nr).then_some((nl, nr))
    }

    /// 精确匹配搜索，pat 为编码后的字母表
    pub fn backward_search(&self, pat: &[u8]) -> Option<Interval> {
        if self.bwt.is_empty() {
            return None;
        }
        pat.iter().rev().try_fold(self.full(), |iv, &a| self.extend_left(a, iv))
    }

    pub fn positions(&self, (l, r): Interval) -> &[u32] {
        &self.sa[l..r]
    }

    /// 文本位置 -> (contig 下标, contig 内偏移)；落在分隔符上返回 None。
    pub fn locate(&self, pos: u32) -> Option<(usize, u32)> {
        let i = self.contigs.partition_point(|c| c.offset + c.len <= pos);
        let c = self.contigs.get(i)?;
        (pos >= c.offset).then(|| (i, pos - c.offset))
    }
}
