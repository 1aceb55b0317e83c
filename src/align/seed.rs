use crate::index::fm::FmIndex;

/// 精确匹配种子：query[qb, qe) == contig[rb, re)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Seed {
    pub contig: usize,
    pub qb: usize,
    pub qe: usize,
    pub rb: u32,
    pub re: u32,
}

impl Seed {
    pub fn len(&self) -> usize {
        self.qe - self.qb
    }

    pub fn is_empty(&self) -> bool {
        self.qe == self.qb
    }
}

/// SMEM 风格的种子搜索。
/// 对 query 的每个终点 qe，用 FM 索引向左逐字母扩展，得到以 qe 结尾的最长精确匹配；
/// 随后丢弃被其他匹配完全包含的区间，再把 SA 区间展开为具体种子。
/// 出现次数超过 max_occ 的重复匹配不展开。
pub fn find_seeds(fm: &FmIndex, query_alpha: &[u8], min_len: usize, max_occ: usize) -> Vec<Seed> {
    let n = query_alpha.len();
    if min_len == 0 || n < min_len || fm.is_empty() {
        return Vec::new();
    }

    // (qb, qe, sa_l, sa_r)
    let mut mems: Vec<(usize, usize, usize, usize)> = Vec::new();
    for qe in (min_len..=n).rev() {
        let mut iv = fm.full();
        let mut qb = qe;
        while qb > 0 {
            match fm.extend_left(query_alpha[qb - 1], iv) {
                Some(next) => {
                    iv = next;
                    qb -= 1;
                }
                None => break,
            }
        }
        if qe - qb >= min_len {
            mems.push((qb, qe, iv.0, iv.1));
        }
    }

    drop_contained(&mut mems);

    let mut seeds = Vec::new();
    for &(qb, qe, l, r) in &mems {
        if r - l > max_occ {
            continue;
        }
        let len = (qe - qb) as u32;
        for &pos in fm.positions((l, r)) {
            if let Some((contig, off)) = fm.locate(pos) {
                if off + len <= fm.contigs[contig].len {
                    seeds.push(Seed { contig, qb, qe, rb: off, re: off + len });
                }
            }
        }
    }
    seeds.sort_unstable();
    seeds.dedup();
    seeds
}

/// 按 (qb 升序, qe 降序) 扫描一遍：qe 不超过已见最大 qe 的区间被包含。
fn drop_contained(mems: &mut Vec<(usize, usize, usize, usize)>) {
    mems.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    let mut max_qe = 0usize;
    mems.retain(|m| {
        if m.1 > max_qe {
            max_qe = m.1;
            true
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqRecord;
    use crate::util::dna;

    fn build(seq: &[u8]) -> FmIndex {
        FmIndex::from_records(&[SeqRecord::new("ref", seq.to_vec())], 4)
    }

    #[test]
    fn full_length_match_is_one_seed() {
        let fm = build(b"TTGACCGATAGGCTAACG");
        let seeds = find_seeds(&fm, &dna::encode(b"GACCGATAGG"), 4, 100);
        assert_eq!(seeds, vec![Seed { contig: 0, qb: 0, qe: 10, rb: 2, re: 12 }]);
    }

    #[test]
    fn respects_min_len() {
        let fm = build(b"ACGTACGT");
        assert!(find_seeds(&fm, &dna::encode(b"CGTA"), 5, 100).is_empty());
        assert!(!find_seeds(&fm, &dna::encode(b"CGTA"), 4, 100).is_empty());
    }

    #[test]
    fn mismatch_splits_into_two_seeds() {
        let fm = build(b"AACCGGTTACGTTGCA");
        // position 8 mutated A -> G
        let seeds = find_seeds(&fm, &dna::encode(b"AACCGGTTGCGTTGCA"), 5, 100);
        assert!(seeds.iter().any(|s| s.qb == 0 && s.qe == 8 && s.rb == 0));
        assert!(seeds.iter().any(|s| s.qb == 9 && s.qe == 16 && s.rb == 9));
    }

    #[test]
    fn repeated_query_occurrences_are_all_seeded() {
        let gene = b"GATTACAGGC";
        let fm = build(gene);
        let mut tripled = b"TT".to_vec();
        for _ in 0..3 {
            tripled.extend_from_slice(gene);
            tripled.extend_from_slice(b"TTTT");
        }
        let seeds = find_seeds(&fm, &dna::encode(&tripled), 6, 100);
        let starts: Vec<usize> = seeds.iter().filter(|s| s.len() == gene.len()).map(|s| s.qb).collect();
        assert_eq!(starts, vec![2, 16, 30]);
    }

    #[test]
    fn drop_contained_keeps_maximal_intervals() {
        let mut mems = vec![(0, 10, 0, 1), (2, 8, 0, 1), (5, 12, 0, 1), (5, 9, 0, 1)];
        drop_contained(&mut mems);
        assert_eq!(mems, vec![(0, 10, 0, 1), (5, 12, 0, 1)]);
    }
}
