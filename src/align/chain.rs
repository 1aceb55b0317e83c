use std::collections::BTreeMap;

use super::seed::Seed;

/// 种子链：同一 contig 上、query 与参考坐标同时递增的一组种子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub contig: usize,
    pub seeds: Vec<Seed>,
    /// 链中种子覆盖的 query 碱基数
    pub score: u32,
}

impl Chain {
    /// query 上的覆盖区间 [qb, qe)
    pub fn query_span(&self) -> (usize, usize) {
        let qb = self.seeds.iter().map(|s| s.qb).min().unwrap_or(0);
        let qe = self.seeds.iter().map(|s| s.qe).max().unwrap_or(0);
        (qb, qe)
    }
}

/// 从种子集合中求最佳链（O(n^2) DP，种子数很少）
pub fn best_chain(seeds: &[Seed], max_gap: usize) -> Option<Chain> {
    if seeds.is_empty() {
        return None;
    }

    let mut order: Vec<usize> = (0..seeds.len()).collect();
    order.sort_by_key(|&i| (seeds[i].contig, seeds[i].qb, seeds[i].rb));

    let n = order.len();
    let mut dp: Vec<u32> = vec![0; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut best: Option<usize> = None;

    for t in 0..n {
        let si = &seeds[order[t]];
        let len_i = si.len() as u32;
        dp[t] = len_i;

        for u in 0..t {
            let sj = &seeds[order[u]];
            let collinear = sj.contig == si.contig && sj.qe <= si.qb && sj.re <= si.rb;
            if !collinear {
                continue;
            }
            let gap_q = si.qb - sj.qe;
            let gap_r = (si.rb - sj.re) as usize;
            if gap_q > max_gap || gap_r > max_gap {
                continue;
            }
            if dp[u] + len_i > dp[t] {
                dp[t] = dp[u] + len_i;
                prev[t] = Some(u);
            }
        }

        if best.map_or(true, |b| dp[t] > dp[b]) {
            best = Some(t);
        }
    }

    let best_t = best?;
    let mut picked = Vec::new();
    let mut cur = Some(best_t);
    while let Some(t) = cur {
        picked.push(seeds[order[t]].clone());
        cur = prev[t];
    }
    picked.reverse();

    Some(Chain { contig: picked[0].contig, seeds: picked, score: dp[best_t] })
}

/// 贪心剥离：每个 contig 上反复取最佳链并移除其种子，最多 max_chains 条。
/// 结果按得分降序、query 起点升序排列。
pub fn build_chains(seeds: &[Seed], max_gap: usize, max_chains: usize) -> Vec<Chain> {
    let mut by_contig: BTreeMap<usize, Vec<Seed>> = BTreeMap::new();
    for s in seeds {
        by_contig.entry(s.contig).or_default().push(s.clone());
    }

    let mut chains = Vec::new();
    for (_, mut remaining) in by_contig {
        for _ in 0..max_chains {
            let Some(chain) = best_chain(&remaining, max_gap) else { break };
            remaining.retain(|s| !chain.seeds.contains(s));
            chains.push(chain);
        }
    }

    chains.sort_by(|a, b| b.score.cmp(&a.score).then(a.query_span().0.cmp(&b.query_span().0)));
    chains
}

/// 去除弱链（低于 min_score）以及 query 覆盖与更优链重叠超过 max_overlap 的冗余链。
/// chains 需已按得分降序排列。
pub fn filter_chains(chains: &mut Vec<Chain>, min_score: u32, max_overlap: f64) {
    chains.retain(|c| c.score >= min_score);

    let mut kept: Vec<(usize, usize)> = Vec::with_capacity(chains.len());
    chains.retain(|c| {
        let (qb, qe) = c.query_span();
        let redundant = kept.iter().any(|&(kb, ke)| {
            let overlap = qe.min(ke).saturating_sub(qb.max(kb));
            let shorter = (qe - qb).min(ke - kb);
            shorter > 0 && overlap as f64 / shorter as f64 > max_overlap
        });
        if !redundant {
            kept.push((qb, qe));
        }
        !redundant
    });
}
