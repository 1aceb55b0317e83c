/// 构建后缀数组（前缀倍增，每轮按 (rank[i], rank[i+k]) 排序）。
/// 输入为数值化的文本（0:$,1:A,2:C,3:G,4:T,5:N），
/// 允许文本中包含多个 0 作为不同序列的分隔符。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<u32> = text.iter().map(|&b| u32::from(b)).collect();
    let mut next: Vec<u32> = vec![0; n];

    let mut k = 1usize;
    loop {
        // 越过文本末尾的后缀排在最前（0），其余 rank 整体 +1
        let key = |i: usize| (rank[i], if i + k < n { rank[i + k] + 1 } else { 0 });
        sa.sort_unstable_by_key(|&i| key(i));

        next[sa[0]] = 0;
        for w in 1..n {
            let bump = u32::from(key(sa[w]) != key(sa[w - 1]));
            next[sa[w]] = next[sa[w - 1]] + bump;
        }
        std::mem::swap(&mut rank, &mut next);

        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}
