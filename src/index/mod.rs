//! 参考序列的 FM 索引（后缀数组 + BWT + Occ 采样）

pub mod fm;
pub mod sa;
