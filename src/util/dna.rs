pub const SIGMA: usize = 6; // {0:$, 1:A, 2:C, 3:G, 4:T, 5:N}

#[inline]
pub fn to_alphabet(b: u8) -> u8 {
    if b == 0 { return 0; }
    match b.to_ascii_uppercase() {
        b'A' => 1,
        b'C' => 2,
        b'G' => 3,
        b'T' | b'U' => 4,
        _ => 5, // ambiguity codes and anything else behave as N
    }
}

/// Encode a sequence into the FM alphabet, case-insensitively.
pub fn encode(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&b| to_alphabet(b)).collect()
}

/// Watson-Crick complement of one base.
///
/// IUPAC ambiguity codes map onto their partner code (R/Y, K/M, B/V, D/H;
/// S, W and N are their own complement). Case is preserved. Bytes outside
/// the nucleotide alphabet (gaps, `*`) are returned unchanged.
///
/// `U` complements to `A`, as [`to_alphabet`] reads it as `T`; `A` still
/// complements to `T`, so `complement(complement(b)) == b` holds for every
/// byte except `U`/`u`.
#[inline]
pub fn complement(base: u8) -> u8 {
    let c = match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        b'S' => b'S',
        b'W' => b'W',
        b'N' => b'N',
        _ => return base,
    };
    if base.is_ascii_lowercase() { c.to_ascii_lowercase() } else { c }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
