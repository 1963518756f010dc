//! Tables describing the exterior generators `P(i, j) = xi_{j-i}^{2^i}` of the
//! mod 2 Milnor basis, for `0 <= i < j <= XI_MAX + 1`.
//!
//! The generators are numbered so that index `0` is `P(XI_MAX, XI_MAX+1)` and
//! the last index is `P(0, 1)`; this is the order [`crate::milnor::MMilnor`]
//! packs into its bitfield, matching the layout of `MMILNOR_GEN_I/J/DEG/WEIGHT`
//! in the reference implementation this crate's monomial packing is modeled
//! on.

/// Largest xi generator supported; `xi_8` bounds the maximum representable
/// degree to `2^9 - 1 = 511`.
pub const XI_MAX: usize = 8;

/// Number of `(i, j)` pairs with `0 <= i < j <= XI_MAX + 1`.
pub const MMILNOR_INDEX_NUM: usize = (XI_MAX + 1) * (XI_MAX + 2) / 2 - 1;

struct GenTables {
    i: [u32; MMILNOR_INDEX_NUM],
    j: [u32; MMILNOR_INDEX_NUM],
    deg: [u32; MMILNOR_INDEX_NUM],
    weight: [u32; MMILNOR_INDEX_NUM],
}

fn build_tables() -> GenTables {
    let mut i = [0u32; MMILNOR_INDEX_NUM];
    let mut j = [0u32; MMILNOR_INDEX_NUM];
    let mut deg = [0u32; MMILNOR_INDEX_NUM];
    let mut weight = [0u32; MMILNOR_INDEX_NUM];
    let mut n = 0;
    for jj in 1..=(XI_MAX as i64 + 1) {
        let mut ii = jj - 1;
        while ii >= 0 {
            if n < MMILNOR_INDEX_NUM {
                i[n] = ii as u32;
                j[n] = jj as u32;
                deg[n] = ((1u32 << jj) - (1u32 << ii)) as u32;
                weight[n] = (2 * (jj - ii) - 1) as u32;
                n += 1;
            }
            ii -= 1;
        }
    }
    GenTables { i, j, deg, weight }
}

thread_local! {
    static TABLES: GenTables = build_tables();
}

fn with_tables<R>(f: impl FnOnce(&GenTables) -> R) -> R {
    TABLES.with(f)
}

pub fn gen_i(index: usize) -> u32 {
    with_tables(|t| t.i[index])
}

pub fn gen_j(index: usize) -> u32 {
    with_tables(|t| t.j[index])
}

pub fn gen_deg(index: usize) -> u32 {
    with_tables(|t| t.deg[index])
}

pub fn gen_weight(index: usize) -> u32 {
    with_tables(|t| t.weight[index])
}

/// The bit index of `P(i, j)` within the `MMILNOR_INDEX_NUM`-bit monomial
/// field: `j*(j+1)/2 - i - 1`.
pub fn index_of(i: u32, j: u32) -> usize {
    (j * (j + 1) / 2 - i - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_of_is_bijective_inverse_of_tables() {
        for idx in 0..MMILNOR_INDEX_NUM {
            let i = gen_i(idx);
            let j = gen_j(idx);
            assert_eq!(index_of(i, j), idx);
        }
    }

    #[test]
    fn degree_matches_power_difference() {
        for idx in 0..MMILNOR_INDEX_NUM {
            let i = gen_i(idx);
            let j = gen_j(idx);
            assert_eq!(gen_deg(idx), (1u32 << j) - (1u32 << i));
        }
    }
}
