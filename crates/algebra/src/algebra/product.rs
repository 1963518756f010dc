//! The admissible-matrix product formula for the mod 2 Milnor algebra.
//!
//! Given exponent vectors `r = (r_1, r_2, ...)` and `s = (s_1, s_2, ...)` for
//! `xi_1^{r_1} xi_2^{r_2} ...` and `xi_1^{s_1} xi_2^{s_2} ...`, the product is
//! a sum over matrices `x_{ij}` (`i` indexing rows `0..=r.len()`, `j` indexing
//! columns `0..=s.len()`, `x_{00}` unused) with:
//!
//!   - row margin: `r_i = x_{i,0} + sum_j x_{i,j} 2^j` for `i >= 1`
//!   - column margin: `s_j = x_{0,j} + sum_i x_{i,j}` for `j >= 1`
//!
//! Each valid matrix contributes the exponent vector `t_k = sum_{i+j=k}
//! x_{ij}` with coefficient (mod 2) the product, over every antidiagonal, of
//! the multinomial coefficient of that antidiagonal's entries — which mod 2
//! is 1 exactly when the entries' binary representations are pairwise
//! disjoint (no carries when summed). This enumerator walks matrices the way
//! a general-prime PPart multiplier does (sweeping row by row, incrementing
//! the first liftable cell and zeroing everything before it), specialized to
//! `p = 2` where the "does this carry" test collapses to a bitwise AND.

fn binomial2(n: u32, k: u32) -> bool {
    n & k == k
}

fn multinomial2(parts: &[u32]) -> bool {
    let mut acc = 0u32;
    for &p in parts {
        if acc & p != 0 {
            return false;
        }
        acc += p;
    }
    true
}

struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl Matrix {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    fn get(&self, i: usize, j: usize) -> u32 {
        self.data[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, v: u32) {
        self.data[i * self.cols + j] = v;
    }
}

struct Enumerator<'a> {
    r: &'a [u32],
    rows: usize,
    cols: usize,
    diag_num: usize,
    m: Matrix,
    init: bool,
}

impl<'a> Enumerator<'a> {
    fn new(r: &'a [u32], s: &'a [u32]) -> Self {
        let rows = r.len() + 1;
        let cols = s.len() + 1;
        let mut m = Matrix::new(rows, cols);
        for (i, &ri) in r.iter().enumerate() {
            m.set(i + 1, 0, ri);
        }
        for (j, &sj) in s.iter().enumerate() {
            m.set(0, j + 1, sj);
        }
        Self {
            r,
            rows,
            cols,
            diag_num: r.len() + s.len(),
            m,
            init: true,
        }
    }

    /// The smallest `l > k` with `l & sum == 0` (so `binomial2(sum + l, l)`
    /// holds), or `max + 1` if none exists with `l <= max`.
    fn next_val(sum: u32, k: u32, max: u32) -> u32 {
        let candidate = ((k | sum) + 1) & !sum;
        if candidate <= max {
            candidate
        } else {
            max + 1
        }
    }

    /// Advance to the next matrix satisfying the margins, by the standard
    /// sweep: find the first liftable cell scanning row-major, bump it, and
    /// zero out everything before it (redistributing that mass back to the
    /// row/column margins).
    fn advance(&mut self) -> bool {
        for i in 1..self.rows {
            let mut total = self.m.get(i, 0);
            let mut p_to_j = 1u32;
            for j in 1..self.cols {
                p_to_j *= 2;
                if total < p_to_j {
                    total += self.m.get(i, j) * p_to_j;
                    continue;
                }
                let col_sum: u32 = (0..i).map(|k| self.m.get(k, j)).sum();
                if col_sum == 0 {
                    total += self.m.get(i, j) * p_to_j;
                    continue;
                }
                let max_inc = col_sum.min(total / p_to_j);

                let mut sum = 0u32;
                let lower = (i + j + 1).saturating_sub(self.rows);
                for c in lower..j {
                    sum += self.m.get(i + j - c, c);
                }

                let cell = self.m.get(i, j);
                let next_val = Self::next_val(sum, cell, max_inc + cell);
                let inc = next_val - cell;

                if inc <= max_inc {
                    for row in 1..i {
                        self.m.set(row, 0, self.r[row - 1]);
                        for col in 1..self.cols {
                            let v = self.m.get(row, col);
                            let cur0 = self.m.get(0, col);
                            self.m.set(0, col, cur0 + v);
                            self.m.set(row, col, 0);
                        }
                    }
                    for col in 1..j {
                        let v = self.m.get(i, col);
                        let cur0 = self.m.get(0, col);
                        self.m.set(0, col, cur0 + v);
                        self.m.set(i, col, 0);
                    }
                    let cur0j = self.m.get(0, j);
                    self.m.set(0, j, cur0j - inc);
                    self.m.set(i, j, cell + inc);
                    self.m.set(i, 0, total - p_to_j * inc);
                    return true;
                }
                total += self.m.get(i, j) * p_to_j;
            }
        }
        false
    }

    fn diagonal_exponents(&self) -> Vec<u32> {
        let mut ans = Vec::with_capacity(self.diag_num);
        for diag in 1..=self.diag_num {
            let i_min = (diag + 1).saturating_sub(self.cols);
            let i_max = (diag + 1).min(self.rows);
            let mut sum = 0u32;
            for i in i_min..i_max {
                sum += self.m.get(i, diag - i);
            }
            ans.push(sum);
        }
        while ans.last() == Some(&0) {
            ans.pop();
        }
        ans
    }

    fn current_is_valid(&self) -> bool {
        for diag in 1..=self.diag_num {
            let i_min = (diag + 1).saturating_sub(self.cols);
            let i_max = (diag + 1).min(self.rows);
            let entries: Vec<u32> = (i_min..i_max).map(|i| self.m.get(i, diag - i)).collect();
            if !multinomial2(&entries) {
                return false;
            }
        }
        true
    }

    fn next(&mut self) -> Option<Vec<u32>> {
        loop {
            if self.init {
                self.init = false;
                let mut valid = true;
                for i in 1..self.rows.min(self.cols) {
                    if !binomial2(self.m.get(i, 0) + self.m.get(0, i), self.m.get(0, i)) {
                        valid = false;
                        break;
                    }
                }
                if valid {
                    return Some(self.diagonal_exponents());
                }
            } else if self.advance() {
                if self.current_is_valid() {
                    return Some(self.diagonal_exponents());
                }
            } else {
                return None;
            }
        }
    }
}

/// All output exponent vectors (with multiplicity; callers combining mod 2
/// should XOR-cancel repeats) arising from the admissible-matrix product of
/// `r` and `s`.
pub fn milnor_product(r: &[u32], s: &[u32]) -> Vec<Vec<u32>> {
    let mut enumerator = Enumerator::new(r, s);
    let mut results = Vec::new();
    while let Some(exponents) = enumerator.next() {
        results.push(exponents);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_product_is_disjoint_sum_when_no_carry() {
        // xi_1 * xi_2 with disjoint supports has only the trivial matrix.
        let r = vec![1];
        let s = vec![0, 1];
        let results = milnor_product(&r, &s);
        assert_eq!(results, vec![vec![1, 1]]);
    }

    #[test]
    fn squaring_by_one_has_no_admissible_matrix() {
        // xi_1 * xi_1: the only candidate matrix fails its `binomial2(1+1, 1)`
        // carry check on the first column, and `advance` has no other cell to
        // move mass into, so no admissible matrix survives. This matches the
        // classical Adem relation Sq^1 Sq^1 = 0.
        let r = vec![1];
        let s = vec![1];
        let results = milnor_product(&r, &s);
        assert!(results.is_empty());
    }
}
