//! The critical-pair machinery that drives a single `ResolutionLevel`'s
//! Gröbner basis closure (spec §4.4), plus the trivial-syzygy and
//! transitive-GCD redundancy optimizations carried over from the original
//! engine's `groebner_steenrod.h`/`groebner.h` (SPEC_FULL §14).

use algebra::{MilnorMonomial, ModMonomial};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// `(i1, i2, m1, m2)`: `i1 == None` encodes a "single" critical element, an
/// external relation `m2 . v_new` with no partner index.
#[derive(Clone, Copy, Debug)]
pub struct CriticalPair {
    pub i1: Option<usize>,
    pub i2: usize,
    pub m1: MilnorMonomial,
    pub m2: MilnorMonomial,
}

impl CriticalPair {
    fn single(i2: usize, m2: MilnorMonomial) -> Self {
        Self {
            i1: None,
            i2,
            m1: MilnorMonomial::ZERO,
            m2,
        }
    }
}

#[derive(Default)]
pub struct CriticalPairStore {
    t_trunc: RwLock<i32>,
    /// Pairs already minimized, bucketed by their second index `j`, kept
    /// around so a future `minimize` call can chase redundancy against them.
    gb_pairs: RwLock<Vec<Vec<CriticalPair>>>,
    buffer_min_pairs: RwLock<BTreeMap<i32, Vec<CriticalPair>>>,
    buffer_singles: RwLock<BTreeMap<i32, Vec<CriticalPair>>>,
}

impl CriticalPairStore {
    pub fn new(t_trunc: i32) -> Self {
        Self {
            t_trunc: RwLock::new(t_trunc),
            gb_pairs: RwLock::new(Vec::new()),
            buffer_min_pairs: RwLock::new(BTreeMap::new()),
            buffer_singles: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register the lead of the newly added `gb[s]` entry at index `j`
    /// against every earlier lead sharing the same generator index.
    pub fn add(&self, j: usize, lead_j: ModMonomial, gen_deg: i32, existing_leads: &[ModMonomial]) {
        let t_trunc = *self.t_trunc.read().unwrap();
        let mut min_pairs = self.buffer_min_pairs.write().unwrap();
        for (i, &lead_i) in existing_leads.iter().enumerate() {
            if lead_i.v() != lead_j.v() {
                continue;
            }
            let gcd = lead_i.m().lead_gcd(lead_j.m());
            if gcd.is_zero() {
                // Relatively prime leading terms: the S-element reduces to
                // zero for degree reasons alone. Discard without queuing.
                continue;
            }
            let lcm = lead_i.m().lead_lcm(lead_j.m());
            let degree = lcm.degree() as i32 + gen_deg;
            if degree > t_trunc {
                continue;
            }
            let pair = CriticalPair {
                i1: Some(i),
                i2: j,
                m1: lcm.lead_divide(lead_i.m()),
                m2: lcm.lead_divide(lead_j.m()),
            };
            min_pairs.entry(degree).or_default().push(pair);
        }
        while self.gb_pairs.read().unwrap().len() <= j {
            self.gb_pairs.write().unwrap().push(Vec::new());
        }
    }

    /// Register an external single relation `m2 . v_new` at degree `t`.
    pub fn add_single(&self, j: usize, m2: MilnorMonomial, degree: i32) {
        self.buffer_singles
            .write()
            .unwrap()
            .entry(degree)
            .or_default()
            .push(CriticalPair::single(j, m2));
    }

    /// Remove pairs at degree `t` that are redundant: either another pair
    /// with the same second index has a strictly dividing `m2`, or a third
    /// basis element's lead divides the pair's lcm and that third element
    /// shares a generator with both halves of the pair (the "transitive"
    /// case from the original's `Minimize`, not just the one-step check).
    pub fn minimize(&self, t: i32, leads: &[ModMonomial]) {
        let mut min_pairs = self.buffer_min_pairs.write().unwrap();
        let Some(pairs) = min_pairs.remove(&t) else {
            return;
        };
        let mut survivors = Vec::with_capacity(pairs.len());
        'outer: for pair in pairs {
            let Some(i1) = pair.i1 else {
                survivors.push(pair);
                continue;
            };
            let lcm = pair.m1.lead_product(leads[i1].m());
            for (k, &lead_k) in leads.iter().enumerate() {
                if k == i1 || k == pair.i2 || lead_k.v() != leads[pair.i2].v() {
                    continue;
                }
                if lead_k.m().lead_divides(lcm) && lead_k.m() != lcm {
                    let gcd_ik = lead_k.m().lead_gcd(leads[i1].m());
                    let gcd_jk = lead_k.m().lead_gcd(leads[pair.i2].m());
                    if gcd_ik.is_zero() && gcd_jk.is_zero() {
                        continue 'outer;
                    }
                }
            }
            survivors.push(pair);
        }

        let mut gb_pairs = self.gb_pairs.write().unwrap();
        for pair in &survivors {
            while gb_pairs.len() <= pair.i2 {
                gb_pairs.push(Vec::new());
            }
            gb_pairs[pair.i2].push(*pair);
        }
        min_pairs.insert(t, survivors);
    }

    /// Return and clear every single and surviving minimal pair queued at
    /// degree `t`.
    pub fn drain(&self, t: i32) -> Vec<CriticalPair> {
        let mut result = self.buffer_singles.write().unwrap().remove(&t).unwrap_or_default();
        result.extend(self.buffer_min_pairs.write().unwrap().remove(&t).unwrap_or_default());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algebra::MilnorMonomial as MM;

    #[test]
    fn relatively_prime_leads_are_discarded() {
        let store = CriticalPairStore::new(100);
        let lead0 = ModMonomial::new(MM::p(0, 1), 0);
        let lead1 = ModMonomial::new(MM::p(4, 5), 0);
        store.add(1, lead1, 0, &[lead0]);
        assert!(store.drain(lead1.m().degree() as i32).is_empty());
    }

    #[test]
    fn overlapping_leads_produce_a_pair() {
        let store = CriticalPairStore::new(100);
        let lead0 = ModMonomial::new(MM::p(0, 2), 0);
        let lead1 = ModMonomial::new(MM::p(0, 1), 0);
        store.add(1, lead1, 0, &[lead0]);
        let lcm = lead0.m().lead_lcm(lead1.m());
        store.minimize(lcm.degree() as i32, &[lead0, lead1]);
        let drained = store.drain(lcm.degree() as i32);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].i1, Some(0));
        assert_eq!(drained[0].i2, 1);
    }

    /// A third basis element whose lead divides `lcm(lead0, lead1)` but is
    /// coprime with both halves of the pair makes the pair redundant (the
    /// transitive case in `minimize`'s inner loop): the chain toward
    /// redundancy continues exactly when both GCDs vanish, mirroring
    /// `groebner.h`'s `HasGCD` check, which aborts (pair survives) on a
    /// nonzero GCD rather than on a zero one.
    #[test]
    fn transitive_redundancy_discards_pair_when_third_lead_is_coprime_with_both() {
        let store = CriticalPairStore::new(100);
        let lead0 = ModMonomial::new(MM::p(0, 1).lead_product(MM::p(1, 2)), 0);
        let lead1 = ModMonomial::new(MM::p(1, 2).lead_product(MM::p(2, 3)), 0);
        let lead2 = ModMonomial::new(MM::ZERO, 0);

        store.add(1, lead1, 0, &[lead0]);
        let lcm = lead0.m().lead_lcm(lead1.m());
        let degree = lcm.degree() as i32;
        store.minimize(degree, &[lead0, lead1, lead2]);
        assert!(store.drain(degree).is_empty());
    }
}
