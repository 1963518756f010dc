//! `ResolutionLevel[s]` (spec §3): this level's own generators, the Gröbner
//! basis of the next level's differentials expressed in this free module,
//! a divisibility index over their leads, and this level's critical-pair
//! store.

use crate::critical_pair::CriticalPairStore;
use algebra::ModElement;
use once::OnceVec;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct ResolutionLevel {
    gen_degs: OnceVec<i32>,
    /// `gb[j]` is the differential of generator `j` at the *next* level,
    /// expressed in this level's free module.
    gb: OnceVec<ModElement>,
    leads: OnceVec<algebra::ModMonomial>,
    /// Maps a lead's generator index `v` to the positions in `gb`/`leads`
    /// whose lead shares that `v`, in ascending order (so the first
    /// divisor found scanning the list is also the smallest index).
    index: RwLock<HashMap<u32, Vec<usize>>>,
    pub pairs: CriticalPairStore,
}

impl ResolutionLevel {
    pub fn new(t_trunc: i32) -> Self {
        Self {
            gen_degs: OnceVec::new(),
            gb: OnceVec::new(),
            leads: OnceVec::new(),
            index: RwLock::new(HashMap::new()),
            pairs: CriticalPairStore::new(t_trunc),
        }
    }

    pub fn add_generator(&self, degree: i32) -> usize {
        self.gen_degs.push(degree)
    }

    pub fn num_generators(&self) -> usize {
        self.gen_degs.len()
    }

    pub fn gen_degree(&self, i: usize) -> i32 {
        self.gen_degs.at(i)
    }

    pub fn gb_len(&self) -> usize {
        self.gb.len()
    }

    /// `dim_Ext`-style introspection (SPEC_FULL §14): the number of
    /// generators minted at this level, i.e. the dimension of Ext in this
    /// homological degree summed over all `t`.
    pub fn total_generators(&self) -> usize {
        self.num_generators()
    }

    /// `dim_Gb`-style introspection (SPEC_FULL §14): the size of the
    /// Gröbner basis closure at this level.
    pub fn total_gb_size(&self) -> usize {
        self.gb_len()
    }

    /// Append a new Gröbner basis entry (the differential of the next
    /// level's newly minted generator `j = gb_len()` before this call),
    /// updating the divisibility index and returning `j`.
    pub fn add_gb_entry(&self, element: ModElement) -> usize {
        let lead = element.lead().expect("ModElement::lead on an empty element");
        let j = self.gb.push(element);
        let pushed_lead = self.leads.push(lead);
        debug_assert_eq!(j, pushed_lead);
        self.index.write().unwrap().entry(lead.v()).or_default().push(j);
        j
    }

    pub fn leads_snapshot(&self) -> Vec<algebra::ModMonomial> {
        self.leads.to_vec()
    }

    pub fn gb_entry(&self, j: usize) -> ModElement {
        self.gb.at(j)
    }

    pub fn lead(&self, j: usize) -> algebra::ModMonomial {
        self.leads.at(j)
    }

    /// The smallest `k` such that `lead(gb[k])` divides `target` and shares
    /// its generator index.
    pub fn find_divisor(&self, target: algebra::ModMonomial) -> Option<usize> {
        let index = self.index.read().unwrap();
        let candidates = index.get(&target.v())?;
        candidates
            .iter()
            .copied()
            .find(|&k| self.leads.at(k).lead_divides(target))
    }
}
