//! Extends a partial chain map `phi~: F_* -> G_{*-k}` one homological degree
//! at a time by inverting `d_G` on boundaries (spec §4.6).

use crate::error::ResolverError;
use crate::resolution_level::ResolutionLevel;
use algebra::{MilnorElement, ModElement};
use maybe_rayon::prelude::*;
use std::sync::{Arc, RwLock};

pub struct ChainLifter {
    source: Vec<Arc<ResolutionLevel>>,
    target: Vec<Arc<ResolutionLevel>>,
    shift: u32,
    /// `phi[s]` is the image of every generator of `source[s]`, as an
    /// element of `target[s - shift]`.
    phi: RwLock<Vec<Vec<ModElement>>>,
}

impl ChainLifter {
    pub fn new(
        source: Vec<Arc<ResolutionLevel>>,
        target: Vec<Arc<ResolutionLevel>>,
        shift: u32,
        seed: Vec<ModElement>,
    ) -> Self {
        Self {
            source,
            target,
            shift,
            phi: RwLock::new(vec![seed]),
        }
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// The images computed so far for level `s`, or `None` if `s` hasn't
    /// been lifted yet.
    pub fn images_at(&self, s: usize) -> Option<Vec<ModElement>> {
        self.phi.read().unwrap().get(s).cloned()
    }

    /// Reduce `w` (an element of `level`'s free module) against `level`'s
    /// Gröbner basis, accumulating the generator multiples used into a
    /// preimage `x` of the *next* level — each step that eliminates a term
    /// via `lead(gb[level][k])` contributes `multiplier . v_k` to `x`,
    /// because `gb[level][k]` is exactly `d_G(v_k)`.
    fn solve_preimage(level: &ResolutionLevel, mut w: ModElement) -> ModElement {
        let mut x = ModElement::zero();
        loop {
            let Some(lead) = w.lead() else {
                return x;
            };
            let Some(k) = level.find_divisor(lead) else {
                debug_assert!(
                    false,
                    "chain lift: boundary did not reduce to zero against the target Grobner basis"
                );
                return x;
            };
            let divisor_lead = level.lead(k);
            let quotient = lead.lead_divide(divisor_lead);
            let subtrahend = level.gb_entry(k).act(&MilnorElement::single(quotient));
            w.add_assign(&subtrahend);
            x.add_assign(&ModElement::single(algebra::ModMonomial::new(quotient, k as u32)));
        }
    }

    /// Lift through homological degree `s_max` (inclusive), processing each
    /// level's cohort of generators in parallel since the jobs are
    /// independent given the target resolution is read-only.
    pub fn lift_through(&self, s_max: usize) -> Result<(), ResolverError> {
        let mut start = self.phi.read().unwrap().len();
        while start <= s_max {
            let s = start;
            if s == 0 || s >= self.source.len() {
                break;
            }
            let prev_images = self
                .phi
                .read()
                .unwrap()
                .get(s - 1)
                .cloned()
                .unwrap_or_default();
            let source_gen_level = &self.source[s];
            let source_diff_level = &self.source[s - 1];
            let target_s_minus_k = s as i32 - 1 - self.shift as i32;
            if target_s_minus_k < 0 {
                return Err(ResolverError::Presentation {
                    detail: format!("chain lift shift {} exceeds homological degree {}", self.shift, s),
                });
            }
            let target_level = &self.target[target_s_minus_k as usize];

            let n = source_gen_level.num_generators();
            let images_this: Vec<ModElement> = (0..n)
                .collect::<Vec<_>>()
                .maybe_into_par_iter()
                .map(|v| {
                    let d_f_v = source_diff_level.gb_entry(v);
                    let w = d_f_v.subs(&prev_images);
                    Self::solve_preimage(target_level, w)
                })
                .collect();

            self.phi.write().unwrap().push(images_this);
            start += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution_level::ResolutionLevel;
    use algebra::{MilnorMonomial, ModMonomial};

    #[test]
    fn identity_lift_of_zero_shift_reproduces_images() {
        let target_level0 = Arc::new(ResolutionLevel::new(20));
        target_level0.add_generator(0);
        let target_level1 = Arc::new(ResolutionLevel::new(20));
        let lead = ModMonomial::new(MilnorMonomial::p(0, 1), 0);
        target_level1.add_generator(1);
        let _ = lead;

        let source_level0 = Arc::new(ResolutionLevel::new(20));
        source_level0.add_generator(0);

        let lifter = ChainLifter::new(
            vec![source_level0],
            vec![target_level0, target_level1],
            0,
            vec![ModElement::single(ModMonomial::new(MilnorMonomial::from_exponents(&[]), 0))],
        );
        assert_eq!(lifter.shift(), 0);
        assert!(lifter.images_at(0).is_some());
    }

    /// Lifting the identity chain map (shift 0) through level 1 of the
    /// sphere's own resolution start (`v_0` at s=0, `h_0` with `d(h_0) =
    /// Sq^1 v_0` at s=1) must satisfy the chain map condition
    /// `d_G(phi(h_0)) - phi(d_F(h_0)) = 0` (spec §4.6/§8 item 8), exercising
    /// `lift_through`'s `solve_preimage` loop instead of just its seed.
    #[test]
    fn lift_through_satisfies_the_chain_map_condition() {
        let lead = ModMonomial::new(MilnorMonomial::p(0, 1), 0);
        let d_h0 = ModElement::single(lead);

        let source_level0 = Arc::new(ResolutionLevel::new(20));
        source_level0.add_generator(0);
        source_level0.add_gb_entry(d_h0.clone());
        let source_level1 = Arc::new(ResolutionLevel::new(20));
        source_level1.add_generator(1);

        let target_level0 = Arc::new(ResolutionLevel::new(20));
        target_level0.add_generator(0);
        target_level0.add_gb_entry(d_h0.clone());
        let target_level1 = Arc::new(ResolutionLevel::new(20));
        target_level1.add_generator(1);

        let identity = ModElement::single(ModMonomial::new(MilnorMonomial::from_exponents(&[]), 0));

        let lifter = ChainLifter::new(
            vec![source_level0, source_level1],
            vec![target_level0.clone(), target_level1],
            0,
            vec![identity.clone()],
        );
        lifter.lift_through(1).unwrap();

        let images = lifter.images_at(1).expect("level 1 was lifted");
        assert_eq!(images.len(), 1);

        // d_G(phi(h_0)), expressed in target's F_0: push the image's terms
        // through target's own differential of the generator each acts on.
        let target_differentials = vec![target_level0.gb_entry(0)];
        let d_g_phi = images[0].subs(&target_differentials);

        // phi(d_F(h_0)): push h_0's differential forward along phi[0].
        let phi_d_f = d_h0.subs(&[identity]);

        let mut difference = d_g_phi;
        difference.add_assign(&phi_d_f);
        assert!(difference.is_zero(), "chain map condition must hold");
    }
}
