//! The outer driver (spec §4.5): for each `(t, s)` in lex order, generate
//! critical pairs, collect and reduce S-elements, triangulate the cohort,
//! mint new generators for the survivors, and checkpoint the slice.

use crate::config::Config;
use crate::error::ResolverError;
use crate::presentation::Presentation;
use crate::resolution_level::ResolutionLevel;
use crate::sink::{encode_id, Sink};
use algebra::{combinatorics, MilnorElement, MilnorMonomial, ModElement, ModMonomial};
use maybe_rayon::prelude::*;
use once::OnceVec;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

pub struct Resolver<S: Sink> {
    levels: OnceVec<Arc<ResolutionLevel>>,
    config: Config,
    sink: Mutex<S>,
    cancel: Arc<AtomicBool>,
}

/// Seed one "single" critical pair per Milnor primitive `P(i, i+1)` acting
/// on a freshly minted generator. Level 0's relations come straight from the
/// module presentation (spec.md §4.5/§6 treat that as already-complete data
/// for the given truncation), but every generator minted by the engine
/// itself has no such external source, so it needs the generic primitives
/// seeded into its own level's pair store before that level can discover its
/// own Gröbner basis closure.
fn seed_primitive_singles(level: &ResolutionLevel, gen_index: usize, gen_degree: i32, t_max: i32) {
    for i in 0..=combinatorics::XI_MAX as u32 {
        let p = MilnorMonomial::p(i, i + 1);
        let degree = gen_degree + p.degree() as i32;
        if degree > t_max {
            continue;
        }
        level.pairs.add_single(gen_index, p, degree);
    }
}

impl<S: Sink> Resolver<S> {
    /// Seed level 0 from the user's module presentation: one generator per
    /// entry of `gen_degrees`, plus one `gb[0]` entry (and, to keep the
    /// `gb[s].len() == levels[s+1].num_generators()` invariant the rest of
    /// the engine relies on, one level-1 generator) per relation that
    /// doesn't reduce to zero against the relations before it.
    pub fn new(presentation: Presentation, config: Config, sink: S) -> Result<Self, ResolverError> {
        let levels = OnceVec::new();
        let level0 = Arc::new(ResolutionLevel::new(config.t_max));
        for &degree in &presentation.gen_degrees {
            level0.add_generator(degree);
        }
        let level1 = Arc::new(ResolutionLevel::new(config.t_max));

        let resolver = Self {
            levels,
            config,
            sink: Mutex::new(sink),
            cancel: Arc::new(AtomicBool::new(false)),
        };
        resolver.levels.push(level0.clone());
        resolver.levels.push(level1.clone());

        let mut sink_guard = resolver.sink.lock().unwrap();
        for relation in presentation.relations {
            let reduced = resolver.reduce(&level0, relation);
            if reduced.is_zero() {
                continue;
            }
            let lead = reduced.lead().unwrap();
            let leads = level0.leads_snapshot();
            let gen_deg = level0.gen_degree(lead.v() as usize);
            let t = lead.degree(gen_deg);

            let gen_index = level1.add_generator(t);
            let global_id = encode_id(1, gen_index as u64);
            let j = level0.add_gb_entry(reduced.clone());
            debug_assert_eq!(j, gen_index, "gb[0] and level 1 generators must stay in lockstep");
            level0.pairs.add(j, lead, gen_deg, &leads);
            seed_primitive_singles(&level1, gen_index, t, resolver.config.t_max);

            sink_guard.write_generator(global_id, 1, t)?;
            sink_guard.write_differential(global_id, &reduced)?;
        }
        drop(sink_guard);

        Ok(resolver)
    }

    /// A cooperative cancel token; check it is observed at the next slice
    /// boundary, not mid-slice.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    fn ensure_level(&self, s: usize) -> Arc<ResolutionLevel> {
        while self.levels.len() <= s {
            self.levels.push(Arc::new(ResolutionLevel::new(self.config.t_max)));
        }
        self.levels.at(s)
    }

    pub fn resolve(&self, mut progress: impl FnMut(u32, i32)) -> Result<(), ResolverError> {
        for t in 0..=self.config.t_max {
            let mut s = 0u32;
            while s as i32 <= t && (t - s as i32) <= self.config.stem_max {
                if self.cancel.load(AtomicOrdering::Relaxed) {
                    return Err(ResolverError::Cancelled { s, t });
                }
                self.process_slice(s, t)?;
                progress(s, t);
                s += 1;
            }
        }
        Ok(())
    }

    /// Reduce `element` against `level`'s Gröbner basis until its lead is no
    /// longer divisible or the element is zero.
    fn reduce(&self, level: &ResolutionLevel, mut element: ModElement) -> ModElement {
        loop {
            let Some(lead) = element.lead() else {
                return element;
            };
            let Some(k) = level.find_divisor(lead) else {
                return element;
            };
            let divisor_lead = level.lead(k);
            let quotient = lead.lead_divide(divisor_lead);
            let subtrahend = level.gb_entry(k).act(&MilnorElement::single(quotient));
            element.add_assign(&subtrahend);
        }
    }

    fn s_element(&self, level: &ResolutionLevel, pair: crate::critical_pair::CriticalPair) -> ModElement {
        match pair.i1 {
            // A single's `i2` is the *generator* index it acts on directly
            // (see `seed_primitive_singles`), not a `gb`/`leads` position.
            None => ModElement::single(ModMonomial::new(pair.m2, pair.i2 as u32)),
            Some(i1) => {
                let a = level.gb_entry(i1).act(&MilnorElement::single(pair.m1));
                let b = level.gb_entry(pair.i2).act(&MilnorElement::single(pair.m2));
                let mut result = a;
                result.add_assign(&b);
                result
            }
        }
    }

    /// Row-reduce a cohort of reduced S-elements so each surviving element
    /// has a lead not shared by another; order is block order on the lead,
    /// ties broken by original (pre-reduction) index.
    fn triangulate(elements: Vec<ModElement>) -> Vec<ModElement> {
        let mut survivors: Vec<ModElement> = Vec::new();
        'outer: for mut element in elements {
            loop {
                let Some(lead) = element.lead() else {
                    continue 'outer;
                };
                match survivors.iter().position(|s| s.lead() == Some(lead)) {
                    Some(pos) => {
                        let other = survivors[pos].clone();
                        element.add_assign(&other);
                    }
                    None => break,
                }
            }
            survivors.push(element);
        }
        survivors.sort_by_key(|e| e.lead());
        survivors
    }

    fn process_slice(&self, s: u32, t: i32) -> Result<(), ResolverError> {
        let level = self.ensure_level(s as usize);
        let next_level = self.ensure_level(s as usize + 1);

        let leads = level.leads_snapshot();
        level.pairs.minimize(t, &leads);
        let drained = level.pairs.drain(t);

        let s_elements: Vec<ModElement> = drained
            .maybe_into_par_iter()
            .map(|pair| self.s_element(&level, pair))
            .collect();
        let reduced: Vec<ModElement> = s_elements
            .maybe_into_par_iter()
            .map(|e| self.reduce(&level, e))
            .filter(|e| !e.is_zero())
            .collect();
        let minted = Self::triangulate(reduced);

        let mut sink = self.sink.lock().unwrap();
        for element in minted {
            let lead = element.lead().expect("triangulate only returns nonzero elements");
            let gen_index = next_level.add_generator(t);
            let global_id = encode_id(s + 1, gen_index as u64);
            let gen_deg = level.gen_degree(lead.v() as usize);
            let leads_now = level.leads_snapshot();
            let j = level.add_gb_entry(element.clone());
            level.pairs.add(j, lead, gen_deg, &leads_now);
            seed_primitive_singles(&next_level, gen_index, t, self.config.t_max);

            sink.write_generator(global_id, s + 1, t)?;
            sink.write_differential(global_id, &element)?;
        }
        sink.commit_slice(s, t)?;
        Ok(())
    }

    /// Read-only access to the underlying sink, e.g. for tests asserting on
    /// exactly what was persisted rather than just generator counts.
    pub fn with_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.sink.lock().unwrap())
    }

    pub fn level_generator_counts(&self) -> Vec<usize> {
        (0..self.levels.len()).map(|s| self.levels.at(s).num_generators()).collect()
    }

    /// `dim_Ext`-style introspection (SPEC_FULL §14): total minted
    /// generators across every homological degree computed so far.
    pub fn total_generators(&self) -> usize {
        (0..self.levels.len()).map(|s| self.levels.at(s).total_generators()).sum()
    }

    /// `dim_Gb`-style introspection (SPEC_FULL §14): total Gröbner basis
    /// size across every homological degree computed so far.
    pub fn total_gb_size(&self) -> usize {
        (0..self.levels.len()).map(|s| self.levels.at(s).total_gb_size()).sum()
    }
}
