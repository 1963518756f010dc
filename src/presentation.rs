//! The module-presentation input (spec §6): generator degrees plus
//! relations, supplied by an external presentation generator (S⁰, RPⁿ,
//! X⟨2⟩, tmf, or a JSON-loaded CW complex) — all out of this core's scope,
//! per spec.md §9's "replace dynamic dispatch over complex types with a
//! single presentation type" note. This is that single type.

use algebra::{MilnorMonomial, ModElement, ModMonomial};
use serde::Deserialize;
use std::error::Error;
use std::fmt;

#[derive(Clone, Debug)]
pub struct Presentation {
    pub gen_degrees: Vec<i32>,
    pub relations: Vec<ModElement>,
}

#[derive(Debug)]
pub struct PresentationError {
    detail: String,
}

impl fmt::Display for PresentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid module presentation: {}", self.detail)
    }
}

impl Error for PresentationError {}

/// The on-disk JSON shape: `{"gens": [0, 1, 3], "relations": [[[xi_exps, v],
/// ...], ...]}`, mirroring the teacher's `construct_from_json` input style
/// (a flat JSON document, no schema registry).
#[derive(Deserialize)]
struct RawPresentation {
    gens: Vec<i32>,
    relations: Vec<Vec<(Vec<u32>, u32)>>,
}

impl Presentation {
    pub fn new(gen_degrees: Vec<i32>, relations: Vec<ModElement>) -> Result<Self, PresentationError> {
        for relation in &relations {
            for term in relation.terms() {
                if term.v() as usize >= gen_degrees.len() {
                    return Err(PresentationError {
                        detail: format!(
                            "relation refers to generator {} but only {} generators exist",
                            term.v(),
                            gen_degrees.len()
                        ),
                    });
                }
            }
        }
        Ok(Self {
            gen_degrees,
            relations,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, Box<dyn Error>> {
        let raw: RawPresentation = serde_json::from_str(text)?;
        let relations = raw
            .relations
            .into_iter()
            .map(|terms| {
                let monomials = terms
                    .into_iter()
                    .map(|(exponents, v)| ModMonomial::new(MilnorMonomial::from_exponents(&exponents), v))
                    .collect();
                ModElement::from_terms(monomials)
            })
            .collect();
        Ok(Self::new(raw.gens, relations)?)
    }
}
