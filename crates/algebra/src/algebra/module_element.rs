//! Monomials and elements of a free module over the mod 2 Steenrod algebra,
//! i.e. `A`-multiples of a chosen generator `v_k` of the ambient free module.
//!
//! A [`ModMonomial`] packs a [`MilnorMonomial`] together with a generator
//! index into one word: the top 12 bits hold the bitwise complement of the
//! generator index, the rest hold the Milnor monomial. Complementing the
//! index means a *smaller* generator index sorts as a *larger* packed value,
//! which is what gives the earliest-introduced generator priority as a
//! leading term when comparing monomials as raw integers — the same
//! convention the bit-packed Milnor engine this crate's packing follows uses
//! for its free-module basis elements.

use super::milnor::{MilnorElement, MilnorMonomial};
use std::cmp::Ordering;

const MMOD_BASIS_BITS: u32 = 12;
const MMOD_MASK_M: u64 = (1u64 << (64 - MMOD_BASIS_BITS)) - 1;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModMonomial {
    data: u64,
}

impl ModMonomial {
    pub fn new(m: MilnorMonomial, v: u32) -> Self {
        Self {
            data: m.raw() + ((!(v as u64)) << (64 - MMOD_BASIS_BITS)),
        }
    }

    pub fn m(self) -> MilnorMonomial {
        MilnorMonomial::from_raw(self.data & MMOD_MASK_M)
    }

    pub fn v(self) -> u32 {
        (!self.data >> (64 - MMOD_BASIS_BITS)) as u32
    }

    pub fn degree(self, gen_degree: i32) -> i32 {
        self.m().degree() as i32 + gen_degree
    }

    /// Left-multiply by a Milnor monomial known to be disjoint from `self`'s
    /// Milnor part.
    pub fn lead_act(self, by: MilnorMonomial) -> Self {
        Self::new(by.lead_product(self.m()), self.v())
    }

    pub fn lead_divides(self, rhs: Self) -> bool {
        self.v() == rhs.v() && self.m().lead_divides(rhs.m())
    }

    pub fn lead_divide(self, rhs: Self) -> MilnorMonomial {
        debug_assert_eq!(self.v(), rhs.v());
        self.m().lead_divide(rhs.m())
    }
}

impl PartialOrd for ModMonomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModMonomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.data.cmp(&other.data)
    }
}

impl std::fmt::Debug for ModMonomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModMonomial(v{}, {:?})", self.v(), self.m())
    }
}

/// A linear combination of free-module monomials over `F_2`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModElement {
    terms: Vec<ModMonomial>,
}

impl ModElement {
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn single(m: ModMonomial) -> Self {
        Self { terms: vec![m] }
    }

    /// Build an element from raw terms, canceling any duplicates (mod 2) and
    /// sorting into block order. Used when the terms come from outside
    /// already-normalized arithmetic, e.g. parsing a module presentation.
    pub fn from_terms(terms: Vec<ModMonomial>) -> Self {
        let mut element = ModElement::zero();
        for term in terms {
            element.add_assign(&ModElement::single(term));
        }
        element
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[ModMonomial] {
        &self.terms
    }

    pub fn lead(&self) -> Option<ModMonomial> {
        self.terms.iter().copied().max()
    }

    pub fn add_assign(&mut self, rhs: &ModElement) {
        let mut result = Vec::with_capacity(self.terms.len() + rhs.terms.len());
        let mut a: Vec<ModMonomial> = self.terms.clone();
        a.sort();
        let mut b: Vec<ModMonomial> = rhs.terms.clone();
        b.sort();
        let mut i = 0;
        let mut j = 0;
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => {
                    result.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    result.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        result.extend_from_slice(&a[i..]);
        result.extend_from_slice(&b[j..]);
        self.terms = result;
    }

    /// Act on this element by a Milnor algebra element, `a . self`.
    pub fn act(&self, a: &MilnorElement) -> ModElement {
        let mut result = ModElement::zero();
        for &term in &self.terms {
            for &factor in a.terms() {
                let product = factor.multiply(term.m());
                let mut contribution = ModElement {
                    terms: product
                        .terms()
                        .iter()
                        .map(|&m| ModMonomial::new(m, term.v()))
                        .collect(),
                };
                contribution.terms.sort();
                result.add_assign(&contribution);
            }
        }
        result
    }

    /// Substitute each generator `v_k` for the `ModElement` `images[k]`,
    /// acting the Milnor part of each term on the corresponding image. This
    /// is the operation a chain map uses to push a relation on the source
    /// module forward along a partial lift.
    pub fn subs(&self, images: &[ModElement]) -> ModElement {
        let mut result = ModElement::zero();
        for &term in &self.terms {
            let image = &images[term.v() as usize];
            let acted = image.act(&MilnorElement::single(term.m()));
            result.add_assign(&acted);
        }
        result
    }
}

mod save_impl {
    use super::{ModElement, ModMonomial};
    use saveload::{Load, Save};
    use std::io::{self, Read, Write};

    impl Save for ModMonomial {
        fn save(&self, buffer: &mut impl Write) -> io::Result<()> {
            self.data.save(buffer)
        }
    }

    impl Load for ModMonomial {
        type AuxData = ();

        fn load(buffer: &mut impl Read, _: &()) -> io::Result<Self> {
            let data = u64::load(buffer, &())?;
            Ok(ModMonomial { data })
        }
    }

    /// Little-endian sequence of `ModMonomial`s in block order, with no
    /// length prefix or separators (spec §6: the blob's byte length implies
    /// the term count).
    impl Save for ModElement {
        fn save(&self, buffer: &mut impl Write) -> io::Result<()> {
            let mut terms = self.terms.clone();
            terms.sort();
            for term in terms {
                term.save(buffer)?;
            }
            Ok(())
        }
    }

    impl Load for ModElement {
        type AuxData = ();

        /// There is no length prefix, so terms are read until the buffer is
        /// exhausted at a term boundary (a zero-byte read on the first byte
        /// of a term); a short read partway through a term is an error.
        fn load(buffer: &mut impl Read, _: &()) -> io::Result<Self> {
            let mut terms = Vec::new();
            loop {
                let mut first = [0u8; 1];
                if buffer.read(&mut first)? == 0 {
                    break;
                }
                let mut rest = [0u8; 7];
                buffer.read_exact(&mut rest)?;
                let mut bytes = [0u8; 8];
                bytes[0] = first[0];
                bytes[1..].copy_from_slice(&rest);
                terms.push(ModMonomial {
                    data: u64::from_le_bytes(bytes),
                });
            }
            Ok(ModElement { terms })
        }
    }
}
