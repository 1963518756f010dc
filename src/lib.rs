//! Minimal free resolutions over the mod-2 Steenrod algebra, organized by
//! Adams `(s, t)` bigrading, and the chain-lifting engine that derives
//! multiplicative structure on the Adams E2 page from them.
//!
//! This crate is the core engine only: a module-presentation generator
//! (S⁰, RPⁿ, X⟨2⟩, tmf, JSON-loaded CW complexes), the relational
//! persistence layer, and the Adams-chart/homotopy post-processing are all
//! external collaborators whose contracts are stated in [`sink`] and
//! [`presentation`], not implemented here.

pub mod chain_lifter;
pub mod config;
pub mod critical_pair;
pub mod error;
pub mod presentation;
pub mod resolution_level;
pub mod resolver;
pub mod sink;

pub use chain_lifter::ChainLifter;
pub use config::Config;
pub use error::ResolverError;
pub use presentation::Presentation;
pub use resolution_level::ResolutionLevel;
pub use resolver::Resolver;
pub use sink::{InMemorySink, Sink};

/// Render generator counts per homological degree the way the teacher's
/// `graded_dimension_string` does: one unicode digit per count, one line
/// per `s`. Single digits use the Unicode "fullwidth digit" block so the
/// output lines up in a monospace terminal; counts ≥ 10 fall back to plain
/// decimal in brackets.
pub fn graded_dimension_string(counts: &[usize]) -> String {
    let mut out = String::new();
    for (s, &count) in counts.iter().enumerate() {
        if s > 0 {
            out.push('\n');
        }
        out.push_str(&format!("s={s}: "));
        if count < 10 {
            let digit = char::from_u32(0xFF10 + count as u32).unwrap();
            out.push(digit);
        } else {
            out.push_str(&format!("[{count}]"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graded_dimension_string_one_line_per_s() {
        let s = graded_dimension_string(&[1, 2, 0]);
        assert_eq!(s.lines().count(), 3);
    }
}
