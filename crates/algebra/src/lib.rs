//! The mod 2 Steenrod algebra, its Milnor basis, and free module elements
//! over it.
//!
//! Everything here works over `F_2`: a basis element either appears in an
//! element or it doesn't, so "coefficient 1" is implicit throughout and
//! addition is always symmetric difference. This is the one simplification
//! the bit-packed monomial representation buys: there is no need to carry a
//! separate coefficient vector alongside a basis index the way an odd-prime
//! or non-bit-packed implementation would.

pub mod algebra;

pub use algebra::combinatorics;
pub use algebra::milnor::{MilnorElement, MilnorMonomial};
pub use algebra::module_element::{ModElement, ModMonomial};
