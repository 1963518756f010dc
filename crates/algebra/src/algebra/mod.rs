pub mod combinatorics;
pub mod milnor;
pub mod module_element;
mod product;
