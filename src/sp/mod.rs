pub mod error;
pub mod itemset;

pub use error::ItemsetError;
pub use itemset::{checked_index, Itemset};
