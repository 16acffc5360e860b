use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemsetError {
    #[error("Index out of range: index {index}, size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Index out of range: index {index}, size {size}")]
    NegativeIndex { index: isize, size: usize },
}
