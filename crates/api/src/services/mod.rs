pub mod article;
pub mod category;
pub mod error;

#[cfg(test)]
pub mod test_utils;

pub use error::*;
