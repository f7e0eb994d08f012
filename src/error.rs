//! Errors raised while configuring a tree. Lookups that miss are not errors; they return `None`.

use thiserror::Error;

/// Result type alias for tree construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A [`BTree`](crate::btree::BTree) needs an order of at least 2 so that a split leaves
    /// both halves with at least one key.
    #[error("invalid B-tree order {order}: the minimum order is 2")]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },
}
