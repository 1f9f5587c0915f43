// Adapters layer: concrete implementations of the domain ports (expression compiler, storage).

pub mod expression;
pub mod storage;
