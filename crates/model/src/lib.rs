pub mod catalog;
pub mod core;
pub mod filter;
pub mod pagination;
