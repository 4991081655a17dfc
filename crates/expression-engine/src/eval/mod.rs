mod binary;
pub mod closed;

pub use closed::Evaluator;
