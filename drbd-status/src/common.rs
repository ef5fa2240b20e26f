/// Contains constants shared by the parsers and the evaluator.
pub mod constants;
/// Contains the error types returned by the parsers.
pub mod error;
