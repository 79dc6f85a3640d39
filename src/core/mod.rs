/*!
# Core Module

Error handling shared by every pass of the pipeline.
*/

pub mod errors;

pub use errors::{Production, SeqError, SeqResult};
