//! File operations against the remote contents store
//!
//! Each operation is stateless and constructed per request around an
//! injected `ContentsApi`.

pub mod file_reader;
pub mod file_upsert;

pub use file_reader::{FileFetchOperation, FileListOperation};
pub use file_upsert::FileUpsertOperation;
