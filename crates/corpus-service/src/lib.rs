//! The Corpus document service.
//!
//! This crate orchestrates the two halves of the split-storage model: on
//! create/update it validates content at the boundary, writes an immutable
//! snapshot to the version store, then swaps the metadata row's
//! current-version pointer; on read it joins metadata (identity, filtering)
//! with the version store (content at the current hash).
//!
//! # Ordering guarantee
//!
//! Within `update` and `restore`, the version write always happens before
//! the pointer swap. A crash between the two leaves an orphaned version
//! record (harmless, reclaimable) and a document still pointing at its
//! previous valid version — never a pointer at a hash that doesn't exist.
//!
//! # Error boundary
//!
//! Backend error types never cross this crate's public surface; they are
//! translated into the [`ServiceError`] taxonomy (`NotFound`, `Conflict`,
//! `Corrupt`, `Validation`, `Unavailable`).

pub mod clock;
pub mod content;
pub mod document;
pub mod error;
pub mod filter;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use content::{ContentFormat, ContentPatch, DocumentContent};
pub use document::{Document, DocKey, NewDocument, VersionSummary};
pub use error::{ServiceError, ServiceResult};
pub use filter::{ListFilter, Page, SortKey, StatusFilter};
pub use service::DocumentService;
