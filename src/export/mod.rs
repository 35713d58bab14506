//! Dataverse export
//!
//! Maps a [`MetadataDocument`](crate::metadata::MetadataDocument) onto
//! Dataverse metadata blocks and uploads it, together with a snapshot of
//! the repository, to a collection.
//!
//! ```text
//! MetadataDocument ──LinkingTemplate──> MetadataBlock ─┐
//! Citation ────────────────────────────> MetadataBlock ─┼─> DataverseDataset ──DataverseClient──> collection
//! add_directory(root) ─────────────────> FileEntry (N) ─┘
//! ```

mod block;
mod citation;
mod client;
mod dataset;
mod linking;
mod schema;

pub use block::{Field, FieldValue, MetadataBlock, TypeClass};
pub use citation::{Author, Citation, Contact, Subject};
pub use client::{fetch_text, CreatedDataset, DataverseClient};
pub use dataset::{DataverseDataset, FileEntry, UploadReceipt, CITATION_BLOCK, EXCLUDED_DIRS};
pub use linking::{LinkingTemplate, ObjectLink};
pub use schema::{DataModelSchema, ObjectSchema, SCHEMA_VERSION};
