//! Adapter contract, registry, and built-in adapters for the per-source
//! metadata crawl: each adapter maps one `Identifier` to a `SourceRecord`
//! by issuing HTTP through the shared `netclient::Client` and extracting
//! whatever fields it supports.

pub mod adapter;
pub mod builtin;
pub mod error;
pub mod identifier;
pub mod record;
pub mod registry;

pub use adapter::{FetchContext, SourceAdapter};
pub use error::AdapterError;
pub use identifier::{Identifier, IdentifierError};
pub use record::{Provenance, SourceRecord, SourceRecordBuilder};
pub use registry::AdapterRegistry;
