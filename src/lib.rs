//! # report2sql
//!
//! Compiles declarative report requests into SQL `SELECT` text.
//!
//! A request names logical report fields and carries typed filter
//! descriptors; an externally produced mapping document binds each logical
//! field to a physical column and the join path needed to reach it. The
//! compiler resolves fields, builds a deduplicated dependency-ordered join
//! sequence, translates filters into predicate fragments and assembles one
//! statement:
//!
//! ```text
//! {fields, filters} ──► field resolution (mapping document)
//!                   ──► join resolution (dedup, dependency order)
//!                   ──► filter compilation (predicate fragments)
//!                   ──► SELECT ... FROM ... JOIN ... WHERE (1=1) AND (...)
//! ```
//!
//! The compiler is a pure text emitter: it never executes queries, never
//! parameterizes values and keeps no state across builds.
//!
//! # Example
//!
//! ```
//! use report2sql::{MappingDocument, QueryBuilder, ReportRequest};
//!
//! let mapping = MappingDocument::from_json_str(r#"{
//!     "fields": {
//!         "TtSampleDatum.upc": {
//!             "label": "UPC", "type": "varchar",
//!             "join": "TtSampleDatum", "field": "upc", "alias": "TtSampleDatum_upc"
//!         }
//!     },
//!     "joins": {
//!         "TtSampleDatum": {
//!             "type": "LEFT", "table": "tt_sample_data", "alias": "TtSampleDatum",
//!             "on": "id", "model": "TtSampleDatum", "field": "id"
//!         }
//!     }
//! }"#)?;
//!
//! let builder = QueryBuilder::new(mapping, "tt_sample_data", "TtSampleDatum");
//! let sql = builder.build(&ReportRequest::new(vec!["TtSampleDatum.upc"]))?;
//!
//! assert_eq!(
//!     sql,
//!     "SELECT TtSampleDatum.upc AS TtSampleDatum_upc \
//!      FROM tt_sample_data TtSampleDatum WHERE (1=1)"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod mapping;
pub mod request;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::builder::QueryBuilder;
    pub use crate::error::{BuildError, BuildResult};
    pub use crate::mapping::{
        load_mapping, FieldResolution, JoinDescriptor, JoinSource, JoinType, LoadError,
        MappingDocument, MappingError, RelJoin,
    };
    pub use crate::request::{
        Filter, FilterKind, FilterMeta, FilterValue, ReportRequest, Scalar,
    };
    pub use crate::sql::{Token, TokenStream};
}

// Also export the main entry points at crate root for convenience
pub use builder::QueryBuilder;
pub use error::{BuildError, BuildResult};
pub use mapping::{load_mapping, MappingDocument};
pub use request::{Filter, FilterKind, ReportRequest};
