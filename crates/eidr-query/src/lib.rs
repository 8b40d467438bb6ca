//! Query compilation and response resolution for the EIDR registry.
//!
//! This crate is the synchronous core of the connector. It has no I/O:
//!
//! - [`query`] compiles structured queries into the registry's expression
//!   language.
//! - [`resolve`] plans resolve calls and turns parsed registry documents
//!   into predictable records.
//! - [`normalize`] lifts scalar leaves at known paths into `{ "value" }`
//!   records.
//!
//! # Example
//!
//! ```
//! use eidr_query::query::compile_json;
//! use serde_json::json;
//!
//! let expr = compile_json(&json!({"reftype": {"exact": "Movie"}})).unwrap();
//! assert_eq!(expr, "(/FullMetadata/BaseObjectData/ReferentType IS \"Movie\")");
//! ```

pub mod error;
pub mod expression;
pub mod id;
pub mod normalize;
pub mod query;
pub mod resolve;

pub use error::{EidrError, ErrorKind, Result};
pub use query::{compile, compile_json, Query, QueryNode};
pub use resolve::{extract_query_results, QueryResults, ResolutionPlan, ResultFormat, View};
