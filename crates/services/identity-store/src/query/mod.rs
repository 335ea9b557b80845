//! Hand-built join statements.
//!
//! The stores use SeaORM's typed API for single-table work. Two-table joins
//! are rendered here as explicit SQL text and run through the raw statement
//! entry points, with every value bound as a positional parameter.

mod related;

pub use related::{placeholder, Join, RelatedQuery, TableSpec};
