//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a bill in the bill store.
pub type BillId = DatabaseId;
