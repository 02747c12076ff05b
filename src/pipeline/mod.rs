//! Pure list transforms applied around enrichment: filtering, sorting,
//! field projection and re-pagination.
//!
//! None of these touch the network or the cache. Invalid caller input
//! (non-numeric range bound, unknown sort field, out-of-range page) is a
//! [`BadRequest`](crate::HolonetError::BadRequest).

mod filter;
mod project;
mod sort;

pub use filter::{FilterParams, Filters};
pub use project::{paginate, parse_csv, project, project_all, PageWindow, MAX_PAGE_SIZE};
pub use sort::{sort_records, SortOrder};
