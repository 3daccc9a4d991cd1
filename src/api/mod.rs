mod types;
mod client;
mod error;

pub use types::*;
pub use client::{PlanClient, TimetableService};
pub use error::{FetchError, FetchResult};
