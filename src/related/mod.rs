// Related-content mapping — which articles link to which.

pub mod mapper;

pub use mapper::{build_related_map, RelatedMap, MAX_RELATED};
