// Content catalog and cluster table — the two inputs of the related mapper.

pub mod clusters;
pub mod models;

pub use clusters::{Cluster, ClusterTable};
pub use models::{Catalog, ContentItem};
