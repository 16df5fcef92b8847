pub mod changes;
pub mod cluster;
pub mod index;
pub mod node;
pub mod paginator;
pub mod shard;

pub use changes::ClusterChanges;
pub use cluster::{Cluster, ClusterStatus};
pub use index::{Index, IndexState};
pub use node::Node;
pub use paginator::{Page, Paginator};
pub use shard::{Shard, ShardState};
