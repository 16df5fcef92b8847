pub mod api;
pub mod client;
pub mod payloads;

pub use api::{CatApi, HotThreadsRequest, HotThreadsType};
pub use client::EsClient;
pub use payloads::ClusterPayloads;
