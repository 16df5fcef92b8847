use std::io;

#[derive(thiserror::Error, Debug)]
pub enum RefreshError {
    #[error("failed to fetch cluster state")]
    Fetch(#[source] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("neither APPDATA nor HOME is set")]
    NoHomeDir,
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize settings")]
    Serialize(#[source] serde_json::Error),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ApiError {
    #[error("unsupported cat API: {0}")]
    UnknownCatApi(String),
    #[error("unknown hot threads type: {0} (expected cpu, wait or block)")]
    UnknownHotThreadsType(String),
}
