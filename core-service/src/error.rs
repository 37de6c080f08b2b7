use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    #[error("Tree error: {0}")]
    Tree(#[from] core_tree::TreeError),

    #[error("Sync error: {0}")]
    Sync(#[from] core_sync::SyncError),

    #[error("No item with id {0} in the current tree")]
    ItemNotFound(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
