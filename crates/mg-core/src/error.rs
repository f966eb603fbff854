use crate::id::NodeId;
use thiserror::Error;

/// Failure of a scene mutation. Only edits that target a specific node can fail;
/// every other mutation degrades to a no-op.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot msgpack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    #[error("snapshot msgpack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}
