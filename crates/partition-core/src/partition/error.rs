use thiserror::Error;

use crate::tree::NodeId;

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
    #[error("node {0:?} is not part of the tree")]
    MissingNode(NodeId),
}
