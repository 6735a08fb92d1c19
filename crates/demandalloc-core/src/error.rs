//! Error types for demandalloc-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("pipe {pipe_id} references unknown node {node_id}")]
    UnknownNode { pipe_id: String, node_id: String },

    #[error("allocation cancelled")]
    Cancelled,

    #[error("worker failure: {0}")]
    Worker(String),
}
