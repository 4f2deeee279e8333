//! Error types for xslt3-service
//!
//! These are faults: failures the engine did not explain through
//! diagnostics. Validation problems and diagnostics never become an `Error`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] xslt_engine_traits::Error),

    #[error("failed to stage auxiliary file {name}: {source}")]
    AuxiliaryFile {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("transformation task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;
