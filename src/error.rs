use camino::Utf8PathBuf;
use quick_xml::errors::serialize::{DeError, SeError};
use thiserror::Error;

/// Errors raised by the record store, the XML codec and the preset resolver.
///
/// Every error is local to the operation that produced it: a failed call
/// never leaves a store partially modified.
#[derive(Error, Debug)]
pub enum TypesError {
    #[error("Malformed types.xml: {0}")]
    MalformedXml(String),

    #[error("Type '{0}' already exists")]
    DuplicateName(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Type name is required and must not start or end with whitespace")]
    InvalidName,

    #[error("Failed to write types.xml: {0}")]
    Serialize(String),

    #[error("Nothing to export: add at least one type first")]
    EmptyExport,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<quick_xml::Error> for TypesError {
    fn from(e: quick_xml::Error) -> Self {
        TypesError::MalformedXml(e.to_string())
    }
}

impl From<DeError> for TypesError {
    fn from(e: DeError) -> Self {
        TypesError::MalformedXml(e.to_string())
    }
}

impl From<SeError> for TypesError {
    fn from(e: SeError) -> Self {
        TypesError::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TypesError>;
