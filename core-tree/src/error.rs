use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Unknown record type: {type_tag}")]
    UnknownRecordType { type_tag: String },

    #[error("Record {name:?} is missing required field {field}")]
    MissingField { name: String, field: &'static str },

    #[error("Invalid ModifiedClient timestamp {value:?}")]
    Timestamp { value: String },

    #[error("Invalid document state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, TreeError>;
