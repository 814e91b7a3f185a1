use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionSetError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error("Corrupted file. 0 regions found in the file: {0}")]
    EmptyRegionSet(String),

    #[error("Missing column {column} in record: {record}")]
    MissingColumn { column: usize, record: String },

    #[error("Invalid strand '{0}', expected '+' or '-'")]
    InvalidStrand(String),

    #[error("Classification code of peak '{0}' is not an integer")]
    InvalidClassCode(String),

    #[error("Can't derive a sample id from file name: {0}")]
    InvalidSampleName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type RegionSetResult<T> = std::result::Result<T, RegionSetError>;
