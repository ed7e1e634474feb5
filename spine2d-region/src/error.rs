use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse Spine atlas: {message}")]
    AtlasParse { message: String },

    #[error("unknown atlas region: {name}")]
    UnknownRegion { name: String },

    #[error("atlas region '{region}' references missing page {page}")]
    UnknownPage { region: String, page: usize },

    #[error("invalid value: {message}")]
    InvalidValue { message: String },
}
