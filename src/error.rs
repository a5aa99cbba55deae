use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Missing element: no <{path}> found in domain XML")]
    MissingElement { path: String },
    #[error("XML error: {0}")]
    Xml(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn missing(path: impl Into<String>) -> Self {
        AppError::MissingElement { path: path.into() }
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::Xml(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for AppError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        AppError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for AppError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        AppError::Xml(err.to_string())
    }
}
