use thiserror::Error;

#[derive(Debug, Error)]
pub enum SidecarError {
    #[error("invalid custom template: {0}")]
    InvalidTemplate(#[from] templating::TemplateError),

    #[error("custom template did not render well-formed xml: {0}")]
    MalformedCustomTemplate(String),

    #[error("xml generation failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("io error writing sidecar: {0}")]
    Io(#[from] std::io::Error),

    #[error("record failed minimum-field validation: {0}")]
    Validation(String),
}
