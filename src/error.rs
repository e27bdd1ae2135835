use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApportionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project not initialized. Run 'apportion init' first.")]
    NotInitialized,

    #[error("Project already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Index {index} out of range for ledger of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid percent: {0} (must be between 0 and 100)")]
    InvalidPercent(f64),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Unauthorized: the backend rejected the access token")]
    Unauthorized,

    #[error("Failed to create tasks: {0}")]
    BulkCreate(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ApportionError>;
