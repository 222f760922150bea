use std::path::PathBuf;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors from composing a scene.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("no valid mount element provided: {0}")]
    InvalidMount(String),
    #[error("graphics acceleration unsupported by this environment")]
    GraphicsUnsupported,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            ComposeError::InvalidMount("nothing mounted".into()).to_string(),
            "no valid mount element provided: nothing mounted"
        );
        assert_eq!(
            ComposeError::GraphicsUnsupported.to_string(),
            "graphics acceleration unsupported by this environment"
        );
        let wrapped: ComposeError = ConfigError::Invalid("near must be positive".into()).into();
        assert_eq!(wrapped.to_string(), "invalid config: near must be positive");
    }
}
