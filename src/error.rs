pub type TrajplotResult<T> = Result<T, TrajplotError>;

#[derive(thiserror::Error, Debug)]
pub enum TrajplotError {
    #[error("data error: {0}")]
    Data(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrajplotError {
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TrajplotError::data("x").to_string().contains("data error:")
        );
        assert!(
            TrajplotError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            TrajplotError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            TrajplotError::encode("x")
                .to_string()
                .contains("encode error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = TrajplotError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
