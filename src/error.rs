use thiserror::Error;

#[derive(Debug, Error)]
pub enum OvonAgentError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("forward error: {0}")]
    Forward(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, OvonAgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_are_distinguishable() {
        let decode = OvonAgentError::Decode("bad json".to_string());
        let forward = OvonAgentError::Forward("peer down".to_string());
        assert!(format!("{decode}").contains("decode error"));
        assert!(format!("{forward}").contains("forward error"));
    }
}
