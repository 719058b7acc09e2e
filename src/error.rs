//! Error types
//!
//! Each concern gets its own enum. Callers that can recover (pool exhaustion,
//! corrupt save data) log and fall back; the binary propagates the rest.

use std::path::PathBuf;

use thiserror::Error;

/// Object pool failures. Neither variant is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No available instance and the pool may not grow
    #[error("object pool exhausted ({capacity} slots, growth disabled)")]
    Exhausted { capacity: usize },
    /// Handle was never issued, already released, or belongs to an older generation
    #[error("handle {index}:{generation} is not checked out of this pool")]
    NotInUse { index: u32, generation: u32 },
}

/// Save file failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid high score {value:?} in {}", .path.display())]
    InvalidScore { path: PathBuf, value: String },
    #[error("malformed leaderboard line {line}: {content:?}")]
    InvalidEntry { line: usize, content: String },
}

impl PersistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Kind of asset held by the resource registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Font,
    Texture,
    Sound,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ResourceKind::Font => "font",
            ResourceKind::Texture => "texture",
            ResourceKind::Sound => "sound",
        })
    }
}

/// Asset lookup and loading failures
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: ResourceKind, name: String },
    #[error("failed to load {kind} {name:?} from {}: {source}", .path.display())]
    Load {
        kind: ResourceKind,
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings file failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("i/o error on settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = PoolError::Exhausted { capacity: 4 };
        assert_eq!(err.to_string(), "object pool exhausted (4 slots, growth disabled)");

        let err = ResourceError::NotFound {
            kind: ResourceKind::Font,
            name: "main".into(),
        };
        assert_eq!(err.to_string(), "font not found: main");
    }
}
