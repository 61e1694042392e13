use std::fmt;

pub type Result<T> = std::result::Result<T, LevelError>;

#[derive(Debug)]
pub enum LevelError {
    /// Body extents must be strictly positive on both axes.
    InvalidSize { width: i32, height: i32 },
    InvalidFlicker { duration: f32, interval: f32 },
    Config(serde_json::Error),
    InvalidTileGrid(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::InvalidSize { width, height } => {
                write!(f, "invalid body size {}x{}: both extents must be positive", width, height)
            }
            LevelError::InvalidFlicker { duration, interval } => write!(
                f,
                "invalid flicker (duration {}, interval {}): both must be larger than 0",
                duration, interval
            ),
            LevelError::Config(e) => write!(f, "failed to parse config: {}", e),
            LevelError::InvalidTileGrid(msg) => write!(f, "invalid tile grid: {}", msg),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Config(e)
    }
}
