use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error
{
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    },

    #[error("y = {y} mm is out of reach of the arm")]
    Unreachable { y: f64 },

    #[error("servo did not settle at {target} degrees within {iterations} polls")]
    NotConverged { target: f64, iterations: u32 },

    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: image::ImageError
    }
}

impl Error
{
    /// True for failures reported by the render surface
    pub fn is_render_failure(&self) -> bool
    {
        matches!(self, Error::Render {..})
    }
}

pub type Result<T> = std::result::Result<T, Error>;
