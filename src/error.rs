use std::path::PathBuf;

pub type DemoResult<T> = Result<T, DemoError>;

#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    #[error("failed to load texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("display error: {0}")]
    Display(String),

    #[error("failed to write frame {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl DemoError {
    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }
}
