use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Please choose a PDF file first.")]
    NoFileSelected,

    #[error("Please drop a valid PDF file.")]
    NotAPdf { name: String, media_type: String },

    #[error("{tool} not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    ToolNotFound { tool: String },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("PDF rendering failed: {0}")]
    RenderFailed(String),

    #[error("failed to decode rendered page: {0}")]
    Decode(#[from] image::ImageError),

    #[error("cropped region is empty ({width}x{height}); check the crop coordinates")]
    EmptySurface { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CropError {
    /// Input mistakes reported to the user as a notice. They abort the
    /// operation before any state changes.
    pub fn is_user_notice(&self) -> bool {
        matches!(self, CropError::NoFileSelected | CropError::NotAPdf { .. })
    }
}
