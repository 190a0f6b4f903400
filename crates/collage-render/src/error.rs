#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot decode image for {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },
    #[error("image encode failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("invalid font data for {family:?}")]
    InvalidFont { family: String },
    #[error("canvas {width}x{height} is too large to render")]
    CanvasTooLarge { width: u32, height: u32 },
    #[error("unknown export format {0:?}, expected png or jpeg")]
    UnknownFormat(String),
}
