// One error type for the whole program.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed

    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: usize, height: usize }, // Zero-sized or oversized drawing area

    #[error("failed to read config '{path}': {source}")]
    ConfigRead { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config '{path}': {source}")]
    ConfigParse { path: PathBuf, source: serde_yaml::Error },

    #[error("invalid color '{0}': expected #RRGGBB")]
    ColorParse(String),

    #[error("failed to write snapshot '{path}': {source}")]
    Snapshot { path: PathBuf, source: image::ImageError },
}
