mod api;
mod error;
mod tiff;
mod util;


pub use api::{load_image, save_image, supported_formats};
pub use error::{IoError, Result};
