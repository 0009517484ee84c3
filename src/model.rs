mod beam;
mod container;
mod error;
mod geometry;
mod mapping;
mod metadata;
mod native;
mod settings;
mod state;


pub use beam::{BeamSettings, BeamType};
pub use container::{FibsemImage, Pixel, PixelData, PixelType};
pub use error::{CoreError, Result};
pub use geometry::{FibsemRectangle, Point};
pub use mapping::{Mapping, MappingRecord};
pub use metadata::{FibsemImageMetadata, METADATA_VERSION};
pub use native::NativeImage;
pub use settings::{GammaSettings, ImageSettings, MillingSettings};
pub use state::{
    DEFAULT_COORDINATE_SYSTEM, MicroscopeState, MoveSettings, StagePosition, unix_timestamp,
};
