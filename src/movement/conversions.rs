use crate::model::{FibsemImage, Point};

use super::{MovementError, PixelCoordinate, Result};

/// Real-space offset of `coord` from the image centre, in metres.
///
/// The pixel coordinate is truncated to whole pixels. Image `y` grows
/// downward while stage `y` grows upward, hence the sign flip.
pub fn pixel_to_realspace(coord: PixelCoordinate, image: &FibsemImage) -> Result<Point> {
    let (height, width) = image.shape();
    let pixel_size = pixel_size_x(image)?;
    let dx_pixels = coord.col.trunc() - width as f64 / 2.0;
    let dy_pixels = coord.row.trunc() - height as f64 / 2.0;
    Ok(Point::new(dx_pixels * pixel_size, -dy_pixels * pixel_size))
}

/// Metadata pixel size, or field width over image width when the recorded
/// size is not positive.
pub fn pixel_size_x(image: &FibsemImage) -> Result<f64> {
    let metadata = image
        .metadata
        .as_ref()
        .ok_or(MovementError::MissingPixelSize)?;
    if metadata.pixel_size.x > 0.0 {
        return Ok(metadata.pixel_size.x);
    }
    let width = image.shape().1;
    let hfw = metadata.image_settings.hfw;
    if width > 0 && hfw > 0.0 {
        Ok(hfw / width as f64)
    } else {
        Err(MovementError::MissingPixelSize)
    }
}
