use image::{DynamicImage, ImageBuffer, Luma};
use ndarray::Array2;

use super::{CoreError, FibsemImage, FibsemImageMetadata, PixelData, Result};

/// An image object handed over by an acquisition backend.
///
/// Implementations copy their samples out; the resulting [`FibsemImage`] never
/// borrows from the source.
pub trait NativeImage {
    fn to_pixel_data(&self) -> Result<PixelData>;
}

fn luma_to_array<T>(buffer: &ImageBuffer<Luma<T>, Vec<T>>) -> Result<Array2<T>>
where
    T: image::Primitive,
{
    let (width, height) = buffer.dimensions();
    let values = buffer.as_raw().clone();
    Ok(Array2::from_shape_vec(
        (height as usize, width as usize),
        values,
    )?)
}

impl NativeImage for ImageBuffer<Luma<u8>, Vec<u8>> {
    fn to_pixel_data(&self) -> Result<PixelData> {
        Ok(PixelData::U8(luma_to_array(self)?))
    }
}

impl NativeImage for ImageBuffer<Luma<u16>, Vec<u16>> {
    fn to_pixel_data(&self) -> Result<PixelData> {
        Ok(PixelData::U16(luma_to_array(self)?))
    }
}

impl NativeImage for DynamicImage {
    fn to_pixel_data(&self) -> Result<PixelData> {
        match self {
            DynamicImage::ImageLuma8(buffer) => buffer.to_pixel_data(),
            DynamicImage::ImageLuma16(buffer) => buffer.to_pixel_data(),
            other => Err(CoreError::UnsupportedChannels {
                channels: usize::from(other.color().channel_count()),
            }),
        }
    }
}

impl FibsemImage {
    pub fn from_native(
        native: &impl NativeImage,
        metadata: Option<FibsemImageMetadata>,
    ) -> Result<Self> {
        Ok(Self::from_pixels(native.to_pixel_data()?, metadata))
    }
}
