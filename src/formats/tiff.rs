use std::fs::File;
use std::path::Path;

use crate::model::{FibsemImage, FibsemImageMetadata, MappingRecord, PixelData};
use log::{debug, warn};
use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::Tag;

use super::util::{decode_description, encode_description};
use super::{IoError, Result};

pub(crate) fn read_tiff(path: &Path) -> Result<FibsemImage> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(file)?;
    let (width, height) = decoder.dimensions()?;
    let description = decoder
        .find_tag(Tag::ImageDescription)?
        .map(|value| value.into_string())
        .transpose()?;

    let shape = (height as usize, width as usize);
    let data = match decoder.read_image()? {
        DecodingResult::U8(buffer) => {
            check_single_channel(buffer.len(), shape)?;
            PixelData::U8(Array2::from_shape_vec(shape, buffer)?)
        }
        DecodingResult::U16(buffer) => {
            check_single_channel(buffer.len(), shape)?;
            PixelData::U16(Array2::from_shape_vec(shape, buffer)?)
        }
        DecodingResult::F32(buffer) => {
            check_single_channel(buffer.len(), shape)?;
            PixelData::F32(Array2::from_shape_vec(shape, buffer)?)
        }
        _ => {
            return Err(IoError::UnsupportedLayout(
                "TIFF samples must be u8, u16 or f32".to_string(),
            ));
        }
    };
    if decoder.more_images() {
        debug!(
            "{}: ignoring additional TIFF pages after the first",
            path.display()
        );
    }

    let metadata = match description.as_deref().and_then(decode_description) {
        Some(mapping) => Some(FibsemImageMetadata::from_mapping(&mapping)?),
        None => None,
    };
    if let Some(metadata) = &metadata {
        if !metadata.is_current_version() {
            warn!(
                "{}: metadata version `{}` differs from expected `{}`",
                path.display(),
                metadata.version,
                crate::model::METADATA_VERSION
            );
        }
    }

    Ok(FibsemImage { data, metadata })
}

fn check_single_channel(samples: usize, (height, width): (usize, usize)) -> Result<()> {
    if samples != height * width {
        return Err(IoError::UnsupportedLayout(format!(
            "expected a single-channel {width}x{height} page, found {samples} samples"
        )));
    }
    Ok(())
}

pub(crate) fn write_tiff(path: &Path, image: &FibsemImage) -> Result<()> {
    let (height, width) = image.shape();
    let height = u32::try_from(height)
        .map_err(|_| IoError::UnsupportedLayout(format!("image height {height} exceeds TIFF limits")))?;
    let width = u32::try_from(width)
        .map_err(|_| IoError::UnsupportedLayout(format!("image width {width} exceeds TIFF limits")))?;
    let description = match &image.metadata {
        Some(metadata) => Some(encode_description(&metadata.to_value()?)?),
        None => None,
    };

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(file)?;

    match &image.data {
        PixelData::U8(data) => {
            let page = data.iter().copied().collect::<Vec<_>>();
            let mut page_encoder = encoder.new_image::<colortype::Gray8>(width, height)?;
            if let Some(description) = &description {
                page_encoder
                    .encoder()
                    .write_tag(Tag::ImageDescription, description.as_str())?;
            }
            page_encoder.write_data(&page)?;
        }
        PixelData::U16(data) => {
            let page = data.iter().copied().collect::<Vec<_>>();
            let mut page_encoder = encoder.new_image::<colortype::Gray16>(width, height)?;
            if let Some(description) = &description {
                page_encoder
                    .encoder()
                    .write_tag(Tag::ImageDescription, description.as_str())?;
            }
            page_encoder.write_data(&page)?;
        }
        PixelData::F32(data) => {
            let page = data.iter().copied().collect::<Vec<_>>();
            let mut page_encoder = encoder.new_image::<colortype::Gray32Float>(width, height)?;
            if let Some(description) = &description {
                page_encoder
                    .encoder()
                    .write_tag(Tag::ImageDescription, description.as_str())?;
            }
            page_encoder.write_data(&page)?;
        }
    }
    Ok(())
}
