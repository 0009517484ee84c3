use ndarray::{Array2, ArrayD, Ix2};

use super::{CoreError, FibsemImageMetadata, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    U8,
    U16,
    F32,
}

/// Sample types a [`FibsemImage`] can hold.
pub trait Pixel: Copy + 'static {
    fn wrap(data: Array2<Self>) -> PixelData;
}

impl Pixel for u8 {
    fn wrap(data: Array2<Self>) -> PixelData {
        PixelData::U8(data)
    }
}

impl Pixel for u16 {
    fn wrap(data: Array2<Self>) -> PixelData {
        PixelData::U16(data)
    }
}

impl Pixel for f32 {
    fn wrap(data: Array2<Self>) -> PixelData {
        PixelData::F32(data)
    }
}

/// Single-channel pixel buffer indexed `[row, col]`.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    U8(Array2<u8>),
    U16(Array2<u16>),
    F32(Array2<f32>),
}

impl<T: Pixel> From<Array2<T>> for PixelData {
    fn from(data: Array2<T>) -> Self {
        T::wrap(data)
    }
}

impl PixelData {
    pub fn pixel_type(&self) -> PixelType {
        match self {
            PixelData::U8(_) => PixelType::U8,
            PixelData::U16(_) => PixelType::U16,
            PixelData::F32(_) => PixelType::F32,
        }
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        match self {
            PixelData::U8(data) => data.dim(),
            PixelData::U16(data) => data.dim(),
            PixelData::F32(data) => data.dim(),
        }
    }

    pub fn height(&self) -> usize {
        self.dim().0
    }

    pub fn width(&self) -> usize {
        self.dim().1
    }
}

/// A 2-D grayscale image with optional acquisition metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FibsemImage {
    pub data: PixelData,
    pub metadata: Option<FibsemImageMetadata>,
}

impl FibsemImage {
    /// Rejects anything that is not exactly two-dimensional; stacks and
    /// multi-channel arrays are never reshaped.
    pub fn new<T: Pixel>(data: ArrayD<T>, metadata: Option<FibsemImageMetadata>) -> Result<Self> {
        if data.ndim() != 2 {
            return Err(CoreError::InvalidRank { ndim: data.ndim() });
        }
        let data = data.into_dimensionality::<Ix2>()?;
        Ok(Self::from_pixels(data, metadata))
    }

    pub fn from_pixels(data: impl Into<PixelData>, metadata: Option<FibsemImageMetadata>) -> Self {
        Self {
            data: data.into(),
            metadata,
        }
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn pixel_type(&self) -> PixelType {
        self.data.pixel_type()
    }
}
