use ndarray::{Array2, Axis, concatenate};

use crate::model::{BeamType, FibsemImage, PixelData};

use super::{MovementError, Result};

/// Display position inside an image, `row` down and `col` across.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelCoordinate {
    pub row: f64,
    pub col: f64,
}

impl PixelCoordinate {
    pub const fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

/// A click resolved to the beam image it landed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTarget {
    pub beam_type: BeamType,
    /// Coordinate local to the originating beam image.
    pub coord: PixelCoordinate,
}

/// Electron image on the left, ion image on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeImage {
    data: PixelData,
    half_width: usize,
}

fn side_by_side<T: Clone>(left: &Array2<T>, right: &Array2<T>) -> Result<Array2<T>> {
    Ok(concatenate(Axis(1), &[left.view(), right.view()])?)
}

impl CompositeImage {
    pub fn from_pair(electron: &FibsemImage, ion: &FibsemImage) -> Result<Self> {
        if electron.shape() != ion.shape() {
            return Err(MovementError::ShapeMismatch {
                electron: electron.shape(),
                ion: ion.shape(),
            });
        }
        let data = match (&electron.data, &ion.data) {
            (PixelData::U8(left), PixelData::U8(right)) => PixelData::U8(side_by_side(left, right)?),
            (PixelData::U16(left), PixelData::U16(right)) => {
                PixelData::U16(side_by_side(left, right)?)
            }
            (PixelData::F32(left), PixelData::F32(right)) => {
                PixelData::F32(side_by_side(left, right)?)
            }
            (left, right) => {
                return Err(MovementError::PixelTypeMismatch {
                    electron: left.pixel_type(),
                    ion: right.pixel_type(),
                });
            }
        };
        let half_width = data.width() / 2;
        Ok(Self { data, half_width })
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Maps a composite coordinate to the beam image strictly containing it.
    pub fn resolve(&self, coord: PixelCoordinate) -> Option<ClickTarget> {
        let height = self.height() as f64;
        let width = self.width() as f64;
        let half = self.half_width as f64;
        let PixelCoordinate { row, col } = coord;

        if !(row > 0.0 && row < height) {
            return None;
        }
        if col > 0.0 && col < half {
            Some(ClickTarget {
                beam_type: BeamType::Electron,
                coord,
            })
        } else if col > half && col < width {
            Some(ClickTarget {
                beam_type: BeamType::Ion,
                coord: PixelCoordinate::new(row, col - half),
            })
        } else {
            None
        }
    }
}
