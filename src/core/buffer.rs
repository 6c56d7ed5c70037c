//! The raw N-dimensional buffer abstraction.
//!
//! The pipeline operates on [`RawBuffer`], an immutable rank 2-4 array of
//! `f32` samples backed by [`ndarray`]. Callers hand in their own arrays
//! through the [`IntoRawBuffer`] adapter trait, which has one implementation
//! per concrete source type; integer and `f64` sources are converted
//! sample-wise. Borrowed views are wrapped without copying.

use ndarray::{ArrayD, ArrayViewD, CowArray, IxDyn};

/// An immutable N-dimensional array of numeric samples with an explicit
/// shape.
///
/// The pipeline only reads the buffer; it is created fresh per invocation
/// and carries no state between calls.
#[derive(Debug)]
pub struct RawBuffer<'a> {
    data: CowArray<'a, f32, IxDyn>,
}

impl<'a> RawBuffer<'a> {
    /// Wraps an ndarray value (owned or borrowed) as a RawBuffer.
    pub fn new(data: impl Into<CowArray<'a, f32, IxDyn>>) -> Self {
        Self { data: data.into() }
    }

    /// The ordered sequence of axis sizes.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of samples in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A read-only view of the samples.
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }
}

/// Conversion of a source-specific array type into a [`RawBuffer`].
///
/// The pipeline entry points accept any `impl IntoRawBuffer`, so adding
/// support for a new tensor source only requires implementing this trait.
pub trait IntoRawBuffer<'a> {
    /// Converts the value into a raw buffer, borrowing where possible.
    fn into_raw_buffer(self) -> RawBuffer<'a>;
}

impl<'a> IntoRawBuffer<'a> for RawBuffer<'a> {
    fn into_raw_buffer(self) -> RawBuffer<'a> {
        self
    }
}

impl<'a> IntoRawBuffer<'a> for ArrayViewD<'a, f32> {
    fn into_raw_buffer(self) -> RawBuffer<'a> {
        RawBuffer::new(self)
    }
}

impl<'a> IntoRawBuffer<'a> for &'a ArrayD<f32> {
    fn into_raw_buffer(self) -> RawBuffer<'a> {
        RawBuffer::new(self.view())
    }
}

impl IntoRawBuffer<'static> for ArrayD<f32> {
    fn into_raw_buffer(self) -> RawBuffer<'static> {
        RawBuffer::new(self)
    }
}

/// Implements [`IntoRawBuffer`] for owned arrays of a numeric sample type by
/// converting each sample to `f32`.
macro_rules! impl_into_raw_buffer {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoRawBuffer<'static> for ArrayD<$ty> {
                fn into_raw_buffer(self) -> RawBuffer<'static> {
                    RawBuffer::new(self.mapv(|v| v as f32))
                }
            }

            impl<'a> IntoRawBuffer<'static> for &'a ArrayD<$ty> {
                fn into_raw_buffer(self) -> RawBuffer<'static> {
                    RawBuffer::new(self.mapv(|v| v as f32))
                }
            }
        )+
    };
}

impl_into_raw_buffer!(f64, u8, u16, u32, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    #[test]
    fn test_owned_f32_is_wrapped() {
        let arr = ArrayD::<f32>::zeros(IxDyn(&[2, 3]));
        let buffer = arr.into_raw_buffer();
        assert_eq!(buffer.shape(), &[2, 3]);
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_integer_sources_convert_to_f32() {
        let arr = ArrayD::<u8>::from_elem(IxDyn(&[2, 2]), 200u8);
        let buffer = arr.into_raw_buffer();
        assert_eq!(buffer.view()[[0, 0]], 200.0);
    }

    #[test]
    fn test_borrowed_view_keeps_shape() {
        let arr = ArrayD::<f32>::zeros(IxDyn(&[3, 4, 5]));
        let buffer = arr.view().into_raw_buffer();
        assert_eq!(buffer.shape(), &[3, 4, 5]);
    }

    #[test]
    fn test_f64_source_converts() {
        let arr = ArrayD::<f64>::from_elem(IxDyn(&[2, 2]), 0.5f64);
        let buffer = arr.into_raw_buffer();
        assert_eq!(buffer.view()[[1, 1]], 0.5f32);
    }
}
