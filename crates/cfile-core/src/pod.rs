//! Fixed-layout element types for bulk binary transfer.

/// Types whose in-memory representation may be copied byte-for-byte to and
/// from a stream.
///
/// # Safety
///
/// Implementors must have no padding, no pointers or ownership, and must
/// accept every bit pattern as a valid value (so `bool`, `char` and enums are
/// excluded). `read` fills values of this type straight from file bytes.
pub unsafe trait Pod: Copy + 'static {}

macro_rules! impl_pod {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: primitive numeric type, every bit pattern is valid.
            unsafe impl Pod for $t {}
        )*
    };
}

impl_pod!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

// SAFETY: arrays of Pod have no padding between elements.
unsafe impl<T: Pod, const N: usize> Pod for [T; N] {}

/// View a slice of `Pod` values as raw bytes.
pub fn as_bytes<T: Pod>(values: &[T]) -> &[u8] {
    // SAFETY: T is Pod, so every byte of the slice is initialized and the
    // length cannot overflow because the slice already exists.
    unsafe { std::slice::from_raw_parts(values.as_ptr().cast::<u8>(), size_of_val(values)) }
}

/// View a mutable slice of `Pod` values as raw bytes.
pub fn as_bytes_mut<T: Pod>(values: &mut [T]) -> &mut [u8] {
    // SAFETY: as above; Pod also guarantees any bytes written back form valid T.
    unsafe {
        std::slice::from_raw_parts_mut(values.as_mut_ptr().cast::<u8>(), size_of_val(values))
    }
}
