/// Numeric sample type stored in a [`Matrix`](crate::Matrix).
///
/// Unsigned integers carry on-disk precision; `f32` is the
/// intermediate compute type. `f32` matrices keep the byte-range
/// value convention of the data model, so converting between integer
/// and float samples is a pure round/saturate without rescaling.
pub trait Sample: Copy + Default + PartialOrd + Send + Sync + 'static {
    /// Full-scale sample value.
    const MAX: Self;
    /// Bits per sample as reported at the codec boundary.
    const BIT_DEPTH: u16;

    fn to_f32(self) -> f32;

    /// Rounds and saturates; never wraps.
    fn from_f32(value: f32) -> Self;
}

impl Sample for u8 {
    const MAX: Self = u8::MAX;
    const BIT_DEPTH: u16 = 8;

    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(value: f32) -> Self {
        value.round().clamp(0.0, u8::MAX as f32) as u8
    }
}

impl Sample for u16 {
    const MAX: Self = u16::MAX;
    const BIT_DEPTH: u16 = 16;

    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(value: f32) -> Self {
        value.round().clamp(0.0, u16::MAX as f32) as u16
    }
}

impl Sample for f32 {
    const MAX: Self = 255.0;
    const BIT_DEPTH: u16 = 32;

    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(value: f32) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_from_f32_rounds() {
        assert_eq!(<u8 as Sample>::from_f32(10.4), 10);
        assert_eq!(<u8 as Sample>::from_f32(10.6), 11);
    }

    #[test]
    fn u8_from_f32_saturates_instead_of_wrapping() {
        assert_eq!(<u8 as Sample>::from_f32(300.0), 255);
        assert_eq!(<u8 as Sample>::from_f32(-5.0), 0);
    }

    #[test]
    fn u16_from_f32_saturates() {
        assert_eq!(<u16 as Sample>::from_f32(70000.0), u16::MAX);
        assert_eq!(<u16 as Sample>::from_f32(-1.0), 0);
    }
}
