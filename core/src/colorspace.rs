/// Semantic interpretation of a pixel's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colorspace {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
    Hsv,
}

impl Colorspace {
    /// Channel count implied by the tag. A [`Matrix`](crate::Matrix)
    /// keeps its channel count consistent with this at all times.
    pub fn channel_count(&self) -> usize {
        match self {
            Colorspace::Gray => 1,
            Colorspace::GrayAlpha => 2,
            Colorspace::Rgb | Colorspace::Hsv => 3,
            Colorspace::Rgba => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Colorspace::GrayAlpha | Colorspace::Rgba)
    }
}
