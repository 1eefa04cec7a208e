// ============================================================
// Layer 3 — Digit Sample Domain Type
// ============================================================
// One labelled grayscale digit image.
//
// Images are stored flat in channel-major order:
//   [channel][row][column] → index = row * 28 + column
// There is only one channel, so a sample is exactly 784 floats.
//
// Reference: Rust Book §5 (Structs)

/// Number of colour channels (grayscale)
pub const IMAGE_CHANNELS: usize = 1;

/// Rows per image
pub const IMAGE_HEIGHT: usize = 28;

/// Columns per image
pub const IMAGE_WIDTH: usize = 28;

/// Number of floats in one image
pub const IMAGE_PIXELS: usize = IMAGE_CHANNELS * IMAGE_HEIGHT * IMAGE_WIDTH;

/// Digits 0-9
pub const NUM_CLASSES: usize = 10;

/// A single (image, label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitSample {
    /// IMAGE_PIXELS values, shape (1, 28, 28) flattened
    pub image: Vec<f32>,

    /// Class index in [0, NUM_CLASSES)
    pub label: u8,
}

impl DigitSample {
    pub fn new(image: Vec<f32>, label: u8) -> Self {
        debug_assert_eq!(image.len(), IMAGE_PIXELS);
        Self { image, label }
    }
}

/// Returns true if `label` names one of the ten digit classes
pub fn is_valid_label(label: i64) -> bool {
    (0..NUM_CLASSES as i64).contains(&label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_has_784_pixels() {
        assert_eq!(IMAGE_PIXELS, 784);
    }

    #[test]
    fn test_label_range() {
        assert!(is_valid_label(0));
        assert!(is_valid_label(9));
        assert!(!is_valid_label(10));
        assert!(!is_valid_label(-1));
    }
}
