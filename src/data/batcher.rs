// ============================================================
// Layer 4 — Digit Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<DigitSample>
// into tensors on the target device.
//
// How batching works here:
//   Input:  Vec of N DigitSamples, 784 floats each
//   Output: DigitBatch with images [N, 1, 28, 28], targets [N]
//
//   All pixels are copied into one flat Vec, then the tensor is
//   built with the 4-D shape directly.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::sample::{DigitSample, IMAGE_CHANNELS, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH};

// ─── DigitBatch ───────────────────────────────────────────────────────────────
/// A batch of digit samples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// Shape: [batch_size, 1, 28, 28]
    pub images: Tensor<B, 4>,

    /// Class indices — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

impl<B: Backend> DigitBatch<B> {
    pub fn len(&self) -> usize {
        self.targets.dims()[0]
    }
}

// ─── DigitBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct DigitBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> DigitBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<DigitSample, DigitBatch<B>> for DigitBatcher<B> {
    fn batch(&self, items: Vec<DigitSample>) -> DigitBatch<B> {
        let batch_size = items.len();

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.image.iter().copied())
            .collect();
        debug_assert_eq!(pixels.len(), batch_size * IMAGE_PIXELS);

        let labels: Vec<i64> = items.iter().map(|s| s.label as i64).collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, IMAGE_CHANNELS, IMAGE_HEIGHT, IMAGE_WIDTH]),
            &self.device,
        );
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels, [batch_size]),
            &self.device,
        );

        DigitBatch { images, targets }
    }
}
