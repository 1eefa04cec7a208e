use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig2d, Relu,
    },
    prelude::*,
};

use crate::domain::sample::{IMAGE_CHANNELS, NUM_CLASSES};

/// Channels after the second conv × 7 × 7 spatial positions
pub const FLAT_FEATURES: usize = 64 * 7 * 7;

/// Whether dropout is applied during a forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    /// Dropout active; a fresh mask is drawn on every call
    Train,
    /// Dropout disabled
    Infer,
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    #[config(default = "NUM_CLASSES")]
    pub num_classes: usize,
    #[config(default = 256)]
    pub hidden_size: usize,
    #[config(default = 0.25)]
    pub dropout:     f64,
}

impl ClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Classifier<B> {
        // padding 1 keeps 28×28 (then 14×14) through each 3×3 conv
        let conv1 = Conv2dConfig::new([IMAGE_CHANNELS, 32], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let conv2 = Conv2dConfig::new([32, 64], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let pool = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();
        let fc1  = LinearConfig::new(FLAT_FEATURES, self.hidden_size).init(device);
        let fc2  = LinearConfig::new(self.hidden_size, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();

        Classifier { conv1, conv2, pool, fc1, fc2, dropout, activation: Relu::new() }
    }
}

/// conv(1→32) → relu → pool → conv(32→64) → relu → pool
///   → flatten(3136) → fc(256) → relu → dropout → fc(10)
#[derive(Module, Debug)]
pub struct Classifier<B: Backend> {
    pub conv1:      Conv2d<B>,
    pub conv2:      Conv2d<B>,
    pub pool:       MaxPool2d,
    pub fc1:        Linear<B>,
    pub fc2:        Linear<B>,
    pub dropout:    Dropout,
    pub activation: Relu,
}

impl<B: Backend> Classifier<B> {
    /// images: [batch, 1, 28, 28] → logits: [batch, 10]
    pub fn forward(&self, images: Tensor<B, 4>, mode: ForwardMode) -> Tensor<B, 2> {
        let [batch_size, _, _, _] = images.dims();

        let x = self.pool.forward(self.activation.forward(self.conv1.forward(images))); // [b, 32, 14, 14]
        let x = self.pool.forward(self.activation.forward(self.conv2.forward(x)));      // [b, 64, 7, 7]
        let x = x.reshape([batch_size, FLAT_FEATURES]);

        let x = self.activation.forward(self.fc1.forward(x));
        let x = match mode {
            ForwardMode::Train => self.dropout.forward(x),
            ForwardMode::Infer => x,
        };
        self.fc2.forward(x)
    }

    /// Training-mode forward pass plus mean cross-entropy against `targets`.
    /// Softmax lives inside the loss, never in the model.
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images, ForwardMode::Train);
        let loss   = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}
