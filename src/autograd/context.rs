//! Execution context for forward passes

/// Mode a network runs in for one forward pass
///
/// `training` switches dropout and batch statistics on. `record` keeps the
/// inputs each layer needs for backward; inference passes skip it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    training: bool,
    record: bool,
}

impl Context {
    /// Training behaviour, gradients tracked
    pub fn train() -> Self {
        Self { training: true, record: true }
    }

    /// Inference behaviour, gradients still tracked through the layers
    ///
    /// Used when a frozen network sits between a loss and the network being
    /// trained.
    pub fn eval() -> Self {
        Self { training: false, record: true }
    }

    /// Inference behaviour, nothing recorded
    pub fn inference() -> Self {
        Self { training: false, record: false }
    }

    /// Check if in training mode
    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Check if layers should record inputs for backward
    pub fn records(&self) -> bool {
        self.record
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::train()
    }
}
