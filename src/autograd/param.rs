//! Trainable parameter with lazily allocated gradient

use ndarray::{ArrayD, IxDyn};

/// A trainable weight array and its accumulated gradient
#[derive(Debug, Clone)]
pub struct Param {
    value: ArrayD<f32>,
    grad: Option<ArrayD<f32>>,
}

impl Param {
    /// Wrap an initialized value
    pub fn new(value: ArrayD<f32>) -> Self {
        Self { value, grad: None }
    }

    /// Parameter filled with a constant
    pub fn full(shape: &[usize], fill: f32) -> Self {
        Self::new(ArrayD::from_elem(IxDyn(shape), fill))
    }

    pub fn value(&self) -> &ArrayD<f32> {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ArrayD<f32> {
        &mut self.value
    }

    pub fn grad(&self) -> Option<&ArrayD<f32>> {
        self.grad.as_ref()
    }

    /// Number of scalar weights
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    /// Add `grad` into the accumulated gradient
    ///
    /// # Panics
    ///
    /// Panics if `grad` does not have the parameter's shape.
    pub fn accumulate_grad(&mut self, grad: &ArrayD<f32>) {
        assert_eq!(grad.shape(), self.value.shape(), "gradient shape must match parameter");
        match &mut self.grad {
            Some(existing) => *existing += grad,
            None => self.grad = Some(grad.clone()),
        }
    }

    /// Drop the accumulated gradient
    pub fn zero_grad(&mut self) {
        if let Some(grad) = &mut self.grad {
            grad.fill(0.0);
        }
    }

    /// Split into value and gradient for in-place updates
    pub(crate) fn value_and_grad_mut(&mut self) -> (&mut ArrayD<f32>, Option<&ArrayD<f32>>) {
        (&mut self.value, self.grad.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_param_starts_without_grad() {
        let p = Param::full(&[3], 1.0);
        assert!(p.grad().is_none());
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_accumulate_grad_sums() {
        let mut p = Param::full(&[3], 0.0);
        let g = arr1(&[1.0, 2.0, 3.0]).into_dyn();
        p.accumulate_grad(&g);
        p.accumulate_grad(&g);
        assert_eq!(p.grad().unwrap().as_slice().unwrap(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_zero_grad_keeps_buffer() {
        let mut p = Param::full(&[2], 0.0);
        p.accumulate_grad(&arr1(&[1.0, 1.0]).into_dyn());
        p.zero_grad();
        assert_eq!(p.grad().unwrap().sum(), 0.0);
    }

    #[test]
    #[should_panic(expected = "gradient shape must match")]
    fn test_accumulate_wrong_shape() {
        let mut p = Param::full(&[2], 0.0);
        p.accumulate_grad(&arr1(&[1.0, 1.0, 1.0]).into_dyn());
    }
}
