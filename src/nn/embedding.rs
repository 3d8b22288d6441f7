//! Lookup-table embedding layer.

use super::Module;
use crate::tensor::{Dtype, RandomStream, Tensor};

/// Embedding lookup: integer indices select rows of a normally-initialized
/// table.
///
/// # Shape
///
/// - Input: any integer-typed shape `(*)` with values in [0, num_embeddings)
/// - Output: `(*, dims)`
pub struct Embedding {
    /// Table, shape [num_embeddings, dims]
    weight: Tensor,
    num_embeddings: usize,
    dims: usize,
}

impl Embedding {
    #[must_use]
    pub fn new(rng: &mut RandomStream, num_embeddings: usize, dims: usize) -> Self {
        let weight = rng.normal(&[num_embeddings, dims]);
        Self {
            weight,
            num_embeddings,
            dims,
        }
    }
}

impl Module for Embedding {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        assert_eq!(
            input.dtype(),
            Dtype::Int32,
            "embedding input must be integer-typed"
        );
        let wd = self.weight.data();
        let mut out = Vec::with_capacity(input.numel() * self.dims);
        for &raw in input.data() {
            let idx = raw as usize;
            assert!(
                idx < self.num_embeddings,
                "embedding index {} out of range for table of {}",
                idx,
                self.num_embeddings
            );
            out.extend_from_slice(&wd[idx * self.dims..(idx + 1) * self.dims]);
        }
        let mut shape = input.shape().to_vec();
        shape.push(self.dims);
        Tensor::new(out, &shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_appends_dims_axis() {
        let mut rng = RandomStream::new(2);
        let layer = Embedding::new(&mut rng, 10, 8);
        let idx = rng.randint(0, 10, &[2, 8, 8, 4]);
        let y = layer.forward(&mut rng, &idx);
        assert_eq!(y.shape(), [2, 8, 8, 4, 8]);
    }

    #[test]
    fn test_rows_match_table() {
        let mut rng = RandomStream::new(4);
        let layer = Embedding::new(&mut rng, 3, 2);
        let idx = Tensor::with_dtype(vec![2.0], &[1], Dtype::Int32);
        let y = layer.forward(&mut rng, &idx);
        assert_eq!(y.data(), &layer.weight.data()[4..6]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let mut rng = RandomStream::new(4);
        let layer = Embedding::new(&mut rng, 3, 2);
        let idx = Tensor::with_dtype(vec![3.0], &[1], Dtype::Int32);
        let _ = layer.forward(&mut rng, &idx);
    }
}
