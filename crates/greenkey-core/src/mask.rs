use ndarray::{Array2, Zip};

/// Binary selection over a frame's pixel grid. `true` marks a selected pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub data: Array2<bool>,
}

impl Mask {
    pub fn new(data: Array2<bool>) -> Self {
        Self { data }
    }

    /// An all-unset mask of the given shape.
    pub fn empty(height: usize, width: usize) -> Self {
        Self::new(Array2::from_elem((height, width), false))
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.data[[row, col]]
    }

    /// Number of selected pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Set union (logical OR).
    pub fn union(&self, other: &Mask) -> Mask {
        let mut data = self.data.clone();
        Zip::from(&mut data).and(&other.data).for_each(|a, &b| *a |= b);
        Mask::new(data)
    }

    /// Set difference: pixels selected here and not in `other`.
    pub fn difference(&self, other: &Mask) -> Mask {
        let mut data = self.data.clone();
        Zip::from(&mut data).and(&other.data).for_each(|a, &b| *a &= !b);
        Mask::new(data)
    }

    /// Alpha view of the mask: 1.0 where selected, 0.0 elsewhere.
    pub fn to_alpha(&self) -> Array2<f32> {
        self.data.mapv(|v| if v { 1.0 } else { 0.0 })
    }
}
