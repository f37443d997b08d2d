use image::RgbImage;

/// A single RGB image as an `f32` tensor of shape `[1, S, S, 3]`.
///
/// Values lie in `[0.0, 1.0]`, laid out row-major as (y, x, channel).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    edge: usize,
    data: Vec<f32>,
}

impl NormalizedTensor {
    /// Rescales a square RGB bitmap into a tensor. Returns `None` when the
    /// image is not square.
    pub fn from_rgb(image: &RgbImage) -> Option<NormalizedTensor> {
        if image.width() != image.height() {
            return None;
        }
        let data = image
            .pixels()
            .flat_map(|p| p.0.iter().map(|&c| c as f32 / 255.0))
            .collect();
        Some(NormalizedTensor { edge: image.width() as usize, data })
    }

    /// Wraps raw values; `None` unless `data.len() == edge * edge * 3` and
    /// every value is within `[0, 1]`.
    pub fn from_raw(edge: usize, data: Vec<f32>) -> Option<NormalizedTensor> {
        let in_range = data.iter().all(|v| (0.0..=1.0).contains(v));
        (data.len() == edge * edge * 3 && in_range).then_some(NormalizedTensor { edge, data })
    }

    pub fn shape(&self) -> [usize; 4] {
        [1, self.edge, self.edge, 3]
    }

    /// The single batch row, flattened as R, G, B, R, G, B, ...
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at `[0, y, x, channel]`.
    pub fn get(&self, y: usize, x: usize, channel: usize) -> Option<f32> {
        if y >= self.edge || x >= self.edge || channel >= 3 {
            return None;
        }
        self.data.get((y * self.edge + x) * 3 + channel).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn from_rgb_scales_and_orders_channels() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 51]));
        let t = NormalizedTensor::from_rgb(&img).unwrap();
        assert_eq!(t.shape(), [1, 2, 2, 3]);
        assert_eq!(t.get(1, 1, 0), Some(1.0));
        assert_eq!(t.get(1, 1, 1), Some(0.0));
        assert!((t.get(0, 1, 2).unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(t.get(2, 0, 0), None);
    }

    #[test]
    fn from_rgb_rejects_non_square() {
        let img = RgbImage::new(3, 2);
        assert!(NormalizedTensor::from_rgb(&img).is_none());
    }

    #[test]
    fn from_raw_checks_length_and_range() {
        assert!(NormalizedTensor::from_raw(1, vec![0.0, 0.5, 1.0]).is_some());
        assert!(NormalizedTensor::from_raw(1, vec![0.0, 0.5]).is_none());
        assert!(NormalizedTensor::from_raw(1, vec![0.0, 0.5, 1.5]).is_none());
    }
}
