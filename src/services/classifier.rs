// src/services/classifier.rs
use crate::errors::ApiError;
use image::{GenericImageView, imageops::FilterType};
use ndarray::{Array, Ix4};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::path::Path;
use std::sync::Mutex;

/// Class labels in the order used when the model was trained. The index
/// correspondence with the model's output vector is a contract with the
/// model artifact and cannot be verified at runtime; a mismatch silently
/// produces wrong labels.
pub const CLASS_NAMES: [&str; 2] = ["Oral Cancer", "Normal"];

#[derive(Debug, Clone, PartialEq)]
pub struct ClassPrediction {
    pub label: String,
    /// Probability of the winning class as a percentage, rounded to 2 decimals.
    pub confidence: f64,
}

/// Seam between the HTTP handlers and the inference backend.
pub trait ModelService: Send + Sync {
    fn predict(&self, image_data: &[u8]) -> Result<ClassPrediction, ApiError>;
}

/// ONNX Runtime backed classifier. The session requires exclusive access to
/// run, so it sits behind a mutex.
pub struct OrtClassifier {
    session: Mutex<Session>,
    output_name: String,
    input_size: u32,
}

impl OrtClassifier {
    pub fn load(model_path: &Path, input_size: u32) -> Result<Self, ApiError> {
        let session = build_session(model_path)
            .map_err(|e| ApiError::Inference(format!("failed to load model: {e}")))?;

        let output_name = session
            .outputs()
            .first()
            .map(|output| output.name().to_string())
            .ok_or_else(|| ApiError::Inference("model declares no outputs".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            input_size,
        })
    }

    fn run_inference(&self, input: &Array<f32, Ix4>) -> Result<Vec<f32>, ApiError> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| ApiError::Inference(format!("session mutex poisoned: {e}")))?;

        let tensor_ref = TensorRef::from_array_view(input.view())
            .map_err(|e| ApiError::Inference(format!("failed to build tensor: {e}")))?;

        let outputs = session
            .run(ort::inputs![tensor_ref])
            .map_err(|e| ApiError::Inference(format!("inference failed: {e}")))?;

        let (_shape, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| ApiError::Inference(format!("failed to extract tensor: {e}")))?;

        Ok(data.to_vec())
    }
}

impl ModelService for OrtClassifier {
    fn predict(&self, image_data: &[u8]) -> Result<ClassPrediction, ApiError> {
        let input = preprocess(image_data, self.input_size)?;
        let probabilities = self.run_inference(&input)?;

        let (index, probability) = argmax(&probabilities)
            .ok_or_else(|| ApiError::Inference("model returned an empty output".to_string()))?;

        let label = CLASS_NAMES
            .get(index)
            .ok_or(ApiError::InvalidPredictionIndex(index))?;

        Ok(ClassPrediction {
            label: (*label).to_string(),
            confidence: to_percentage(probability),
        })
    }
}

fn build_session(model_path: &Path) -> Result<Session, ort::Error> {
    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .commit_from_file(model_path)
}

/// Decodes the upload, resizes it to the model's spatial dimensions and
/// scales pixels from [0,255] to [-1,1], producing a single-image NHWC batch.
fn preprocess(image_data: &[u8], input_size: u32) -> Result<Array<f32, Ix4>, ApiError> {
    let img = image::load_from_memory(image_data)
        .map_err(|e| ApiError::ImageDecode(e.to_string()))?;

    let img = img.resize_exact(input_size, input_size, FilterType::CatmullRom);

    let size = input_size as usize;
    let mut input = Array::zeros((1, size, size, 3));
    for pixel in img.pixels() {
        let x = pixel.0 as usize;
        let y = pixel.1 as usize;
        let [r, g, b, _] = pixel.2 .0;
        input[[0, y, x, 0]] = (r as f32) / 127.5 - 1.;
        input[[0, y, x, 1]] = (g as f32) / 127.5 - 1.;
        input[[0, y, x, 2]] = (b as f32) / 127.5 - 1.;
    }

    Ok(input)
}

fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .reduce(|accum, row| if row.1 > accum.1 { row } else { accum })
}

fn to_percentage(probability: f32) -> f64 {
    (f64::from(probability) * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_of_solid_color(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(width, height, Rgb(color));
        let mut image_data: Vec<u8> = Vec::new();
        img.write_to(&mut Cursor::new(&mut image_data), image::ImageFormat::Png)
            .unwrap();
        image_data
    }

    #[test]
    fn preprocess_produces_a_scaled_nhwc_batch() {
        let image_data = png_of_solid_color(100, 100, [255, 0, 0]);

        let input = preprocess(&image_data, 224).unwrap();

        assert_eq!(input.shape(), &[1, 224, 224, 3]);
        // 255 maps to 1.0, 0 maps to -1.0
        assert!((input[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((input[[0, 0, 0, 1]] + 1.0).abs() < 1e-6);
        assert!(input.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn preprocess_rejects_non_image_bytes() {
        let err = preprocess(b"definitely not an image", 224).unwrap_err();
        assert!(matches!(err, ApiError::ImageDecode(_)));
    }

    #[test]
    fn argmax_picks_the_highest_probability() {
        assert_eq!(argmax(&[0.1257, 0.8743]), Some((1, 0.8743)));
        assert_eq!(argmax(&[0.8743, 0.1257]), Some((0, 0.8743)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn percentage_is_rounded_to_two_decimals() {
        assert_eq!(to_percentage(0.8743), 87.43);
        assert_eq!(to_percentage(0.874349), 87.43);
        assert_eq!(to_percentage(1.0), 100.0);
        assert_eq!(to_percentage(0.0), 0.0);
    }
}
