//! OCR 전처리.
//!
//! 업로드 바이트 → 디코딩 → RGB → 최대 변 길이 축소 → 그레이스케일
//! → Otsu 임계값 반전 이진화 (글자가 흰색, 배경이 검은색).

use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use tracing::debug;

use notelens_core::config::VisionConfig;
use notelens_core::error::CoreError;

/// 이미지 바이트 디코딩 (포맷 자동 감지)
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::ImageDecode("빈 이미지 데이터".to_string()));
    }
    image::load_from_memory(bytes).map_err(|e| CoreError::ImageDecode(e.to_string()))
}

/// OCR 입력 전처리기
#[derive(Debug, Clone)]
pub struct Preprocessor {
    /// 최대 변 길이 (픽셀)
    max_dimension: u32,
    /// Otsu 반전 이진화 적용 여부
    binarize: bool,
}

impl Preprocessor {
    pub fn new(max_dimension: u32, binarize: bool) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            binarize,
        }
    }

    pub fn from_config(config: &VisionConfig) -> Self {
        Self::new(config.max_dimension, config.binarize)
    }

    /// 디코딩된 이미지를 OCR 입력용 그레이스케일 이미지로 변환
    pub fn prepare(&self, image: &DynamicImage) -> GrayImage {
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let (w, h) = (rgb.width(), rgb.height());

        // 축소만 한다 (작은 이미지는 그대로)
        let resized = if w > self.max_dimension || h > self.max_dimension {
            let thumb = rgb.thumbnail(self.max_dimension, self.max_dimension);
            debug!(
                "OCR 입력 축소: {}x{} → {}x{}",
                w,
                h,
                thumb.width(),
                thumb.height()
            );
            thumb
        } else {
            rgb
        };

        let gray = resized.to_luma8();
        if !self.binarize {
            return gray;
        }

        let level = otsu_level(&gray);
        debug!(level, "Otsu 임계값");
        threshold(&gray, level, ThresholdType::BinaryInverted)
    }

    /// 디코딩 + 전처리
    pub fn decode_and_prepare(&self, bytes: &[u8]) -> Result<GrayImage, CoreError> {
        let image = decode_image(bytes)?;
        Ok(self.prepare(&image))
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::from_config(&VisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// 흰 배경 위 검은 사각형 (글자 대용)
    fn page_with_block(w: u32, h: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(w, h, Rgb([250, 250, 250]));
        for y in h / 4..h / 2 {
            for x in w / 4..w / 2 {
                img.put_pixel(x, y, Rgb([10, 10, 10]));
            }
        }
        img
    }

    #[test]
    fn decode_rejects_empty() {
        let err = decode_image(&[]).unwrap_err();
        assert!(matches!(err, CoreError::ImageDecode(_)));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn large_image_is_shrunk_preserving_aspect() {
        let pre = Preprocessor::new(1_500, false);
        let img = DynamicImage::ImageRgb8(RgbImage::new(3_000, 1_000));
        let out = pre.prepare(&img);
        assert_eq!(out.width(), 1_500);
        assert_eq!(out.height(), 500);
    }

    #[test]
    fn small_image_is_not_enlarged() {
        let pre = Preprocessor::new(1_500, false);
        let img = DynamicImage::ImageRgb8(RgbImage::new(320, 200));
        let out = pre.prepare(&img);
        assert_eq!((out.width(), out.height()), (320, 200));
    }

    #[test]
    fn binarization_inverts_dark_text() {
        let pre = Preprocessor::new(1_500, true);
        let gray = pre
            .decode_and_prepare(&png_bytes(&page_with_block(80, 80)))
            .unwrap();

        assert!(gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        // 배경(밝음) → 검정, 블록(어두움) → 흰색
        assert_eq!(gray.get_pixel(2, 2).0[0], 0);
        assert_eq!(gray.get_pixel(25, 25).0[0], 255);
    }
}
