use super::BarcodeDecoder;
use crate::error::{Result, ScanError};
use crate::models::frame::{Canvas, PixelBuffer};
use crate::models::record::RawPayload;
use image::DynamicImage;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One way of presenting a still image to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    Image,
    PixelBuffer,
    Canvas,
}

impl DecodeStrategy {
    /// Default attempt order
    pub const ORDER: [DecodeStrategy; 3] = [
        DecodeStrategy::Image,
        DecodeStrategy::PixelBuffer,
        DecodeStrategy::Canvas,
    ];
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecodeStrategy::Image => "direct image",
            DecodeStrategy::PixelBuffer => "pixel buffer",
            DecodeStrategy::Canvas => "canvas",
        };
        f.write_str(name)
    }
}

/// Successful still-image decode
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub payload: RawPayload,
    pub strategy: DecodeStrategy,
    /// Strategies invoked, including the successful one
    pub attempts: usize,
}

/// The same visual content in each representation the chain may need
struct Representations<'a> {
    image: &'a DynamicImage,
    canvas: Canvas,
    pixels: PixelBuffer,
}

impl<'a> Representations<'a> {
    fn prepare(image: &'a DynamicImage) -> Self {
        let canvas = Canvas::for_image(image);
        let pixels = canvas.pixel_buffer();
        Self {
            image,
            canvas,
            pixels,
        }
    }
}

/// Ordered decode strategies tried one after another until the first success.
///
/// Every failure is handled the same way regardless of cause; only running out
/// of strategies is reported, as `DecodeExhausted`.
pub struct DecodeChain {
    decoder: Arc<dyn BarcodeDecoder>,
    strategies: Vec<DecodeStrategy>,
}

impl DecodeChain {
    pub fn new(decoder: Arc<dyn BarcodeDecoder>) -> Self {
        Self::with_strategies(decoder, DecodeStrategy::ORDER.to_vec())
    }

    pub fn with_strategies(decoder: Arc<dyn BarcodeDecoder>, strategies: Vec<DecodeStrategy>) -> Self {
        Self {
            decoder,
            strategies,
        }
    }

    pub fn strategies(&self) -> &[DecodeStrategy] {
        &self.strategies
    }

    pub async fn decode_image(&self, image: &DynamicImage) -> Result<DecodedImage> {
        self.decode_image_with(image, |_, _, _| {}).await
    }

    /// Like [`decode_image`](Self::decode_image), calling `on_failure(attempt, strategy, error)`
    /// after each failed strategy (attempt numbers start at 1)
    pub async fn decode_image_with<F>(&self, image: &DynamicImage, mut on_failure: F) -> Result<DecodedImage>
    where
        F: FnMut(usize, DecodeStrategy, &ScanError),
    {
        let reprs = Representations::prepare(image);

        for (idx, &strategy) in self.strategies.iter().enumerate() {
            let attempt = idx + 1;
            match self.attempt(strategy, &reprs).await {
                Ok(payload) => {
                    tracing::info!(%strategy, attempt, "still image decoded");
                    return Ok(DecodedImage {
                        payload,
                        strategy,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    tracing::debug!(%strategy, attempt, error = %e, "decode strategy failed");
                    on_failure(attempt, strategy, &e);
                }
            }
        }

        tracing::warn!(attempts = self.strategies.len(), "all decode strategies failed");
        Err(ScanError::DecodeExhausted {
            attempts: self.strategies.len(),
        })
    }

    async fn attempt(&self, strategy: DecodeStrategy, reprs: &Representations<'_>) -> Result<RawPayload> {
        let text = match strategy {
            DecodeStrategy::Image => self.decoder.decode_from_image(reprs.image).await?,
            DecodeStrategy::PixelBuffer => self.decoder.decode_from_pixel_buffer(&reprs.pixels).await?,
            DecodeStrategy::Canvas => self.decoder.decode_from_canvas(&reprs.canvas).await?,
        };

        RawPayload::new(text).ok_or_else(|| ScanError::Decoder("decoder returned empty text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{blank_image, ScriptedDecoder};

    #[tokio::test]
    async fn test_first_strategy_success() {
        let decoder = Arc::new(ScriptedDecoder::still(vec![Some("DCSDOE")]));
        let chain = DecodeChain::new(decoder.clone());

        let decoded = chain.decode_image(&blank_image(20, 10)).await.unwrap();
        assert_eq!(decoded.payload.as_str(), "DCSDOE");
        assert_eq!(decoded.strategy, DecodeStrategy::Image);
        assert_eq!(decoded.attempts, 1);
        assert_eq!(decoder.calls(), vec![DecodeStrategy::Image]);
    }

    #[tokio::test]
    async fn test_third_strategy_success_stops_chain() {
        let decoder = Arc::new(ScriptedDecoder::still(vec![None, None, Some("DCTJOHN")]));
        let chain = DecodeChain::new(decoder.clone());

        let decoded = chain.decode_image(&blank_image(20, 10)).await.unwrap();
        assert_eq!(decoded.payload.as_str(), "DCTJOHN");
        assert_eq!(decoded.strategy, DecodeStrategy::Canvas);
        assert_eq!(decoded.attempts, 3);
        assert_eq!(decoder.calls(), DecodeStrategy::ORDER.to_vec());
    }

    #[tokio::test]
    async fn test_all_strategies_fail() {
        let decoder = Arc::new(ScriptedDecoder::still(vec![None, None, None]));
        let chain = DecodeChain::new(decoder.clone());

        let mut failures = Vec::new();
        let err = chain
            .decode_image_with(&blank_image(20, 10), |attempt, strategy, _| {
                failures.push((attempt, strategy))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::DecodeExhausted { attempts: 3 }));
        assert_eq!(
            failures,
            vec![
                (1, DecodeStrategy::Image),
                (2, DecodeStrategy::PixelBuffer),
                (3, DecodeStrategy::Canvas)
            ]
        );
        assert_eq!(decoder.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_text_counts_as_failure() {
        let decoder = Arc::new(ScriptedDecoder::still(vec![Some(""), Some("DBB01011990")]));
        let chain = DecodeChain::new(decoder.clone());

        let decoded = chain.decode_image(&blank_image(4, 4)).await.unwrap();
        assert_eq!(decoded.strategy, DecodeStrategy::PixelBuffer);
    }

    #[tokio::test]
    async fn test_representations_share_dimensions() {
        let decoder = Arc::new(ScriptedDecoder::still(vec![None, None, Some("X12")]));
        let chain = DecodeChain::new(decoder.clone());

        chain.decode_image(&blank_image(33, 17)).await.unwrap();
        assert_eq!(decoder.seen_dimensions(), vec![(33, 17), (33, 17), (33, 17)]);
    }

    #[tokio::test]
    async fn test_custom_strategy_order() {
        let decoder = Arc::new(ScriptedDecoder::still(vec![None, Some("DCSDOE")]));
        let chain = DecodeChain::with_strategies(
            decoder.clone(),
            vec![DecodeStrategy::Canvas, DecodeStrategy::Image],
        );

        let decoded = chain.decode_image(&blank_image(4, 4)).await.unwrap();
        assert_eq!(decoded.strategy, DecodeStrategy::Image);
        assert_eq!(
            decoder.calls(),
            vec![DecodeStrategy::Canvas, DecodeStrategy::Image]
        );
    }
}
