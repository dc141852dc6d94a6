// ============================================================================
// cqscout-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating and configuring CoreConfig instances.
// `build` validates the result, so an invalid configuration is reported
// before any file is touched.
//
// AI-ASSISTANT-INFO: Builder pattern implementation for CoreConfig

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, RateControl, SearchStrategy};
use crate::error::{CoreError, CoreResult};
use crate::quality::Thresholds;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use cqscout_core::config::{CoreConfigBuilder, SearchStrategy};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .encoder_path(PathBuf::from("/usr/bin/ffmpeg"))
///     .min_ssim(0.98)
///     .min_psnr(45.0)
///     .strategy(SearchStrategy::Linear)
///     .continue_on_error(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.thresholds.min_ssim, 0.98);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    // Required fields
    encoder_path: Option<PathBuf>,

    // Optional fields, defaults come from CoreConfig::new
    codec: Option<String>,
    rate_control: Option<RateControl>,
    trial_preset: Option<String>,
    final_preset: Option<String>,
    min_ssim: Option<f64>,
    min_psnr: Option<f64>,
    strategy: Option<SearchStrategy>,
    continue_on_error: bool,
    skip_processed: bool,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the encoder binary used for every invocation.
    pub fn encoder_path(mut self, encoder_path: PathBuf) -> Self {
        self.encoder_path = Some(encoder_path);
        self
    }

    /// Sets the video codec passed to `-c:v`.
    pub fn codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }

    pub fn rate_control(mut self, rate_control: RateControl) -> Self {
        self.rate_control = Some(rate_control);
        self
    }

    /// Sets the preset used for trial encodes.
    pub fn trial_preset(mut self, preset: impl Into<String>) -> Self {
        self.trial_preset = Some(preset.into());
        self
    }

    /// Sets the preset used for the final encode.
    pub fn final_preset(mut self, preset: impl Into<String>) -> Self {
        self.final_preset = Some(preset.into());
        self
    }

    pub fn min_ssim(mut self, min_ssim: f64) -> Self {
        self.min_ssim = Some(min_ssim);
        self
    }

    pub fn min_psnr(mut self, min_psnr: f64) -> Self {
        self.min_psnr = Some(min_psnr);
        self
    }

    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn skip_processed(mut self, skip_processed: bool) -> Self {
        self.skip_processed = skip_processed;
        self
    }

    /// Builds and validates the CoreConfig.
    ///
    /// # Returns
    ///
    /// * `Ok(CoreConfig)` - A validated configuration
    /// * `Err(CoreError::Configuration)` - The encoder path is missing or a
    ///   value is out of range
    pub fn build(self) -> CoreResult<CoreConfig> {
        let encoder_path = self
            .encoder_path
            .ok_or_else(|| CoreError::Configuration("encoder path is required".into()))?;

        let mut config = CoreConfig::new(encoder_path);
        if let Some(codec) = self.codec {
            config.encoder.codec = codec;
        }
        if let Some(rate_control) = self.rate_control {
            config.encoder.rate_control = rate_control;
        }
        if let Some(preset) = self.trial_preset {
            config.encoder.trial_preset = preset;
        }
        if let Some(preset) = self.final_preset {
            config.encoder.final_preset = preset;
        }
        let defaults = Thresholds::default();
        config.thresholds = Thresholds {
            min_ssim: self.min_ssim.unwrap_or(defaults.min_ssim),
            min_psnr: self.min_psnr.unwrap_or(defaults.min_psnr),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        config.continue_on_error = self.continue_on_error;
        config.skip_processed = self.skip_processed;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_encoder_path_is_a_configuration_error() {
        let result = CoreConfigBuilder::new().build();
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[test]
    fn overrides_are_applied() {
        let config = CoreConfigBuilder::new()
            .encoder_path(PathBuf::from("/usr/bin/ffmpeg"))
            .codec("hevc_nvenc")
            .rate_control(RateControl::Cq)
            .trial_preset("fast")
            .final_preset("slow")
            .skip_processed(true)
            .build()
            .unwrap();
        assert_eq!(config.encoder.codec, "hevc_nvenc");
        assert_eq!(config.encoder.rate_control, RateControl::Cq);
        assert_eq!(config.encoder.trial_preset, "fast");
        assert_eq!(config.encoder.final_preset, "slow");
        assert!(config.skip_processed);
        assert!(!config.continue_on_error);
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let result = CoreConfigBuilder::new()
            .encoder_path(PathBuf::from("/usr/bin/ffmpeg"))
            .min_ssim(2.0)
            .build();
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }
}
