//! Configuration types for case-file analysis.
//!
//! All pipeline behaviour is controlled through [`AnalysisConfig`], built via
//! its [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across requests and to diff two runs to
//! understand why their reports differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::CasebriefError;
use crate::pipeline::layout::PageMetrics;

/// Configuration for one analysis pipeline.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use casebrief::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("llama3")
///     .max_corpus_chars(60_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base URL of the local Ollama instance. Default: `http://localhost:11434`.
    pub ollama_base_url: String,

    /// Model identifier sent with every completion request. Default: `llama3`.
    ///
    /// The report contract is model-agnostic, but the instruction template
    /// was tuned against llama3; smaller models drift from the numbered
    /// section structure more often.
    pub model: String,

    /// Custom system instruction. If `None`, uses the built-in default from
    /// [`crate::prompt`].
    pub system_prompt: Option<String>,

    /// Maximum characters of extracted corpus included in the prompt.
    /// Default: 120 000.
    ///
    /// The cut is a plain prefix: trailing document content beyond the
    /// budget is dropped (and logged). ~120k characters keeps the prompt
    /// inside an 8k-token context window for typical legal prose while
    /// covering several full-length filings.
    pub max_corpus_chars: usize,

    /// Minimum trimmed completion length accepted as a plausible report.
    /// Default: 30.
    ///
    /// Anything shorter than this cannot contain even the section headings,
    /// so it is treated as a service failure rather than written to disk.
    pub min_completion_chars: usize,

    /// Prefix of generated report identifiers
    /// (`{prefix}_{YYYYmmdd_HHMMSS}`). Default: `case_report`.
    pub report_prefix: String,

    /// Page geometry and font metrics for the PDF report.
    /// Default: A4, 20 mm margins, Helvetica 10 pt.
    pub page: PageMetrics,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            system_prompt: None,
            max_corpus_chars: 120_000,
            min_completion_chars: 30,
            report_prefix: "case_report".to_string(),
            page: PageMetrics::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn ollama_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.ollama_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_corpus_chars(mut self, n: usize) -> Self {
        self.config.max_corpus_chars = n;
        self
    }

    pub fn min_completion_chars(mut self, n: usize) -> Self {
        self.config.min_completion_chars = n;
        self
    }

    pub fn report_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.report_prefix = prefix.into();
        self
    }

    pub fn page(mut self, page: PageMetrics) -> Self {
        self.config.page = page;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, CasebriefError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(CasebriefError::InvalidConfig(
                "model identifier must not be empty".into(),
            ));
        }
        if c.max_corpus_chars == 0 {
            return Err(CasebriefError::InvalidConfig(
                "corpus budget must be ≥ 1 character".into(),
            ));
        }
        if c.report_prefix.is_empty()
            || c.report_prefix.contains(['/', '\\'])
            || c.report_prefix.contains("..")
        {
            return Err(CasebriefError::InvalidConfig(format!(
                "report prefix '{}' is not a valid filename stem",
                c.report_prefix
            )));
        }
        c.page
            .validate()
            .map_err(CasebriefError::InvalidConfig)?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.max_corpus_chars, 120_000);
        assert_eq!(config.min_completion_chars, 30);
        assert_eq!(config.report_prefix, "case_report");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = AnalysisConfig::builder()
            .ollama_base_url("http://localhost:11434/")
            .build()
            .unwrap();
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
    }

    #[test]
    fn empty_model_is_rejected() {
        let result = AnalysisConfig::builder().model("  ").build();
        assert!(matches!(result, Err(CasebriefError::InvalidConfig(_))));
    }

    #[test]
    fn traversal_prefix_is_rejected() {
        for prefix in ["../escape", "a/b", "a\\b", ""] {
            let result = AnalysisConfig::builder().report_prefix(prefix).build();
            assert!(
                matches!(result, Err(CasebriefError::InvalidConfig(_))),
                "prefix {prefix:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_corpus_budget_is_rejected() {
        let result = AnalysisConfig::builder().max_corpus_chars(0).build();
        assert!(matches!(result, Err(CasebriefError::InvalidConfig(_))));
    }
}
