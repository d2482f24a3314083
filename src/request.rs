//! One-shot processing requests.
//!
//! A request names the stages to run; nothing is implied. Failures to build
//! the pipeline are reported in the response with the original text
//! returned untouched.

use crate::engine::{Diagnostic, KnobMap, Pipeline, PipelineContext, StageConfig, Variables};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    pub text: String,
    #[serde(default)]
    pub processors: Vec<StageConfig>,
    #[serde(default)]
    pub knobs: Option<KnobMap>,
    #[serde(default)]
    pub variables: Option<Variables>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResponse {
    pub original: String,
    pub processed: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessingResponse {
    pub fn succeeded(original: &str, processed: String, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            original: original.to_string(),
            processed,
            success: true,
            message: None,
            diagnostics,
        }
    }

    pub fn failed(original: &str, message: impl Into<String>) -> Self {
        Self {
            original: original.to_string(),
            processed: original.to_string(),
            success: false,
            message: Some(message.into()),
            diagnostics: Vec::new(),
        }
    }
}

/// Run the request's declared stages over its text.
pub fn process_request(request: &ProcessingRequest) -> ProcessingResponse {
    let pipeline = match Pipeline::from_configs(&request.processors) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            tracing::warn!(error = %err, "rejecting processing request");
            return ProcessingResponse::failed(&request.text, err.to_string());
        }
    };

    let mut ctx = PipelineContext::new(
        request.knobs.clone().unwrap_or_default(),
        request.variables.clone().unwrap_or_default(),
    );
    let processed = pipeline.run(&request.text, &mut ctx);
    ProcessingResponse::succeeded(&request.text, processed, ctx.diagnostics)
}
