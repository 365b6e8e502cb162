//! Validation System - decoded raster checks
//!
//! Rules produce structured violations.
//! Errors block the render; warnings are logged and the render proceeds.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::MockupError;
use crate::layout::MockupLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    Background,
    Source,
}

/// Dimensions of a decoded raster, tagged with what it is used for.
#[derive(Debug, Clone, Serialize)]
pub struct ImageInput {
    pub role: ImageRole,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ImageInput {
    pub fn new(role: ImageRole, path: &Path, (width, height): (u32, u32)) -> Self {
        Self {
            role,
            path: path.to_path_buf(),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationViolation {
    pub rule: &'static str,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Warning)
    }

    /// Collapse blocking violations into a decode error for `path`.
    pub fn into_result(self, path: &Path) -> Result<Self, MockupError> {
        if self.valid {
            return Ok(self);
        }
        let messages: Vec<_> = self
            .violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect();
        Err(MockupError::decode(path, messages.join("; ")))
    }
}

pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &ImageInput, layout: &MockupLayout) -> Vec<ValidationViolation>;
}

/// A zero-height image would make the aspect ratio undefined.
pub struct NonZeroDimensionsRule;

impl ValidationRule for NonZeroDimensionsRule {
    fn name(&self) -> &'static str {
        "non_zero_dimensions"
    }

    fn validate(&self, input: &ImageInput, _layout: &MockupLayout) -> Vec<ValidationViolation> {
        if input.width > 0 && input.height > 0 {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name(),
            severity: ViolationSeverity::Error,
            message: "Decoded image has an empty dimension".to_string(),
            expected: Some("width > 0 and height > 0".to_string()),
            actual: Some(format!("{}x{}", input.width, input.height)),
        }]
    }
}

/// Backgrounds are authored at canvas size; anything else gets stretched.
pub struct CanvasSizeRule;

impl ValidationRule for CanvasSizeRule {
    fn name(&self) -> &'static str {
        "canvas_size"
    }

    fn validate(&self, input: &ImageInput, layout: &MockupLayout) -> Vec<ValidationViolation> {
        if input.role != ImageRole::Background {
            return vec![];
        }
        let [w, h] = layout.canvas_size;
        if input.width == w && input.height == h {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name(),
            severity: ViolationSeverity::Warning,
            message: "Background will be resized to the canvas".to_string(),
            expected: Some(format!("{}x{}", w, h)),
            actual: Some(format!("{}x{}", input.width, input.height)),
        }]
    }
}

pub struct Validator {
    rules: Vec<Box<dyn ValidationRule + Send + Sync>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(NonZeroDimensionsRule), Box::new(CanvasSizeRule)],
        }
    }

    pub fn validate(&self, input: &ImageInput, layout: &MockupLayout) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(input, layout))
            .collect();
        let valid = !violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
