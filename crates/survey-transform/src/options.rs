/// Columns exported by the survey platform that never carry answers.
pub const DEFAULT_DROPPED_COLUMNS: [&str; 6] = [
    "qSubmitURL",
    "bottomLogo",
    "introPic",
    "htmlLink_t",
    "htmlLink_u",
    "qLaunchUrl",
];

/// Marker in a question label identifying a slider-rendered numeric list.
pub const DEFAULT_SLIDER_MARKER: &str = "createSlider";

/// Options for cleaning.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Column holding the completion status.
    /// Default: `status`.
    pub completion_field: String,

    /// Status value of a completed response.
    /// Default: `complete`.
    pub completion_value: String,

    /// Columns dropped when present; absent ones are ignored.
    pub dropped_columns: Vec<String>,

    /// Substring of a numeric-list question label marking it as a slider.
    pub slider_marker: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            completion_field: "status".to_string(),
            completion_value: "complete".to_string(),
            dropped_columns: DEFAULT_DROPPED_COLUMNS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            slider_marker: DEFAULT_SLIDER_MARKER.to_string(),
        }
    }
}

impl CleanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completion(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.completion_field = field.into();
        self.completion_value = value.into();
        self
    }
}
