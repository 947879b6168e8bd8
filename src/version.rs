// Version information for the YOLO Local Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-prediction-store-2025-08-31";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-31";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "detect",
    "detect-batch",
    "prediction-store",
    "annotated-images",
    "coco-classes",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("YOLO Local Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
