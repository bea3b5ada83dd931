// Version information for Fabstir Vision Lab

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-few-shot-and-clip-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 0;

/// Minor version number
pub const VERSION_MINOR: u32 = 1;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "few-shot-classifier",
    "resnet50-features",
    "knn-incremental",
    "region-labeling",
    "clip-joint-embeddings",
    "caption-store",
    "sequential-embedding-records",
    "cuda-fallback-cpu",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Vision Lab {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
