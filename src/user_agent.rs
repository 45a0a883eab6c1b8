//! User-Agent string sent with every request.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/citeset";

/// Default User-Agent for policy, page and article API requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("citeset/{version} (citation-dataset-builder; +{PROJECT_UA_URL})")
}
