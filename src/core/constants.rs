//! Constants for the Gemini endpoint and relay response messages

/// Gemini API defaults
pub mod gemini {
    /// Base URL of the Generative Language API
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Model used when none is configured
    pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

    /// Method suffix appended to the model path
    pub const GENERATE_CONTENT: &str = "generateContent";

    /// Query parameter carrying the API key
    pub const API_KEY_PARAM: &str = "key";
}

/// Messages returned to callers of the relay
pub mod message {
    pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";

    pub const NO_QUESTION: &str = "No question provided.";

    pub const MISSING_API_KEY: &str = "Server configuration error: API key is missing.";

    /// Used when the upstream error object has no message
    pub const UNKNOWN_UPSTREAM_ERROR: &str = "unknown error";

    pub const UNEXPECTED: &str = "An unexpected error occurred while processing your request.";

    /// Answer substituted when the response has no usable text
    pub const FALLBACK_ANSWER: &str = "Sorry, I could not get a valid answer from the AI.";

    pub const NOT_FOUND: &str = "Not found";
}

/// Route paths
pub mod route {
    pub const ASK: &str = "/ask";
    pub const HEALTH: &str = "/health";
    pub const ROOT: &str = "/";
}
