/// Header consulted by the auth verifier.
pub const API_KEY_HEADER: &str = "api_key";
