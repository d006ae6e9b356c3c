use serde::{Deserialize, Serialize};

/// Shape every Acadify mutation replies with when there is no payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiMessage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
