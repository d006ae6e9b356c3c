use serde::{Deserialize, Serialize};

use crate::model::course::Course;

/// Reply to create-order; the gateway checkout itself happens outside
/// this client.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub order_id: String,
    pub amount: u64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCheckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub purchased: bool,
    #[serde(default)]
    pub course: Option<Course>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MyLearningResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub courses: Vec<Course>,
}
