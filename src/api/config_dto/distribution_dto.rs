use serde::{Deserialize, Serialize};

/// A distribution by name plus its positional parameters, e.g.
/// `{ "distribution": "randint", "params": [0, 1980] }`.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct DistributionDto {
    pub distribution: String,
    #[serde(default)]
    pub params: Vec<f64>,
    /// Every drawn value is divided by this factor (defaults to 1).
    #[serde(default)]
    pub divide_scale: Option<f64>,
}
