use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Broker {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Commission as a percentage of deal value
    #[serde(rename = "commissionRate")]
    pub commission_rate: f64,
}

impl Broker {
    /// Commission earned on a deal of the given value.
    pub fn commission_on(&self, deal_value: f64) -> f64 {
        deal_value * self.commission_rate / 100.0
    }
}
