use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Seller,
    Admin,
}

impl UserRole {
    pub fn can_sell(self) -> bool {
        matches!(self, UserRole::Seller | UserRole::Admin)
    }
}
