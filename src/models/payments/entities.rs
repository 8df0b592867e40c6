use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 支付交易状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const PENDING: &'static str = "pending";
    pub const PAID: &'static str = "paid";
    pub const FAILED: &'static str = "failed";

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => Self::PENDING,
            PaymentStatus::Paid => Self::PAID,
            PaymentStatus::Failed => Self::FAILED,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(PaymentStatus::Pending),
            Self::PAID => Ok(PaymentStatus::Paid),
            Self::FAILED => Ok(PaymentStatus::Failed),
            _ => Err(format!("Invalid payment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentTransaction {
    pub id: i64,
    pub order_id: String,
    pub user_id: i64,
    pub package_name: String,
    pub description: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub reference: Option<String>,
    pub payment_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 新建交易
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: String,
    pub user_id: i64,
    pub package_name: String,
    pub description: String,
    pub amount: i64,
    pub reference: Option<String>,
    pub payment_url: Option<String>,
}

/// 回调结算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Updated,
    AlreadySettled,
    NotFound,
    /// 回调金额与订单金额不符，订单保持不变
    AmountMismatch { expected: i64 },
}
