/*
 * Responsibility
 * - request/response DTOs for collection transactions
 */
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::repos::transaction_repo::{EventSummaryRow, TxRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Contribution,
    Refund,
    Settlement,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contribution => "contribution",
            Self::Refund => "refund",
            Self::Settlement => "settlement",
        }
    }
}

impl FromStr for TransactionType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contribution" => Ok(Self::Contribution),
            "refund" => Ok(Self::Refund),
            "settlement" => Ok(Self::Settlement),
            _ => Err("unknown transaction type"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err("unknown transaction status"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub status: Option<TransactionStatus>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

impl CreateTransactionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.amount <= Decimal::ZERO {
            return Err("amount must be greater than zero");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub amount: Option<Decimal>,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    /// Present-and-null clears the field, absent leaves it untouched.
    #[serde(default, with = "super::serde_double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "super::serde_double_option")]
    pub payment_method: Option<Option<String>>,
}

impl UpdateTransactionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(amount) = self.amount
            && amount <= Decimal::ZERO
        {
            return Err("amount must be greater than zero");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub event_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<TransactionStatus>,
    pub transaction_type: Option<TransactionType>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub amount: Decimal,
    pub transaction_type: String,
    pub status: String,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TxRow> for TransactionResponse {
    fn from(row: TxRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            event_title: row.event_title,
            user_id: row.user_id,
            user_name: row.user_name,
            amount: row.amount,
            transaction_type: row.transaction_type,
            status: row.status,
            description: row.description,
            payment_method: row.payment_method,
            transaction_date: row.transaction_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Money totals for one event's active transactions.
#[derive(Debug, Serialize)]
pub struct EventSummaryResponse {
    pub event_id: Uuid,
    pub transaction_count: i64,
    pub contributor_count: i64,
    pub total_amount: Decimal,
    pub completed_amount: Decimal,
    pub pending_amount: Decimal,
    pub failed_amount: Decimal,
    pub completed_count: i64,
    pub pending_count: i64,
    pub failed_count: i64,
}

impl EventSummaryResponse {
    pub fn from_row(event_id: Uuid, row: EventSummaryRow) -> Self {
        Self {
            event_id,
            transaction_count: row.transaction_count,
            contributor_count: row.contributor_count,
            total_amount: row.total_amount,
            completed_amount: row.completed_amount,
            pending_amount: row.pending_amount,
            failed_amount: row.failed_amount,
            completed_count: row.completed_count,
            pending_count: row.pending_count,
            failed_count: row.failed_count,
        }
    }
}

/// One user's paginated history inside an event, plus their completed total.
#[derive(Debug, Serialize)]
pub struct UserEventHistoryResponse {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub transactions: Vec<TransactionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amount() {
        let req = CreateTransactionRequest {
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: Decimal::ZERO,
            transaction_type: TransactionType::Contribution,
            status: None,
            description: None,
            payment_method: None,
            transaction_date: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let absent: UpdateTransactionRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.description.is_none());
        assert!(absent.payment_method.is_none());

        let cleared: UpdateTransactionRequest =
            serde_json::from_str(r#"{"description": null, "payment_method": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.payment_method, Some(None));

        let set: UpdateTransactionRequest =
            serde_json::from_str(r#"{"payment_method": "upi"}"#).unwrap();
        assert_eq!(set.payment_method, Some(Some("upi".into())));
    }

    #[test]
    fn status_text_roundtrip() {
        for s in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
        ] {
            assert_eq!(s.as_str().parse::<TransactionStatus>().unwrap(), s);
        }
    }
}
