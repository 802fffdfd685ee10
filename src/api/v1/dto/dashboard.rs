use rust_decimal::Decimal;
use serde::Serialize;

use crate::repos::dashboard_repo::{AdminStatsRow, UserDashboardRow};

#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub active_events: i64,
    pub total_payment: Decimal,
    pub pending_payment: Decimal,
}

impl From<AdminStatsRow> for AdminStatsResponse {
    fn from(row: AdminStatsRow) -> Self {
        Self {
            total_users: row.total_users,
            active_events: row.active_events,
            total_payment: row.total_payment,
            pending_payment: row.pending_payment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDashboardResponse {
    pub events_created: i64,
    pub events_joined: i64,
    pub wallet_balance: Decimal,
}

impl From<UserDashboardRow> for UserDashboardResponse {
    fn from(row: UserDashboardRow) -> Self {
        Self {
            events_created: row.events_created,
            events_joined: row.events_joined,
            wallet_balance: row.wallet_balance,
        }
    }
}
