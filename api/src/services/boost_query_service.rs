// Read paths over boosts: discovery listing, receipts, notifications, revenue

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::auth::Caller;
use crate::db::repositories::RevenueRow;
use crate::domain::boost::effective_boost;
use crate::error::{ViaoError, ViaoResult};
use crate::handlers::AppState;
use crate::models::{
    BoostedEventData, BoostedEventsResponse, CurrencyRevenue, LevelRevenue, NotificationData,
    NotificationsResponse, ReceiptData, ReceiptsResponse, RevenueReport,
};

const NOTIFICATION_FEED_LIMIT: u64 = 50;

/// Events boosted at `now`, strongest first
pub async fn get_boosted_events(
    state: &AppState,
    now: DateTime<Utc>,
) -> ViaoResult<BoostedEventsResponse> {
    let events = state.repositories.events.find_active_boosted(now).await?;

    // The query already filters on expiry; re-check so the listing and the rule agree
    let events = events
        .into_iter()
        .filter_map(|event| {
            effective_boost(&event, now)
                .map(|window| BoostedEventData::new(event, window.level, window.until))
        })
        .collect();

    Ok(BoostedEventsResponse { events })
}

pub async fn get_receipts(
    state: &AppState,
    caller: Option<&Caller>,
) -> ViaoResult<ReceiptsResponse> {
    let caller = caller.ok_or(ViaoError::Unauthorized)?;
    if !caller.is_organizer() {
        return Err(ViaoError::Forbidden("Organizer role required".to_string()));
    }

    let receipts = state
        .repositories
        .receipts
        .find_by_organizer(&caller.user_id)
        .await?;

    Ok(ReceiptsResponse {
        receipts: receipts.into_iter().map(ReceiptData::from).collect(),
    })
}

pub async fn get_notifications(
    state: &AppState,
    caller: Option<&Caller>,
) -> ViaoResult<NotificationsResponse> {
    let caller = caller.ok_or(ViaoError::Unauthorized)?;
    let notifications = state
        .repositories
        .notifications
        .find_for_user(&caller.user_id, NOTIFICATION_FEED_LIMIT)
        .await?;

    Ok(NotificationsResponse {
        notifications: notifications
            .into_iter()
            .map(NotificationData::from)
            .collect(),
    })
}

/// Admin revenue report over all receipts
pub async fn get_revenue_report(
    state: &AppState,
    caller: Option<&Caller>,
) -> ViaoResult<RevenueReport> {
    let caller = caller.ok_or(ViaoError::Unauthorized)?;
    if !caller.is_admin() {
        return Err(ViaoError::Forbidden("Admin role required".to_string()));
    }

    let rows = state
        .repositories
        .receipts
        .revenue_by_currency_and_level()
        .await?;
    Ok(build_revenue_report(rows))
}

/// Folds per-(currency, level) rows into the report. Rows arrive sorted by currency.
pub fn build_revenue_report(rows: Vec<RevenueRow>) -> RevenueReport {
    let mut currencies: Vec<CurrencyRevenue> = Vec::new();

    for row in rows {
        let level = LevelRevenue {
            level: row.level,
            receipts: row.receipts,
            total_amount: row.total_amount,
        };
        match currencies.last_mut() {
            Some(current) if current.currency == row.currency => {
                current.receipts += row.receipts;
                current.total_amount += row.total_amount;
                current.by_level.push(level);
            }
            _ => currencies.push(CurrencyRevenue {
                currency: row.currency,
                receipts: row.receipts,
                total_amount: row.total_amount,
                total: Decimal::ZERO,
                by_level: vec![level],
            }),
        }
    }

    for currency in &mut currencies {
        currency.total = Decimal::new(currency.total_amount, 2);
    }

    RevenueReport {
        total_receipts: currencies.iter().map(|c| c.receipts).sum(),
        currencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(currency: &str, level: i16, receipts: i64, total_amount: i64) -> RevenueRow {
        RevenueRow {
            currency: currency.to_string(),
            level,
            receipts,
            total_amount,
        }
    }

    #[test]
    fn test_revenue_report_groups_by_currency() {
        let report = build_revenue_report(vec![
            row("chf", 1, 3, 1500),
            row("chf", 2, 2, 3000),
            row("eur", 2, 1, 1200),
        ]);

        assert_eq!(report.total_receipts, 6);
        assert_eq!(report.currencies.len(), 2);

        let chf = &report.currencies[0];
        assert_eq!(chf.currency, "chf");
        assert_eq!(chf.receipts, 5);
        assert_eq!(chf.total_amount, 4500);
        assert_eq!(chf.total, Decimal::from_str("45.00").unwrap());
        assert_eq!(chf.by_level.len(), 2);

        let eur = &report.currencies[1];
        assert_eq!(eur.total, Decimal::from_str("12.00").unwrap());
    }

    #[test]
    fn test_empty_revenue_report() {
        let report = build_revenue_report(Vec::new());
        assert_eq!(report.total_receipts, 0);
        assert!(report.currencies.is_empty());
    }
}
