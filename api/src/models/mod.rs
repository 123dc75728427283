// API request/response models
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::boost::BoostLevel;
use crate::entity::{boost_receipts, events, notifications};

/// Query parameters for GET /api/stripe/success
#[derive(Debug, Deserialize, Default)]
pub struct StripeSuccessQuery {
    pub session_id: Option<String>,
}

/// Request body for POST /api/stripe/checkout
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub event_id: String,
    pub level: BoostLevel,
}

/// Response for POST /api/stripe/checkout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub session_id: String,
    pub url: Option<String>,
}

/// Event with an active boost, as listed on the discovery page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostedEventData {
    pub id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub boost_level: i16,
    pub boost_until: DateTime<Utc>,
}

/// Response for GET /api/events/boosted
#[derive(Debug, Serialize)]
pub struct BoostedEventsResponse {
    pub events: Vec<BoostedEventData>,
}

impl BoostedEventData {
    pub fn new(event: events::Model, level: i16, until: DateTime<Utc>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            starts_at: event.starts_at,
            boost_level: level,
            boost_until: until,
        }
    }
}

/// Billing record shown to the organizer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub id: i32,
    pub event_id: String,
    pub event_title: String,
    pub level: i16,
    pub amount: i64,
    pub currency: String,
    pub boost_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<boost_receipts::Model> for ReceiptData {
    fn from(receipt: boost_receipts::Model) -> Self {
        Self {
            id: receipt.id,
            event_id: receipt.event_id,
            event_title: receipt.event_title,
            level: receipt.level,
            amount: receipt.amount,
            currency: receipt.currency,
            boost_until: receipt.boost_until,
            created_at: receipt.created_at,
        }
    }
}

/// Response for GET /api/boosts/receipts
#[derive(Debug, Serialize)]
pub struct ReceiptsResponse {
    pub receipts: Vec<ReceiptData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub id: i32,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for NotificationData {
    fn from(n: notifications::Model) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            title: n.title,
            body: n.body,
            link: n.link,
            read: n.read_at.is_some(),
            created_at: n.created_at,
        }
    }
}

/// Response for GET /api/notifications
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationData>,
}

/// Revenue of one tier in one currency
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelRevenue {
    pub level: i16,
    pub receipts: i64,
    pub total_amount: i64,
}

/// Revenue in one currency
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRevenue {
    pub currency: String,
    pub receipts: i64,
    /// Minor units
    pub total_amount: i64,
    /// Major units, two decimals
    pub total: Decimal,
    pub by_level: Vec<LevelRevenue>,
}

/// Response for GET /api/admin/boosts/revenue
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub total_receipts: i64,
    pub currencies: Vec<CurrencyRevenue>,
}
