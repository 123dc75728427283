// Boost checkout reconciliation
//
// Turns a confirmed provider checkout into an active event boost exactly once.
// All state lives in the checkout ledger; the claim in `claim_and_apply` is the
// only gate against duplicate callbacks.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::auth::Caller;
use crate::db::repositories::{
    CheckoutDetails, CheckoutRepository, EventRepository, NewNotification, NewReceipt,
    NotificationRepository, ReceiptRepository, KIND_BOOST_ACTIVATED,
};
use crate::domain::boost::{next_boost_window, BoostLevel};
use crate::handlers::AppState;
use crate::services::session_hash::hash_session_id;

/// Why a reconciliation was refused; carried to the browser as `reason=<code>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Unauthorized,
    Forbidden,
    BoostingDisabled,
    StripeNotConfigured,
    MissingSession,
    MissingHashSecret,
    NotPaid,
    MissingMetadata,
    ServerError,
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::Unauthorized => "unauthorized",
            FailureReason::Forbidden => "forbidden",
            FailureReason::BoostingDisabled => "boosting_disabled",
            FailureReason::StripeNotConfigured => "stripe_not_configured",
            FailureReason::MissingSession => "missing_session",
            FailureReason::MissingHashSecret => "missing_hash_secret",
            FailureReason::NotPaid => "not_paid",
            FailureReason::MissingMetadata => "missing_metadata",
            FailureReason::ServerError => "server_error",
        }
    }
}

/// A refused reconciliation and the context echoed back in the redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileFailure {
    pub reason: FailureReason,
    pub session_id: Option<String>,
    pub event_id: Option<String>,
}

impl ReconcileFailure {
    fn new(reason: FailureReason) -> Self {
        Self {
            reason,
            session_id: None,
            event_id: None,
        }
    }

    fn with_session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    fn with_event(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }
}

/// Effects of a successful claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBoost {
    pub checkout_id: i32,
    pub event_id: String,
    pub level: i16,
    pub boost_until: DateTime<Utc>,
    pub receipt_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// This call won the claim and applied the boost
    Applied(AppliedBoost),
    /// Another call already processed the checkout; nothing changed
    AlreadyProcessed,
}

/// Failures inside the claim transaction. Every variant rolls the claim back.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Event {0} not found")]
    EventNotFound(String),
    #[error("Event {0} is cancelled")]
    EventCancelled(String),
    #[error("Event {0} belongs to another organizer")]
    EventForbidden(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A verified, paid purchase ready to be claimed
#[derive(Debug, Clone)]
pub struct PaidCheckout {
    pub raw_session_id: String,
    pub session_hash: String,
    pub level: BoostLevel,
    pub details: CheckoutDetails,
}

/// Reconciles a provider checkout session after the browser returns from payment.
///
/// Preconditions are checked in a fixed order and each fails fast with its own
/// reason. Unpaid or foreign sessions never touch the database.
pub async fn reconcile(
    state: &AppState,
    caller: Option<&Caller>,
    session_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ReconcileOutcome, ReconcileFailure> {
    let caller = match caller {
        Some(caller) if caller.is_organizer() => caller,
        Some(caller) => {
            info!(
                "Caller {} with role {} cannot reconcile boosts",
                caller.user_id,
                caller.role.as_str()
            );
            return Err(ReconcileFailure::new(FailureReason::Unauthorized));
        }
        None => return Err(ReconcileFailure::new(FailureReason::Unauthorized)),
    };

    if !state.config.boosting_enabled {
        return Err(ReconcileFailure::new(FailureReason::BoostingDisabled));
    }

    let gateway = state
        .gateway
        .as_ref()
        .ok_or_else(|| ReconcileFailure::new(FailureReason::StripeNotConfigured))?;

    let session_id = session_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ReconcileFailure::new(FailureReason::MissingSession))?;

    let secret = state.config.session_hash_secret.as_deref().ok_or_else(|| {
        ReconcileFailure::new(FailureReason::MissingHashSecret).with_session(session_id)
    })?;

    let session_hash = hash_session_id(secret, session_id);

    let session = gateway.retrieve_session(session_id).await.map_err(|e| {
        error!(
            "Failed to retrieve checkout session {}: {}",
            short_hash(&session_hash),
            e
        );
        ReconcileFailure::new(FailureReason::ServerError).with_session(session_id)
    })?;

    if !session.is_paid() {
        info!(
            "Checkout session not paid (payment_status={})",
            session.payment_status
        );
        return Err(ReconcileFailure::new(FailureReason::NotPaid).with_session(session_id));
    }

    let (event_id, organizer_id) = match (
        session.metadata_value("eventId"),
        session.metadata_value("organizerId"),
    ) {
        (Some(event_id), Some(organizer_id)) => (event_id.to_string(), organizer_id.to_string()),
        _ => {
            warn!("Paid checkout session is missing boost metadata");
            return Err(
                ReconcileFailure::new(FailureReason::MissingMetadata).with_session(session_id)
            );
        }
    };

    if organizer_id != caller.user_id {
        warn!(
            "Organizer {} tried to reconcile a checkout of organizer {}",
            caller.user_id, organizer_id
        );
        return Err(ReconcileFailure::new(FailureReason::Forbidden)
            .with_session(session_id)
            .with_event(&event_id));
    }

    let level = BoostLevel::from_metadata(session.metadata_value("level"));
    let currency = session
        .currency
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_else(|| state.config.boost_currency.clone());

    let paid = PaidCheckout {
        raw_session_id: session_id.to_string(),
        session_hash,
        level,
        details: CheckoutDetails {
            level: level.as_i16(),
            amount: session.amount_total.unwrap_or(0),
            currency,
            event_id: event_id.clone(),
            organizer_id,
        },
    };

    match claim_and_apply(state.repositories.connection(), &paid, now).await {
        Ok(Some(applied)) => {
            info!(
                "Boost applied: checkout={} event={} level={} until={}",
                applied.checkout_id, applied.event_id, applied.level, applied.boost_until
            );
            Ok(ReconcileOutcome::Applied(applied))
        }
        Ok(None) => {
            info!(
                "Checkout {} already processed, nothing to do",
                short_hash(&paid.session_hash)
            );
            Ok(ReconcileOutcome::AlreadyProcessed)
        }
        Err(e) => {
            error!(
                "Boost reconciliation rolled back for checkout {}: {}",
                short_hash(&paid.session_hash),
                e
            );
            Err(ReconcileFailure::new(FailureReason::ServerError)
                .with_session(session_id)
                .with_event(&event_id))
        }
    }
}

/// Records the payment, claims the checkout and applies the boost in one transaction.
///
/// Returns `Ok(None)` when the checkout was already claimed. Any error rolls back
/// everything, the claim included, so the checkout stays claimable.
pub async fn claim_and_apply(
    db: &DatabaseConnection,
    paid: &PaidCheckout,
    now: DateTime<Utc>,
) -> Result<Option<AppliedBoost>, ApplyError> {
    let txn = db.begin().await?;

    match apply_in_transaction(&txn, paid, now).await {
        Ok(applied) => {
            txn.commit().await?;
            Ok(applied)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn apply_in_transaction(
    txn: &DatabaseTransaction,
    paid: &PaidCheckout,
    now: DateTime<Utc>,
) -> Result<Option<AppliedBoost>, ApplyError> {
    let checkout = CheckoutRepository::upsert_paid(
        txn,
        &paid.session_hash,
        &paid.raw_session_id,
        &paid.details,
        now,
    )
    .await?;

    if !CheckoutRepository::claim(txn, checkout.id, now).await? {
        return Ok(None);
    }

    let event_id = &paid.details.event_id;
    let event = EventRepository::find_for_update(txn, event_id)
        .await?
        .ok_or_else(|| ApplyError::EventNotFound(event_id.clone()))?;
    if event.is_cancelled {
        return Err(ApplyError::EventCancelled(event_id.clone()));
    }
    if event.organizer_id != paid.details.organizer_id {
        return Err(ApplyError::EventForbidden(event_id.clone()));
    }

    let window = next_boost_window(event.boost_until, event.boost_level, paid.level, now);
    let title = event.title.clone();
    EventRepository::apply_boost(txn, event, window.level, window.until, now).await?;

    let receipt = ReceiptRepository::upsert(
        txn,
        &NewReceipt {
            boost_checkout_id: checkout.id,
            event_id: event_id.clone(),
            organizer_id: paid.details.organizer_id.clone(),
            event_title: title.clone(),
            level: paid.level.as_i16(),
            amount: paid.details.amount,
            currency: paid.details.currency.clone(),
            boost_until: window.until,
        },
        now,
    )
    .await?;

    NotificationRepository::insert(
        txn,
        NewNotification {
            user_id: paid.details.organizer_id.clone(),
            kind: KIND_BOOST_ACTIVATED.to_string(),
            title: format!("{} boost active", paid.level.label()),
            body: format!(
                "\"{}\" is boosted until {}.",
                title,
                window.until.format("%Y-%m-%d %H:%M UTC")
            ),
            link: Some(format!("/events/{}", event_id)),
        },
        now,
    )
    .await?;

    Ok(Some(AppliedBoost {
        checkout_id: checkout.id,
        event_id: event_id.clone(),
        level: window.level,
        boost_until: window.until,
        receipt_id: receipt.id,
    }))
}

/// Log-safe prefix of a session hash
fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}
