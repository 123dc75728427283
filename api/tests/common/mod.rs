// Shared fixtures: in-memory database, scripted payment gateway, fixed caller

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use http::HeaderMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbBackend, EntityTrait, PaginatorTrait, QueryFilter, Schema, Set,
};

use viao_api::auth::{Authenticator, Caller, Role};
use viao_api::config::ApiConfig;
use viao_api::db::Repositories;
use viao_api::entity::{boost_checkouts, boost_receipts, events, notifications};
use viao_api::handlers::{AppContext, AppState};
use viao_api::payments::{CheckoutGateway, CheckoutSession, GatewayError, NewCheckoutSession};

pub const HASH_SECRET: &str = "test-hash-secret";
pub const APP_URL: &str = "https://viao.test";
pub const ORGANIZER: &str = "org_alice";
pub const OTHER_ORGANIZER: &str = "org_bob";

/// Fixed point in time the tests reconcile at
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

pub fn organizer(user_id: &str) -> Caller {
    Caller {
        user_id: user_id.to_string(),
        role: Role::Organizer,
    }
}

pub fn admin() -> Caller {
    Caller {
        user_id: "admin_1".to_string(),
        role: Role::Admin,
    }
}

/// Fresh in-memory database with the boost schema
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    // One connection keeps the in-memory database alive and shared
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();

    let schema = Schema::new(DbBackend::Sqlite);
    let backend = db.get_database_backend();
    let statements = [
        schema.create_table_from_entity(events::Entity),
        schema.create_table_from_entity(boost_checkouts::Entity),
        schema.create_table_from_entity(boost_receipts::Entity),
        schema.create_table_from_entity(notifications::Entity),
    ];
    for statement in statements.iter() {
        db.execute(backend.build(statement)).await.unwrap();
    }
    db
}

pub async fn seed_event(
    db: &DatabaseConnection,
    id: &str,
    organizer_id: &str,
    is_cancelled: bool,
    boost_level: i16,
    boost_until: Option<DateTime<Utc>>,
) -> events::Model {
    events::ActiveModel {
        id: Set(id.to_string()),
        organizer_id: Set(organizer_id.to_string()),
        title: Set(format!("Event {}", id)),
        starts_at: Set(now() + Duration::days(7)),
        is_cancelled: Set(is_cancelled),
        is_boosted: Set(boost_level > 0),
        boost_level: Set(boost_level),
        boost_until: Set(boost_until),
        created_at: Set(now() - Duration::days(1)),
        updated_at: Set(now() - Duration::days(1)),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn get_event(db: &DatabaseConnection, id: &str) -> events::Model {
    events::Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

pub async fn checkout_rows(db: &DatabaseConnection) -> Vec<boost_checkouts::Model> {
    boost_checkouts::Entity::find().all(db).await.unwrap()
}

pub async fn checkout_by_hash(
    db: &DatabaseConnection,
    session_hash: &str,
) -> Option<boost_checkouts::Model> {
    boost_checkouts::Entity::find()
        .filter(boost_checkouts::Column::SessionHash.eq(session_hash))
        .one(db)
        .await
        .unwrap()
}

pub async fn receipt_rows(db: &DatabaseConnection) -> Vec<boost_receipts::Model> {
    boost_receipts::Entity::find().all(db).await.unwrap()
}

pub async fn notification_count(db: &DatabaseConnection) -> u64 {
    notifications::Entity::find().count(db).await.unwrap()
}

/// A checkout session as the provider would report it
pub fn paid_session(id: &str, event_id: &str, organizer_id: &str, level: &str) -> CheckoutSession {
    let mut metadata = HashMap::new();
    metadata.insert("eventId".to_string(), event_id.to_string());
    metadata.insert("organizerId".to_string(), organizer_id.to_string());
    metadata.insert("level".to_string(), level.to_string());
    CheckoutSession {
        id: id.to_string(),
        payment_status: "paid".to_string(),
        amount_total: Some(if level == "2" { 1500 } else { 500 }),
        currency: Some("chf".to_string()),
        metadata,
        url: None,
    }
}

/// Payment gateway that answers from a scripted set of sessions
#[derive(Default)]
pub struct FakeGateway {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    created: Mutex<Vec<NewCheckoutSession>>,
    pub retrieve_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn with_sessions(sessions: Vec<CheckoutSession>) -> Arc<Self> {
        let gateway = FakeGateway::default();
        {
            let mut map = gateway.sessions.lock().unwrap();
            for session in sessions {
                map.insert(session.id.clone(), session);
            }
        }
        Arc::new(gateway)
    }

    pub fn retrieve_count(&self) -> usize {
        self.retrieve_calls.load(Ordering::SeqCst)
    }

    pub fn created_sessions(&self) -> Vec<NewCheckoutSession> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutGateway for FakeGateway {
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or(GatewayError::Api {
                status: 404,
                message: format!("No such checkout.session: '{}'", session_id),
            })
    }

    async fn create_session(
        &self,
        request: &NewCheckoutSession,
    ) -> Result<CheckoutSession, GatewayError> {
        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        let id = format!("cs_created_{}", created.len());
        Ok(CheckoutSession {
            id: id.clone(),
            payment_status: "unpaid".to_string(),
            amount_total: Some(request.amount),
            currency: Some(request.currency.clone()),
            metadata: request.metadata.iter().cloned().collect(),
            url: Some(format!("https://checkout.test/pay/{}", id)),
        })
    }
}

/// Authenticator that always resolves the same caller
pub struct FixedAuthenticator(pub Option<Caller>);

impl Authenticator for FixedAuthenticator {
    fn authenticate(&self, _headers: &HeaderMap) -> Option<Caller> {
        self.0.clone()
    }
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        app_url: Some(APP_URL.to_string()),
        boosting_enabled: true,
        session_hash_secret: Some(HASH_SECRET.to_string()),
        ..ApiConfig::default()
    }
}

pub fn app_state(
    db: &DatabaseConnection,
    config: ApiConfig,
    gateway: Option<Arc<FakeGateway>>,
    caller: Option<Caller>,
) -> AppState {
    Arc::new(AppContext {
        config,
        repositories: Repositories::new(db.clone()),
        gateway: gateway.map(|g| g as Arc<dyn CheckoutGateway>),
        authenticator: Arc::new(FixedAuthenticator(caller)),
    })
}
