mod common;

use chrono::Duration;

use common::*;
use viao_api::auth::{Caller, Role};
use viao_api::domain::boost::BoostLevel;
use viao_api::error::ViaoError;
use viao_api::models::CreateCheckoutRequest;
use viao_api::services::boost_query_service;
use viao_api::services::boost_service::{reconcile, ReconcileOutcome};
use viao_api::services::checkout_service::create_checkout;
use viao_api::services::session_hash::hash_session_id;

fn request(event_id: &str, level: BoostLevel) -> CreateCheckoutRequest {
    CreateCheckoutRequest {
        event_id: event_id.to_string(),
        level,
    }
}

#[tokio::test]
async fn test_create_checkout_records_ledger_row() {
    let db = setup_db().await;
    seed_event(&db, "evt_1", ORGANIZER, false, 0, None).await;
    let gateway = FakeGateway::with_sessions(Vec::new());
    let state = app_state(&db, test_config(), Some(gateway.clone()), None);
    let caller = organizer(ORGANIZER);

    let response = create_checkout(
        &state,
        Some(&caller),
        &request("evt_1", BoostLevel::Premium),
        APP_URL,
        now(),
    )
    .await
    .unwrap();

    assert_eq!(response.session_id, "cs_created_1");
    assert!(response.url.is_some());

    let created = gateway.created_sessions();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].amount, 1500);
    assert_eq!(created[0].currency, "chf");
    assert_eq!(
        created[0].success_url,
        "https://viao.test/api/stripe/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(
        created[0].cancel_url,
        "https://viao.test/events?payment=cancelled&eventId=evt_1"
    );
    assert!(created[0]
        .metadata
        .contains(&("organizerId".to_string(), ORGANIZER.to_string())));
    assert!(created[0]
        .metadata
        .contains(&("level".to_string(), "2".to_string())));

    let checkouts = checkout_rows(&db).await;
    assert_eq!(checkouts.len(), 1);
    assert_eq!(checkouts[0].status, "CREATED");
    assert_eq!(checkouts[0].processed_at, None);
    assert_eq!(
        checkouts[0].session_hash.as_deref(),
        Some(hash_session_id(HASH_SECRET, "cs_created_1").as_str())
    );

    let by_hash = checkout_by_hash(&db, &hash_session_id(HASH_SECRET, "cs_created_1")).await;
    assert_eq!(by_hash.map(|row| row.level), Some(2));
}

#[tokio::test]
async fn test_create_checkout_rejects_foreign_and_cancelled_events() {
    let db = setup_db().await;
    seed_event(&db, "evt_theirs", OTHER_ORGANIZER, false, 0, None).await;
    seed_event(&db, "evt_cancelled", ORGANIZER, true, 0, None).await;
    let gateway = FakeGateway::with_sessions(Vec::new());
    let state = app_state(&db, test_config(), Some(gateway.clone()), None);
    let caller = organizer(ORGANIZER);

    let result = create_checkout(
        &state,
        Some(&caller),
        &request("evt_theirs", BoostLevel::Basic),
        APP_URL,
        now(),
    )
    .await;
    assert!(matches!(result, Err(ViaoError::Forbidden(_))));

    let result = create_checkout(
        &state,
        Some(&caller),
        &request("evt_cancelled", BoostLevel::Basic),
        APP_URL,
        now(),
    )
    .await;
    assert!(matches!(result, Err(ViaoError::InvalidRequest(_))));

    let result = create_checkout(
        &state,
        Some(&caller),
        &request("evt_missing", BoostLevel::Basic),
        APP_URL,
        now(),
    )
    .await;
    assert!(matches!(result, Err(ViaoError::NotFound(_))));

    assert!(gateway.created_sessions().is_empty());
    assert!(checkout_rows(&db).await.is_empty());
}

#[tokio::test]
async fn test_checkout_then_reconcile_reuses_the_ledger_row() {
    let db = setup_db().await;
    seed_event(&db, "evt_1", ORGANIZER, false, 0, None).await;
    let gateway = FakeGateway::with_sessions(vec![paid_session(
        "cs_created_1",
        "evt_1",
        ORGANIZER,
        "1",
    )]);
    let state = app_state(&db, test_config(), Some(gateway), None);
    let caller = organizer(ORGANIZER);

    create_checkout(
        &state,
        Some(&caller),
        &request("evt_1", BoostLevel::Basic),
        APP_URL,
        now(),
    )
    .await
    .unwrap();

    let outcome = reconcile(
        &state,
        Some(&caller),
        Some("cs_created_1"),
        now() + Duration::minutes(2),
    )
    .await;
    assert!(matches!(outcome, Ok(ReconcileOutcome::Applied(_))));

    let checkouts = checkout_rows(&db).await;
    assert_eq!(checkouts.len(), 1);
    assert_eq!(checkouts[0].status, "PROCESSED");
    assert_eq!(receipt_rows(&db).await.len(), 1);
}

#[tokio::test]
async fn test_boosted_listing_skips_expired_and_orders_by_level() {
    let db = setup_db().await;
    seed_event(&db, "evt_basic", ORGANIZER, false, 1, Some(now() + Duration::hours(20))).await;
    seed_event(&db, "evt_premium", ORGANIZER, false, 2, Some(now() + Duration::hours(2))).await;
    seed_event(&db, "evt_expired", ORGANIZER, false, 2, Some(now() - Duration::hours(1))).await;
    seed_event(&db, "evt_cancelled", ORGANIZER, true, 2, Some(now() + Duration::hours(9))).await;
    seed_event(&db, "evt_plain", ORGANIZER, false, 0, None).await;
    let state = app_state(&db, test_config(), None, None);

    let response = boost_query_service::get_boosted_events(&state, now())
        .await
        .unwrap();

    let ids: Vec<&str> = response.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["evt_premium", "evt_basic"]);
    assert_eq!(response.events[0].boost_level, 2);
}

#[tokio::test]
async fn test_receipts_and_notifications_are_scoped_to_the_caller() {
    let db = setup_db().await;
    seed_event(&db, "evt_1", ORGANIZER, false, 0, None).await;
    let gateway = FakeGateway::with_sessions(vec![paid_session("cs_1", "evt_1", ORGANIZER, "2")]);
    let state = app_state(&db, test_config(), Some(gateway), None);
    let caller = organizer(ORGANIZER);
    reconcile(&state, Some(&caller), Some("cs_1"), now()).await.unwrap();

    let mine = boost_query_service::get_receipts(&state, Some(&caller))
        .await
        .unwrap();
    assert_eq!(mine.receipts.len(), 1);
    assert_eq!(mine.receipts[0].amount, 1500);

    let other = organizer(OTHER_ORGANIZER);
    let theirs = boost_query_service::get_receipts(&state, Some(&other))
        .await
        .unwrap();
    assert!(theirs.receipts.is_empty());

    let feed = boost_query_service::get_notifications(&state, Some(&caller))
        .await
        .unwrap();
    assert_eq!(feed.notifications.len(), 1);
    assert_eq!(feed.notifications[0].kind, "BOOST_ACTIVATED");
    assert_eq!(feed.notifications[0].link.as_deref(), Some("/events/evt_1"));
    assert!(!feed.notifications[0].read);

    let result = boost_query_service::get_receipts(&state, None).await;
    assert!(matches!(result, Err(ViaoError::Unauthorized)));
}

#[tokio::test]
async fn test_revenue_report_is_admin_only() {
    let db = setup_db().await;
    seed_event(&db, "evt_1", ORGANIZER, false, 0, None).await;
    seed_event(&db, "evt_2", ORGANIZER, false, 0, None).await;
    let gateway = FakeGateway::with_sessions(vec![
        paid_session("cs_1", "evt_1", ORGANIZER, "2"),
        paid_session("cs_2", "evt_2", ORGANIZER, "1"),
        paid_session("cs_3", "evt_1", ORGANIZER, "1"),
    ]);
    let state = app_state(&db, test_config(), Some(gateway), None);
    let caller = organizer(ORGANIZER);
    for id in ["cs_1", "cs_2", "cs_3"] {
        reconcile(&state, Some(&caller), Some(id), now()).await.unwrap();
    }

    let result = boost_query_service::get_revenue_report(&state, Some(&caller)).await;
    assert!(matches!(result, Err(ViaoError::Forbidden(_))));

    let report = boost_query_service::get_revenue_report(&state, Some(&admin()))
        .await
        .unwrap();
    assert_eq!(report.total_receipts, 3);
    assert_eq!(report.currencies.len(), 1);
    assert_eq!(report.currencies[0].currency, "chf");
    assert_eq!(report.currencies[0].total_amount, 2500);
    assert_eq!(report.currencies[0].by_level.len(), 2);
}

#[tokio::test]
async fn test_plain_users_cannot_open_checkouts() {
    let db = setup_db().await;
    seed_event(&db, "evt_1", ORGANIZER, false, 0, None).await;
    let state = app_state(
        &db,
        test_config(),
        Some(FakeGateway::with_sessions(Vec::new())),
        None,
    );
    let user = Caller {
        user_id: ORGANIZER.to_string(),
        role: Role::User,
    };

    let result = create_checkout(
        &state,
        Some(&user),
        &request("evt_1", BoostLevel::Basic),
        APP_URL,
        now(),
    )
    .await;
    assert!(matches!(result, Err(ViaoError::Forbidden(_))));
}
