// Database repository management

mod checkout_repository;
mod event_repository;
mod notification_repository;
mod receipt_repository;

pub use checkout_repository::{CheckoutDetails, CheckoutRepository, CheckoutStatus};
pub use event_repository::EventRepository;
pub use notification_repository::{NewNotification, NotificationRepository, KIND_BOOST_ACTIVATED};
pub use receipt_repository::{NewReceipt, ReceiptRepository, RevenueRow};

use sea_orm::DatabaseConnection;

/// Container for all database repositories
pub struct Repositories {
    conn: DatabaseConnection,
    pub events: EventRepository,
    pub checkouts: CheckoutRepository,
    pub receipts: ReceiptRepository,
    pub notifications: NotificationRepository,
}

impl Repositories {
    /// Creates a new repositories container with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Repositories {
            events: EventRepository::new(conn.clone()),
            checkouts: CheckoutRepository::new(conn.clone()),
            receipts: ReceiptRepository::new(conn.clone()),
            notifications: NotificationRepository::new(conn.clone()),
            conn,
        }
    }

    /// Connection used to open transactions spanning several repositories
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}
