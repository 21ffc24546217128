//! Demo data set loaded at startup.
//!
//! The assistant's canned replies quote these numbers (three products, the
//! Coffee Mug at 5 of 15 units, $449.97 in recent sales).

use chrono::{DateTime, TimeDelta, Utc};

use stockroom_core::{Email, Money, NotificationId, ProductId, Role, TransactionId, UserId};

use crate::models::{
    BackupFrequency, Identity, Notification, NotificationKind, Product, Settings, Transaction,
    TransactionKind,
};

/// Domain every demo account lives on.
const DEMO_DOMAIN: &str = "inventory.com";

fn demo_email(local: &str) -> Email {
    let raw = format!("{local}@{DEMO_DOMAIN}");
    // Literal addresses below are well-formed.
    Email::parse(&raw).unwrap_or_else(|_| unreachable!("demo address {raw} is valid"))
}

/// The three demo accounts, one per role.
#[must_use]
pub fn users(now: DateTime<Utc>) -> Vec<Identity> {
    let created = now - TimeDelta::days(90);
    [
        (1, "admin", "Admin User", Role::Admin),
        (2, "assistant", "Assistant User", Role::Assistant),
        (3, "cashier", "Cashier User", Role::Cashier),
    ]
    .into_iter()
    .map(|(id, local, name, role)| Identity {
        id: UserId::new(id),
        email: demo_email(local),
        name: name.to_string(),
        role,
        avatar: None,
        created_at: created,
        last_login: None,
    })
    .collect()
}

#[must_use]
pub fn products(now: DateTime<Utc>) -> Vec<Product> {
    let created = now - TimeDelta::days(60);
    vec![
        Product {
            id: ProductId::new(1),
            name: "Wireless Headphones".to_string(),
            description: "Bluetooth over-ear headphones with noise cancellation".to_string(),
            sku: "ELEC-001".to_string(),
            category: "Electronics".to_string(),
            price: Money::from_cents(9999),
            cost: Money::from_cents(4500),
            stock: 25,
            min_stock: 10,
            supplier: "TechSupply Co.".to_string(),
            image: None,
            created_at: created,
            updated_at: now - TimeDelta::days(1),
        },
        Product {
            id: ProductId::new(2),
            name: "Coffee Mug".to_string(),
            description: "12oz ceramic mug, dishwasher safe".to_string(),
            sku: "HOME-001".to_string(),
            category: "Kitchen".to_string(),
            price: Money::from_cents(1299),
            cost: Money::from_cents(450),
            stock: 5,
            min_stock: 15,
            supplier: "HomeGoods Inc.".to_string(),
            image: None,
            created_at: created,
            updated_at: now - TimeDelta::days(3),
        },
        Product {
            id: ProductId::new(3),
            name: "Ergonomic Office Chair".to_string(),
            description: "Adjustable mesh chair with lumbar support".to_string(),
            sku: "FURN-001".to_string(),
            category: "Furniture".to_string(),
            price: Money::from_cents(24999),
            cost: Money::from_cents(12000),
            stock: 12,
            min_stock: 5,
            supplier: "OfficePro Ltd.".to_string(),
            image: None,
            created_at: created,
            updated_at: now - TimeDelta::days(2),
        },
    ]
}

/// Recent stock movements, newest first.
#[must_use]
pub fn transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    let movement = |id: i32,
                    kind: TransactionKind,
                    (product_id, product_name): (i32, &str),
                    quantity: u32,
                    unit_cents: u32,
                    (user_id, user_name): (i32, &str),
                    days_ago: i64,
                    notes: Option<&str>| {
        let unit_price = Money::from_cents(unit_cents);
        Transaction {
            id: TransactionId::new(id),
            kind,
            product_id: ProductId::new(product_id),
            product_name: product_name.to_string(),
            quantity,
            unit_price,
            total_amount: unit_price.times(quantity),
            user_id: UserId::new(user_id),
            user_name: user_name.to_string(),
            created_at: now - TimeDelta::days(days_ago),
            notes: notes.map(str::to_string),
        }
    };

    vec![
        movement(
            1,
            TransactionKind::Sale,
            (1, "Wireless Headphones"),
            2,
            9999,
            (3, "Cashier User"),
            1,
            None,
        ),
        movement(
            2,
            TransactionKind::Sale,
            (3, "Ergonomic Office Chair"),
            1,
            24999,
            (3, "Cashier User"),
            2,
            None,
        ),
        movement(
            3,
            TransactionKind::Purchase,
            (2, "Coffee Mug"),
            50,
            450,
            (1, "Admin User"),
            5,
            Some("Restock from HomeGoods Inc."),
        ),
        movement(
            4,
            TransactionKind::Adjustment,
            (2, "Coffee Mug"),
            3,
            1299,
            (2, "Assistant User"),
            6,
            Some("Damaged in storage"),
        ),
    ]
}

/// Navbar notifications, newest first.
#[must_use]
pub fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        Notification {
            id: NotificationId::new(1),
            title: "Low stock alert".to_string(),
            message: "Coffee Mug is below its minimum stock level".to_string(),
            kind: NotificationKind::Warning,
            read: false,
            created_at: now - TimeDelta::hours(2),
            user_id: None,
        },
        Notification {
            id: NotificationId::new(2),
            title: "New sale".to_string(),
            message: "2 x Wireless Headphones sold".to_string(),
            kind: NotificationKind::Success,
            read: false,
            created_at: now - TimeDelta::days(1),
            user_id: None,
        },
        Notification {
            id: NotificationId::new(3),
            title: "Backup completed".to_string(),
            message: "Daily backup finished without errors".to_string(),
            kind: NotificationKind::Info,
            read: true,
            created_at: now - TimeDelta::days(2),
            user_id: Some(UserId::new(1)),
        },
        Notification {
            id: NotificationId::new(4),
            title: "Scheduled maintenance".to_string(),
            message: "The console will be briefly unavailable on Sunday".to_string(),
            kind: NotificationKind::Info,
            read: true,
            created_at: now - TimeDelta::days(3),
            user_id: None,
        },
    ]
}

#[must_use]
pub fn settings() -> Settings {
    Settings {
        company_name: "My Inventory Company".to_string(),
        admin_email: demo_email("admin"),
        low_stock_threshold: 10,
        auto_reorder_enabled: false,
        email_notifications: true,
        push_notifications: false,
        backup_frequency: BackupFrequency::Daily,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_sales_total_matches_assistant_copy() {
        let total: Money = transactions(Utc::now())
            .iter()
            .filter(|t| t.kind == TransactionKind::Sale)
            .map(|t| t.total_amount)
            .sum();
        assert_eq!(total.to_string(), "$449.97");
    }

    #[test]
    fn test_one_account_per_role() {
        let roles: Vec<_> = users(Utc::now()).iter().map(|u| u.role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
    }
}
