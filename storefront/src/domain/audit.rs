//! Audit log read model with typed change sets.
//!
//! Each audit row names the table it refers to and carries `old`/`new`
//! snapshots. The snapshots decode into the audited table's own draft type,
//! so consumers match on [`AuditChanges`] instead of probing an untyped map.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::{OrderDraft, ProductDraft};

/// Errors raised while decoding an audit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditDecodeError {
    /// The audited table has no typed change set.
    UnknownTable {
        /// Table named by the row.
        table_name: String,
    },
    /// A snapshot does not match the audited table's shape.
    InvalidSnapshot {
        /// Table named by the row.
        table_name: String,
        /// Decoder message.
        message: String,
    },
}

impl fmt::Display for AuditDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTable { table_name } => {
                write!(f, "audit log refers to unsupported table {table_name}")
            }
            Self::InvalidSnapshot {
                table_name,
                message,
            } => write!(f, "invalid {table_name} audit snapshot: {message}"),
        }
    }
}

impl std::error::Error for AuditDecodeError {}

/// Before and after snapshots of one audited record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet<T> {
    /// State before the change; absent for inserts.
    pub old: Option<T>,
    /// State after the change; absent for deletes.
    pub new: Option<T>,
}

/// Typed change set keyed by the audited table.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditChanges {
    /// Change to a product row.
    Products(ChangeSet<ProductDraft>),
    /// Change to an order row.
    Orders(ChangeSet<OrderDraft>),
}

impl AuditChanges {
    /// Name of the audited table.
    #[must_use]
    pub const fn table_name(&self) -> &'static str {
        match self {
            Self::Products(_) => "products",
            Self::Orders(_) => "orders",
        }
    }
}

/// One administrative change recorded by the remote service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "AuditLogDraft")]
pub struct AuditLog {
    /// Row identifier.
    id: Uuid,
    /// Acting administrator, if known.
    admin_id: Option<Uuid>,
    /// Action name such as `update`.
    action: String,
    /// Identifier of the audited record.
    record_id: String,
    /// Typed snapshots of the audited record.
    changes: AuditChanges,
    /// Creation timestamp.
    created_at: DateTime<Utc>,
}

impl AuditLog {
    /// Row identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Acting administrator, if known.
    #[must_use]
    pub const fn admin_id(&self) -> Option<Uuid> {
        self.admin_id
    }

    /// Action name such as `update`.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Identifier of the audited record.
    #[must_use]
    pub fn record_id(&self) -> &str {
        self.record_id.as_str()
    }

    /// Typed snapshots of the audited record.
    #[must_use]
    pub const fn changes(&self) -> &AuditChanges {
        &self.changes
    }

    /// Consume the log and return its change set.
    #[must_use]
    pub fn into_changes(self) -> AuditChanges {
        self.changes
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Deserialize)]
struct AuditLogDraft {
    id: Uuid,
    #[serde(default)]
    admin_id: Option<Uuid>,
    action: String,
    table_name: String,
    record_id: String,
    changes: RawChangeSet,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawChangeSet {
    #[serde(default)]
    old: Option<Value>,
    #[serde(default)]
    new: Option<Value>,
}

impl RawChangeSet {
    fn decode<T: DeserializeOwned>(self, table_name: &str) -> Result<ChangeSet<T>, AuditDecodeError> {
        let snapshot = |value: Option<Value>| {
            value
                .filter(|raw| !raw.is_null())
                .map(serde_json::from_value::<T>)
                .transpose()
                .map_err(|err| AuditDecodeError::InvalidSnapshot {
                    table_name: table_name.to_owned(),
                    message: err.to_string(),
                })
        };
        Ok(ChangeSet {
            old: snapshot(self.old)?,
            new: snapshot(self.new)?,
        })
    }
}

/// Strip an optional schema qualifier (`ecommerce.products` → `products`).
fn unqualified(table_name: &str) -> &str {
    table_name
        .rsplit_once('.')
        .map_or(table_name, |(_, name)| name)
}

impl TryFrom<AuditLogDraft> for AuditLog {
    type Error = AuditDecodeError;

    fn try_from(value: AuditLogDraft) -> Result<Self, Self::Error> {
        let changes = match unqualified(&value.table_name) {
            "products" => AuditChanges::Products(value.changes.decode(&value.table_name)?),
            "orders" => AuditChanges::Orders(value.changes.decode(&value.table_name)?),
            _ => {
                return Err(AuditDecodeError::UnknownTable {
                    table_name: value.table_name,
                });
            }
        };
        Ok(Self {
            id: value.id,
            admin_id: value.admin_id,
            action: value.action,
            record_id: value.record_id,
            changes,
            created_at: value.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for typed audit change sets.

    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn product_snapshot(price: i64) -> Value {
        json!({
            "id": "abc",
            "name": "Walnut desk",
            "price": price,
            "discount_percent": 0,
            "discount_amount": 0,
            "available_count": 1,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    fn audit_row(table_name: &str, changes: Value) -> Value {
        json!({
            "id": "7d9f1c2a-1111-4a4a-9c9c-000000000020",
            "admin_id": null,
            "action": "update",
            "table_name": table_name,
            "record_id": "abc",
            "changes": changes,
            "created_at": "2024-05-01T10:00:00Z"
        })
    }

    #[rstest]
    fn decodes_product_price_change() {
        let row = audit_row(
            "ecommerce.products",
            json!({ "old": product_snapshot(100), "new": product_snapshot(90) }),
        );
        let log: AuditLog = serde_json::from_value(row).expect("valid audit row");
        let AuditChanges::Products(change) = log.changes() else {
            panic!("expected product change set, got {:?}", log.changes());
        };
        assert_eq!(log.changes().table_name(), "products");
        assert_eq!(log.action(), "update");
        assert_eq!(log.record_id(), "abc");
        assert_eq!(
            change.old.as_ref().map(|draft| draft.price),
            Some(Decimal::new(100, 0))
        );
        assert_eq!(
            change.new.as_ref().map(|draft| draft.price),
            Some(Decimal::new(90, 0))
        );
    }

    #[rstest]
    fn insert_has_no_old_snapshot() {
        let row = audit_row("products", json!({ "old": null, "new": product_snapshot(5) }));
        let log: AuditLog = serde_json::from_value(row).expect("valid audit row");
        let AuditChanges::Products(change) = log.into_changes() else {
            panic!("expected product change set");
        };
        assert!(change.old.is_none());
        assert!(change.new.is_some());
    }

    #[rstest]
    fn rejects_unknown_tables() {
        let row = audit_row("coupons", json!({ "old": null, "new": null }));
        let err = serde_json::from_value::<AuditLog>(row).expect_err("unsupported table");
        assert!(err.to_string().contains("unsupported table coupons"));
    }

    #[rstest]
    fn rejects_mismatched_snapshots() {
        let row = audit_row("orders", json!({ "old": null, "new": product_snapshot(5) }));
        let err = serde_json::from_value::<AuditLog>(row).expect_err("shape mismatch");
        assert!(err.to_string().contains("invalid orders audit snapshot"));
    }
}
