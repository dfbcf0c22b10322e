//! Status enums for orders, quick orders, reviews, and admin roles.
//!
//! All statuses are stored as snake_case TEXT in `PostgreSQL` and parsed back
//! through `FromStr`. A status value in the database that no longer parses is
//! data corruption, not a user error, and repositories report it as such.
//!
//! Status changes are deliberately unconstrained: an operator may move an
//! order from any status to any other status, including backwards. There is
//! no transition table to fight when a warehouse mistake needs undoing.

use serde::{Deserialize, Serialize};

/// Implements `Display`, `FromStr`, and TEXT-backed sqlx codecs for a status
/// enum from a `variant => "wire_name"` listing.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// All variants, in display order for admin select menus.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The snake_case wire name, as stored in the database.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                s.parse::<Self>().map_err(Into::into)
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

/// Lifecycle status of a regular (checkout) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed, nobody has looked at it yet.
    #[default]
    New,
    /// Being picked and packed.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// Confirmed received by the customer.
    Delivered,
    /// Cancelled by the customer or an operator.
    Cancelled,
}

text_enum!(OrderStatus {
    New => "new",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

impl OrderStatus {
    /// Human-readable label for admin screens.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Lifecycle status of a quick order (name + phone callback request).
///
/// Quick orders skip shipping, so their pipeline ends at `Completed`
/// rather than `Shipped`/`Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuickOrderStatus {
    #[default]
    New,
    Processing,
    Completed,
    Cancelled,
}

text_enum!(QuickOrderStatus {
    New => "new",
    Processing => "processing",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl QuickOrderStatus {
    /// Human-readable label for admin screens.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Moderation status of a customer review.
///
/// Only `Approved` reviews are shown on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

text_enum!(ReviewStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

impl ReviewStatus {
    /// Human-readable label for admin screens.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to all admin features including admin user management.
    SuperAdmin,
    /// Full access to store management features.
    Admin,
    /// Read-only access to store data.
    Viewer,
}

text_enum!(AdminRole {
    SuperAdmin => "super_admin",
    Admin => "admin",
    Viewer => "viewer",
});

impl AdminRole {
    /// Human-readable label for admin screens.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super admin",
            Self::Admin => "Admin",
            Self::Viewer => "Viewer",
        }
    }

    /// Whether this role may change store data.
    ///
    /// Viewers browse the admin panel read-only; catalog, order, and
    /// review mutations need `Admin` or `SuperAdmin`.
    #[must_use]
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        assert!("teleported".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
        // Wire names are lowercase only
        assert!("New".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_quick_order_status_roundtrip() {
        for status in QuickOrderStatus::ALL {
            let parsed: QuickOrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn test_quick_order_status_has_no_shipped() {
        // Quick orders complete without a shipping leg
        assert!("shipped".parse::<QuickOrderStatus>().is_err());
        assert!("completed".parse::<QuickOrderStatus>().is_ok());
        // And regular orders have no "completed"
        assert!("completed".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_review_status_roundtrip() {
        for status in ReviewStatus::ALL {
            let parsed: ReviewStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn test_admin_role_roundtrip() {
        for role in AdminRole::ALL {
            let parsed: AdminRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, *role);
        }
    }

    #[test]
    fn test_admin_role_edit_rights() {
        assert!(AdminRole::SuperAdmin.can_edit());
        assert!(AdminRole::Admin.can_edit());
        assert!(!AdminRole::Viewer.can_edit());
    }

    #[test]
    fn test_serde_matches_wire_names() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let json = serde_json::to_string(&AdminRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::New);
        assert_eq!(QuickOrderStatus::default(), QuickOrderStatus::New);
        assert_eq!(ReviewStatus::default(), ReviewStatus::Pending);
    }
}
