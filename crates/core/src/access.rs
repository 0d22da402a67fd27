//! Static role-to-capability mapping for UI gating

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roles recognized by the commerce backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Default for Role {
    /// Least-privilege default, used when the upstream role is unknown
    fn default() -> Self {
        Self::Customer
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            other => Err(CoreError::unknown_role(other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Staff => write!(f, "staff"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

/// Named boolean capabilities surfaced to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_manage_users: bool,
    pub can_manage_products: bool,
    pub can_manage_orders: bool,
    pub can_view_financials: bool,
    pub can_place_orders: bool,
}

const ADMIN: Capabilities = Capabilities {
    can_manage_users: true,
    can_manage_products: true,
    can_manage_orders: true,
    can_view_financials: true,
    can_place_orders: true,
};

const STAFF: Capabilities = Capabilities {
    can_manage_users: false,
    can_manage_products: true,
    can_manage_orders: true,
    can_view_financials: false,
    can_place_orders: true,
};

const CUSTOMER: Capabilities = Capabilities {
    can_manage_users: false,
    can_manage_products: false,
    can_manage_orders: false,
    can_view_financials: false,
    can_place_orders: true,
};

impl Role {
    /// Look up the static capability set for this role
    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::Admin => ADMIN,
            Self::Staff => STAFF,
            Self::Customer => CUSTOMER,
        }
    }

    /// Parse an upstream role string, falling back to the least-privilege
    /// default for unrecognized values
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Staff, Role::Customer] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_an_error() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownRole { .. }));
    }

    #[test]
    fn unknown_role_defaults_to_customer() {
        assert_eq!(Role::parse_or_default("superuser"), Role::Customer);
    }

    #[test]
    fn customer_cannot_manage_anything() {
        let caps = Role::Customer.capabilities();
        assert!(!caps.can_manage_users);
        assert!(!caps.can_manage_products);
        assert!(!caps.can_manage_orders);
        assert!(!caps.can_view_financials);
        assert!(caps.can_place_orders);
    }

    #[test]
    fn staff_cannot_see_financials_or_users() {
        let caps = Role::Staff.capabilities();
        assert!(!caps.can_manage_users);
        assert!(!caps.can_view_financials);
        assert!(caps.can_manage_products);
    }

    #[test]
    fn capabilities_serialize_camel_case() {
        let value = serde_json::to_value(Role::Admin.capabilities()).unwrap();
        assert_eq!(value["canManageUsers"], true);
        assert_eq!(value["canViewFinancials"], true);
    }
}
