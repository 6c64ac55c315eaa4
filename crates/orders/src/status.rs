use core::str::FromStr;
use serde::{Deserialize, Serialize};

use stockflow_core::DomainError;

/// Order status lifecycle.
///
/// Every order is created `Pending`. Transitions are admin-only and
/// permissive: any status is directly selectable from any other status via a
/// single last-write-wins update. `Delivered` is the expected terminal state
/// but is not locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// All statuses in forward lifecycle order.
    pub const SEQUENCE: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Position in the forward lifecycle (0-based).
    pub fn position(self) -> usize {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(DomainError::validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// One entry of the display-only status timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStep {
    pub status: OrderStatus,
    /// The current status itself.
    pub active: bool,
    /// Every status up to and including the current one.
    pub passed: bool,
}

/// Timeline rendering data for an order's current status.
///
/// Purely a display concern; nothing here is persisted.
pub fn timeline(current: OrderStatus) -> [TimelineStep; 4] {
    OrderStatus::SEQUENCE.map(|status| TimelineStep {
        status,
        active: status == current,
        passed: current.position() >= status.position(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_round_trip_through_strings() {
        for status in OrderStatus::SEQUENCE {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "cancelled".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn positions_are_forward_ordered() {
        let positions: Vec<usize> = OrderStatus::SEQUENCE.iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn timeline_marks_passed_up_to_current() {
        let steps = timeline(OrderStatus::Shipped);

        assert!(steps[0].passed && !steps[0].active);
        assert!(steps[1].passed && !steps[1].active);
        assert!(steps[2].passed && steps[2].active);
        assert!(!steps[3].passed && !steps[3].active);
    }

    #[test]
    fn timeline_for_pending_marks_only_pending() {
        let steps = timeline(OrderStatus::Pending);
        assert!(steps[0].passed);
        assert!(steps[1..].iter().all(|s| !s.passed));
    }

    #[test]
    fn serde_uses_lowercase_wire_form() {
        let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::Delivered);
    }
}
