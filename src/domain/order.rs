use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Lifecycle of a placed order.
///
/// `Pending → Preparing → Out for Delivery → Delivered`, with `Cancelled`
/// reachable from any state that is not terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    Pending,
    Preparing,
    #[serde(rename = "Out for Delivery", alias = "OutForDelivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position along the delivery path. `Cancelled` sits off the path.
    fn progress(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Preparing => Some(1),
            OrderStatus::OutForDelivery => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    /// Forward-only check: terminal states are locked, backward moves are
    /// refused, forward moves may skip steps. Re-setting the current status
    /// is allowed as a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match (self.progress(), next.progress()) {
            (_, None) => true,
            (Some(current), Some(next)) => next > current,
            (None, Some(_)) => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(label)
                    || format!("{status:?}").eq_ignore_ascii_case(label)
            })
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// How strictly status updates are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Forward-only with terminal lock, see [`OrderStatus::can_transition_to`].
    #[default]
    Strict,
    /// Any known status may be set at any time.
    Permissive,
}

impl StatusPolicy {
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            StatusPolicy::Strict => from.can_transition_to(to),
            StatusPolicy::Permissive => true,
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(StatusPolicy::Strict),
            "permissive" => Ok(StatusPolicy::Permissive),
            other => Err(anyhow::anyhow!("invalid order status policy: {other}")),
        }
    }
}

/// Stored label only; no payment is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "COD",
            PaymentMethod::Online => "Online",
        }
    }

    /// Unknown or missing labels fall back to cash on delivery.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("online") => PaymentMethod::Online,
            _ => PaymentMethod::CashOnDelivery,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(PaymentMethod::from_label(label.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn forward_moves_are_allowed_and_may_skip() {
        assert!(Pending.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(OutForDelivery));
        assert!(OutForDelivery.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Delivered));
    }

    #[test]
    fn backward_moves_are_refused() {
        assert!(!Preparing.can_transition_to(Pending));
        assert!(!OutForDelivery.can_transition_to(Preparing));
    }

    #[test]
    fn terminal_states_are_locked() {
        for next in OrderStatus::ALL {
            if next != Delivered {
                assert!(!Delivered.can_transition_to(next), "Delivered -> {next}");
            }
            if next != Cancelled {
                assert!(!Cancelled.can_transition_to(next), "Cancelled -> {next}");
            }
        }
    }

    #[test]
    fn cancel_is_reachable_from_every_open_state() {
        for from in [Pending, Preparing, OutForDelivery] {
            assert!(from.can_transition_to(Cancelled));
        }
    }

    #[test]
    fn permissive_policy_allows_anything() {
        assert!(StatusPolicy::Permissive.allows(Delivered, Pending));
        assert!(!StatusPolicy::Strict.allows(Delivered, Pending));
    }

    #[test]
    fn status_labels_parse() {
        assert_eq!("Out for Delivery".parse::<OrderStatus>(), Ok(OutForDelivery));
        assert_eq!("OutForDelivery".parse::<OrderStatus>(), Ok(OutForDelivery));
        assert_eq!("delivered".parse::<OrderStatus>(), Ok(Delivered));
        assert!("Shipped".parse::<OrderStatus>().is_err());
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn status_serializes_with_display_labels() {
        let json = serde_json::to_string(&OutForDelivery).unwrap();
        assert_eq!(json, "\"Out for Delivery\"");
    }

    #[test]
    fn payment_method_defaults_to_cod() {
        assert_eq!(PaymentMethod::from_label(None), PaymentMethod::CashOnDelivery);
        assert_eq!(
            PaymentMethod::from_label(Some("bitcoin")),
            PaymentMethod::CashOnDelivery
        );
        assert_eq!(PaymentMethod::from_label(Some("Online")), PaymentMethod::Online);

        let parsed: PaymentMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(parsed, PaymentMethod::CashOnDelivery);
        let parsed: PaymentMethod = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn status_policy_parses_from_config() {
        assert_eq!("Strict".parse::<StatusPolicy>().unwrap(), StatusPolicy::Strict);
        assert_eq!(
            "permissive".parse::<StatusPolicy>().unwrap(),
            StatusPolicy::Permissive
        );
        assert!("loose".parse::<StatusPolicy>().is_err());
    }
}
