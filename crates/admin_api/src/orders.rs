use std::fmt::{Display, Formatter};
use std::str::FromStr;

use base::ApiError;
use serde::{Deserialize, Serialize};

pub use crate::orders::api::OrdersApi;

pub mod api;

pub type OrderId = String;
pub type OrderItemId = String;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderItemStatus {
    Placed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderItemStatus {
    pub const ALL: [OrderItemStatus; 4] = [
        OrderItemStatus::Placed,
        OrderItemStatus::Shipped,
        OrderItemStatus::Delivered,
        OrderItemStatus::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn next_statuses(&self) -> &'static [OrderItemStatus] {
        match self {
            Self::Placed => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, proposed: OrderItemStatus) -> bool {
        self.next_statuses().contains(&proposed)
    }
}

impl Display for OrderItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            OrderItemStatus::Placed => write!(f, "placed"),
            OrderItemStatus::Shipped => write!(f, "shipped"),
            OrderItemStatus::Delivered => write!(f, "delivered"),
            OrderItemStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderItemStatus {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "placed" => Ok(Self::Placed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => anyhow::bail!("Invalid order item status: {}", input),
        }
    }
}

/// Whether an order item may move from `current` to `proposed`.
/// Same-status proposals are never allowed.
pub fn is_transition_allowed(current: OrderItemStatus, proposed: OrderItemStatus) -> bool {
    current.can_transition_to(proposed)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    pub status: OrderItemStatus,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub carrier_partner: Option<String>,
    #[serde(default)]
    pub cancellation_remark: Option<String>,
}

/// Body of the order status update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_id: OrderId,
    pub status: OrderItemStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cancellation_remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub carrier_partner: Option<String>,
}

impl OrderStatusUpdate {
    pub fn new(order_id: &str, status: OrderItemStatus) -> Self {
        Self {
            order_id: order_id.to_string(),
            status,
            cancellation_remark: None,
            tracking_id: None,
            carrier_partner: None,
        }
    }

    pub fn shipped(order_id: &str, tracking_id: &str, carrier_partner: &str) -> Self {
        Self {
            tracking_id: Some(tracking_id.to_string()),
            carrier_partner: Some(carrier_partner.to_string()),
            ..Self::new(order_id, OrderItemStatus::Shipped)
        }
    }

    pub fn cancelled(order_id: &str, cancellation_remark: &str) -> Self {
        Self {
            cancellation_remark: Some(cancellation_remark.to_string()),
            ..Self::new(order_id, OrderItemStatus::Cancelled)
        }
    }

    /// Checks the form fields the target status needs.
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.status {
            OrderItemStatus::Cancelled => {
                require_field(&self.cancellation_remark, "a cancellation remark")
            }
            OrderItemStatus::Shipped => {
                require_field(&self.tracking_id, "a tracking id")?;
                require_field(&self.carrier_partner, "a carrier partner")
            }
            OrderItemStatus::Placed | OrderItemStatus::Delivered => Ok(()),
        }
    }
}

fn require_field(value: &Option<String>, name: &str) -> Result<(), ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ApiError::Validation(format!("{} is required", name))),
    }
}

/// Runs the client-side checks that must pass before an update is sent.
pub fn check_status_update(
    current: OrderItemStatus,
    update: &OrderStatusUpdate,
) -> Result<(), ApiError> {
    if !is_transition_allowed(current, update.status) {
        return Err(ApiError::Validation(format!(
            "order status cannot be changed from {} to {}",
            current, update.status
        )));
    }

    update.validate()
}
