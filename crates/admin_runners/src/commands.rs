use admin_api::orders::{OrderItemStatus, OrderStatusUpdate};
use anyhow::{bail, Context, Result};

pub const ORDER_STATUS_USAGE: &str =
    "usage: admin_order_status <order-id> <current-status> <new-status> [<cancellation-remark> | <tracking-id> <carrier-partner>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusCommand {
    pub current: OrderItemStatus,
    pub update: OrderStatusUpdate,
}

impl OrderStatusCommand {
    /// Parses the arguments following the program name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        if args.len() < 3 {
            bail!("not enough arguments\n{}", ORDER_STATUS_USAGE);
        }

        let order_id = &args[0];
        let current: OrderItemStatus = args[1]
            .parse()
            .context("an error occurred on parsing the current status")?;
        let proposed: OrderItemStatus = args[2]
            .parse()
            .context("an error occurred on parsing the new status")?;
        let extra = &args[3..];

        let update = match proposed {
            OrderItemStatus::Cancelled => {
                let mut update = OrderStatusUpdate::new(order_id, proposed);
                if !extra.is_empty() {
                    update.cancellation_remark = Some(extra.join(" "));
                }
                update
            }
            OrderItemStatus::Shipped => match extra {
                [tracking_id, carrier_partner] => {
                    OrderStatusUpdate::shipped(order_id, tracking_id, carrier_partner)
                }
                [] => OrderStatusUpdate::new(order_id, proposed),
                _ => bail!(
                    "shipping takes a tracking id and a carrier partner\n{}",
                    ORDER_STATUS_USAGE
                ),
            },
            _ => {
                if !extra.is_empty() {
                    bail!("unexpected arguments for {}\n{}", proposed, ORDER_STATUS_USAGE);
                }
                OrderStatusUpdate::new(order_id, proposed)
            }
        };

        Ok(Self { current, update })
    }
}
