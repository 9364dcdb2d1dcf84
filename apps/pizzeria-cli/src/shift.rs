//! A scripted service shift: a few customers order concurrently, the
//! kitchen works through the queue, everything is delivered and the day's
//! sales are reported.

use std::error::Error;
use std::time::Duration;

use pizzeria_core::analytics::{PeriodSpec, SalesReport};
use pizzeria_core::cart::OrderDraft;
use pizzeria_core::pricing::{find_size, house_sizes, PizzaBuilder};
use pizzeria_core::{CoreError, NewOrder, OrderStatus, PaymentMethod, ServiceType};
use pizzeria_service::{MenuState, OrderService};
use tracing::info;

use crate::report::render_queue;

struct Ticket {
    customer: &'static str,
    size: &'static str,
    flavors: &'static [&'static str],
    extras: &'static [(&'static str, i64)],
    service: ServiceType,
    payment: PaymentMethod,
    destination: Option<&'static str>,
}

const TICKETS: &[Ticket] = &[
    Ticket {
        customer: "Ana",
        size: "G (8 fatias)",
        flavors: &["pizza-carne-sol", "pizza-calabresa"],
        extras: &[("refrigerante-2l", 1)],
        service: ServiceType::Delivery,
        payment: PaymentMethod::Pix,
        destination: Some("Rua das Flores, 12"),
    },
    Ticket {
        customer: "Bruno",
        size: "M (6 fatias)",
        flavors: &["pizza-frango-catupiry"],
        extras: &[("pastel-queijo", 2), ("suco-maracuja", 1)],
        service: ServiceType::Table,
        payment: PaymentMethod::Card,
        destination: Some("5"),
    },
    Ticket {
        customer: "Carla",
        size: "Brotinho",
        flavors: &["pizza-chocolate", "pizza-banana"],
        extras: &[("batata-frita", 1)],
        service: ServiceType::Pickup,
        payment: PaymentMethod::Cash,
        destination: None,
    },
];

async fn build_request(menu: &MenuState, ticket: &Ticket) -> Result<NewOrder, Box<dyn Error>> {
    let sizes = house_sizes();
    let size = find_size(&sizes, ticket.size).ok_or_else(|| format!("unknown size {}", ticket.size))?;

    let mut builder = PizzaBuilder::new();
    builder.select_size(size.clone());
    for flavor in ticket.flavors {
        builder.toggle_flavor(flavor);
    }

    let mut draft = OrderDraft::new();
    if let Some(pizza) = menu.confirm_pizza(&mut builder).await {
        draft.add_item(pizza)?;
    }
    for (id, quantity) in ticket.extras {
        let item = menu
            .item(id)
            .await
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))?;
        let index = draft.add_menu_item(&item)?;
        draft.update_quantity(index, *quantity)?;
    }

    let destination = ticket.destination.map(str::to_string);
    Ok(NewOrder {
        customer_name: ticket.customer.to_string(),
        items: draft.into_items(),
        service_type: ticket.service,
        payment_method: ticket.payment,
        address: destination.clone(),
        table: destination,
    })
}

pub async fn run(service: &OrderService, menu: &MenuState, auto_confirm: Duration) -> Result<SalesReport, Box<dyn Error>> {
    let mut handles = Vec::new();
    for ticket in TICKETS {
        let request = build_request(menu, ticket).await?;
        let service = service.clone();
        handles.push(tokio::spawn(async move { service.submit_order(request).await }));
    }

    for handle in handles {
        let order = handle.await??;
        info!(order_number = order.order_number, customer = %order.customer_name, "Order submitted");
    }

    tokio::time::sleep(auto_confirm + Duration::from_millis(50)).await;
    print!("{}", render_queue(&service.kitchen_queue().await)?);

    let mut queue = service.orders_by_status(OrderStatus::Confirmed).await;
    queue.sort_by_key(|o| o.order_number);

    for order in queue {
        service.advance_status(&order.id, OrderStatus::Preparing).await?;
        service.advance_status(&order.id, OrderStatus::Ready).await?;
        let delivered = service.deliver(&order.id).await?;
        info!(order_number = delivered.order.order_number, "Order handed over");
    }

    Ok(service.sales_report(PeriodSpec::Today).await)
}
