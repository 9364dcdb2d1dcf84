//! Counter to kitchen to archive to report, through the public service API.

use std::time::Duration;

use pizzeria_core::analytics::PeriodSpec;
use pizzeria_core::cart::OrderDraft;
use pizzeria_core::catalog::Catalog;
use pizzeria_core::pricing::{find_size, house_sizes, PizzaBuilder};
use pizzeria_core::{NewOrder, OrderStatus, PaymentMethod, ServiceType};
use pizzeria_service::{MenuState, OrderService, PizzeriaConfig};

const PAST_AUTO_CONFIRM: Duration = Duration::from_millis(2100);

fn setup() -> (OrderService, MenuState) {
    let config = PizzeriaConfig::default();
    (OrderService::new(&config), MenuState::new(Catalog::house_menu()))
}

async fn draft_with_pizza(menu: &MenuState) -> OrderDraft {
    let sizes = house_sizes();
    let mut builder = PizzaBuilder::new();
    builder.select_size(find_size(&sizes, "G (8 fatias)").unwrap().clone());
    builder.toggle_flavor("pizza-carne-sol");
    builder.toggle_flavor("pizza-calabresa");
    let pizza = menu.confirm_pizza(&mut builder).await.unwrap();

    let mut draft = OrderDraft::new();
    draft.add_item(pizza).unwrap();
    draft
        .add_menu_item(&menu.item("refrigerante-2l").await.unwrap())
        .unwrap();
    draft
}

fn request(name: &str, draft: OrderDraft) -> NewOrder {
    NewOrder {
        customer_name: name.to_string(),
        items: draft.into_items(),
        service_type: ServiceType::Delivery,
        payment_method: PaymentMethod::Pix,
        address: Some("Rua das Flores, 12".to_string()),
        table: Some("9".to_string()),
    }
}

async fn assert_in_exactly_one_place(service: &OrderService, id: &str) {
    let mut seen = 0;
    for status in OrderStatus::ALL {
        seen += service
            .orders_by_status(status)
            .await
            .iter()
            .filter(|o| o.id == id)
            .count();
    }
    seen += service
        .delivered_orders()
        .await
        .iter()
        .filter(|d| d.id() == id)
        .count();
    assert_eq!(seen, 1, "order {} must live in exactly one place", id);
}

#[tokio::test(start_paused = true)]
async fn test_full_order_lifecycle() {
    let (service, menu) = setup();

    let order = service
        .submit_order(request("Ana", draft_with_pizza(&menu).await))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_cents, 5500 + 1500);
    assert_eq!(order.address.as_deref(), Some("Rua das Flores, 12"));
    assert_eq!(order.table, None);
    assert_in_exactly_one_place(&service, &order.id).await;

    tokio::time::sleep(PAST_AUTO_CONFIRM).await;
    assert_eq!(service.order(&order.id).await.unwrap().status, OrderStatus::Confirmed);
    assert_eq!(service.queue_position(&order.id).await.unwrap().label(), "1ª");
    assert_in_exactly_one_place(&service, &order.id).await;

    let err = service
        .advance_status(&order.id, OrderStatus::Ready)
        .await
        .unwrap_err();
    assert!(err.is_invalid_transition());

    service
        .advance_status(&order.id, OrderStatus::Preparing)
        .await
        .unwrap();
    service
        .advance_status(&order.id, OrderStatus::Ready)
        .await
        .unwrap();
    assert_eq!(service.kitchen_count().await, 1);

    let delivered = service.deliver(&order.id).await.unwrap();
    assert_eq!(delivered.order.status, OrderStatus::Delivered);
    assert_eq!(service.kitchen_count().await, 0);
    assert_in_exactly_one_place(&service, &order.id).await;

    let report = service
        .sales_report_at(PeriodSpec::Today, &delivered.delivered_at)
        .await;
    assert_eq!(report.total_orders, 1);
    assert_eq!(report.total_revenue.cents(), 7000);
    assert_eq!(report.top_products[0].name, "Pizza Carne de Sol / Calabresa");
    assert!(report.top_products[0].premium);

    assert!(service.delete_delivered(&order.id).await);
    assert!(!service.delete_delivered(&order.id).await);
    assert!(service.delivered_orders().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_queue_positions_shift_as_kitchen_works() {
    let (service, menu) = setup();

    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let order = service
            .submit_order(request(name, draft_with_pizza(&menu).await))
            .await
            .unwrap();
        ids.push(order.id);
    }
    tokio::time::sleep(PAST_AUTO_CONFIRM).await;

    let labels = |queue: pizzeria_core::queue::KitchenQueue| {
        queue
            .confirmed
            .iter()
            .map(|e| (e.order.customer_name.clone(), e.position.label()))
            .collect::<Vec<_>>()
    };

    assert_eq!(
        labels(service.kitchen_queue().await),
        vec![
            ("A".to_string(), "1ª".to_string()),
            ("B".to_string(), "2ª".to_string()),
            ("C".to_string(), "3ª".to_string()),
        ]
    );

    service
        .advance_status(&ids[0], OrderStatus::Preparing)
        .await
        .unwrap();

    assert_eq!(
        labels(service.kitchen_queue().await),
        vec![
            ("B".to_string(), "1ª".to_string()),
            ("C".to_string(), "2ª".to_string()),
        ]
    );
    assert_eq!(service.queue_position(&ids[0]).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_deleted_pending_order_is_never_confirmed() {
    let (service, menu) = setup();

    let order = service
        .submit_order(request("Ana", draft_with_pizza(&menu).await))
        .await
        .unwrap();
    service.remove_order(&order.id).await.unwrap();

    tokio::time::sleep(PAST_AUTO_CONFIRM).await;
    assert!(service.order(&order.id).await.is_none());
    assert_eq!(service.pending_count().await, 0);
    assert_eq!(service.kitchen_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_recent_orders_respect_limit() {
    let (service, menu) = setup();

    for i in 0..7 {
        service
            .submit_order(request(&format!("Cliente {}", i), draft_with_pizza(&menu).await))
            .await
            .unwrap();
    }

    let recent = service.recent_orders().await;
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].order_number, 7);
}
