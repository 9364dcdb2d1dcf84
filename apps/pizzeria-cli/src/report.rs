//! Plain-text rendering for the terminal and the receipt printer.

use std::fmt::{self, Write};

use chrono::Local;
use pizzeria_core::analytics::SalesReport;
use pizzeria_core::catalog::Catalog;
use pizzeria_core::pricing::PizzaSize;
use pizzeria_core::queue::KitchenQueue;
use pizzeria_core::{PaymentMethod, ServiceType};
use pizzeria_service::PizzeriaConfig;

const RULE: &str = "========================================";

fn payment_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Pix => "PIX",
        PaymentMethod::Card => "Cartão",
        PaymentMethod::Cash => "Dinheiro",
    }
}

fn service_label(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Delivery => "Entrega",
        ServiceType::Pickup => "Retirada",
        ServiceType::Table => "Mesa",
    }
}

pub fn render_report(report: &SalesReport, config: &PizzeriaConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let restaurant = &config.restaurant.name;

    writeln!(out, "RELATÓRIO DE VENDAS - {}", restaurant.to_uppercase())?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Período: {}", report.period)?;
    writeln!(
        out,
        "Data do Relatório: {}",
        report.generated_at.with_timezone(&Local).format("%d/%m/%Y")
    )?;
    writeln!(out)?;

    writeln!(out, "RESUMO FINANCEIRO:")?;
    writeln!(out, "------------------")?;
    writeln!(out, "Faturamento Total: {}", config.format_currency(report.total_revenue))?;
    writeln!(out, "Total de Pedidos: {}", report.total_orders)?;
    writeln!(out)?;

    writeln!(out, "PRODUTOS MAIS VENDIDOS:")?;
    writeln!(out, "-----------------------")?;
    for (rank, product) in report.top_products.iter().enumerate() {
        writeln!(out, "{}. {}", rank + 1, product.name)?;
        writeln!(out, "   Quantidade: {} unidades", product.quantity)?;
        writeln!(out, "   Faturamento: {}", config.format_currency(product.revenue))?;
    }
    writeln!(out)?;

    writeln!(out, "HISTÓRICO DE VENDAS:")?;
    writeln!(out, "-------------------")?;
    for delivered in &report.orders {
        let order = &delivered.order;
        writeln!(out, "Pedido #{} - {}", order.order_number, order.customer_name)?;
        writeln!(
            out,
            "   Data: {}",
            delivered.delivered_at.with_timezone(&Local).format("%d/%m/%Y %H:%M")
        )?;
        writeln!(out, "   Valor: {}", config.format_currency(order.total()))?;
        writeln!(out, "   Pagamento: {}", payment_label(order.payment_method))?;
        match &order.table {
            Some(table) => writeln!(out, "   Local: {} {}", service_label(order.service_type), table)?,
            None => writeln!(out, "   Local: {}", service_label(order.service_type))?,
        }
    }
    writeln!(out)?;

    writeln!(out, "{}", RULE)?;
    write!(out, "Relatório gerado automaticamente pela {}", restaurant)?;
    Ok(out)
}

/// Active menu grouped by category.
pub fn render_menu(catalog: &Catalog, config: &PizzeriaConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for category in catalog.categories() {
        let items: Vec<_> = catalog.by_category(category).collect();
        if items.is_empty() {
            continue;
        }

        writeln!(out, "{}", category)?;
        for item in items {
            let marker = if item.is_premium() { " ★" } else { "" };
            if item.is_flavor() {
                writeln!(out, "  {}{} ({})", item.name, marker, item.ingredients().join(", "))?;
            } else {
                writeln!(out, "  {:<28} {}", item.name, config.format_currency(item.base_price()))?;
            }
        }
        writeln!(out)?;
    }
    Ok(out)
}

pub fn render_sizes(sizes: &[PizzaSize], config: &PizzeriaConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for size in sizes {
        writeln!(
            out,
            "{:<18} {:>10}  premium {:>10}  {}",
            size.name,
            config.format_currency(size.price()),
            config.format_currency(size.premium_price()),
            size.description
        )?;
    }
    Ok(out)
}

pub fn render_queue(queue: &KitchenQueue) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Cozinha: {} na fila, {} pendentes",
        queue.kitchen_count, queue.pending_count
    )?;
    for entry in &queue.confirmed {
        writeln!(
            out,
            "  {} #{} {}",
            entry.position.label(),
            entry.order.order_number,
            entry.order.customer_name
        )?;
    }
    for order in &queue.preparing {
        writeln!(out, "  preparando #{} {}", order.order_number, order.customer_name)?;
    }
    for order in &queue.ready {
        writeln!(out, "  pronto #{} {}", order.order_number, order.customer_name)?;
    }
    Ok(out)
}
