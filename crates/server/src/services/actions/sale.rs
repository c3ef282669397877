//! Sale mutation actions.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::TenantId;

use super::{ActionResult, FieldErrors, require_non_negative_amount, require_positive};
use crate::cache::{self, ResultCache, tags};
use crate::db::sales::ResolvedSaleItem;
use crate::db::{CustomerRepository, ProductRepository, RepositoryError, SaleRepository};
use crate::models::sale::CreateSaleInput;

fn sale_tags(tenant: TenantId) -> [String; 4] {
    [
        cache::scoped(tags::SALES, tenant),
        cache::scoped(tags::PRODUCTS, tenant),
        cache::scoped(tags::ANALYTICS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Record a sale and draw its units down from stock.
///
/// Prices default to each product's current unit price; the per-product
/// stock guard inside the transaction is what holds under concurrent
/// sales.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreateSaleInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    if input.items.is_empty() {
        errors.push("items", "A sale needs at least one item".to_string());
    }
    for item in &input.items {
        require_positive(&mut errors, "items.quantity", item.quantity);
        if let Some(price) = item.unit_price {
            require_non_negative_amount(&mut errors, "items.unit_price", price);
        }
    }
    if !errors.is_empty() {
        return errors.into_result();
    }

    if let Some(customer_id) = input.customer_id {
        match CustomerRepository::new(pool).exists(tenant, customer_id).await {
            Ok(true) => {}
            Ok(false) => {
                return ActionResult::invalid("customer_id", "Customer not found".to_string());
            }
            Err(e) => {
                tracing::error!(tenant = %tenant, error = %e, "Failed to verify customer");
                return ActionResult::failed("Failed to record sale".to_string());
            }
        }
    }

    // Resolve prices against current products; ownership is checked here
    // and enforced again by the stock guard inside the transaction.
    let products = ProductRepository::new(pool);
    let mut resolved = Vec::with_capacity(input.items.len());
    let mut total = Decimal::ZERO;
    for item in &input.items {
        let product = match products.get(tenant, item.product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                return ActionResult::invalid("items.product_id", "Product not found".to_string());
            }
            Err(e) => {
                tracing::error!(tenant = %tenant, error = %e, "Failed to load product for sale");
                return ActionResult::failed("Failed to record sale".to_string());
            }
        };

        let unit_price = item.unit_price.unwrap_or(product.unit_price);
        total += unit_price * Decimal::from(item.quantity);
        resolved.push(ResolvedSaleItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price,
        });
    }

    let sale_date = input.sale_date.unwrap_or_else(|| Utc::now().date_naive());

    let sale = match SaleRepository::new(pool)
        .create_with_items(tenant, input.customer_id, sale_date, &resolved, total)
        .await
    {
        Ok(sale) => sale,
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::invalid("items.quantity", message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to record sale");
            return ActionResult::failed("Failed to record sale".to_string());
        }
    };

    cache.invalidate_all(&sale_tags(tenant));

    ActionResult::ok(format!(
        "Sale recorded: {} item(s) totaling {}",
        sale.items.len(),
        sale.sale.total_amount
    ))
}
