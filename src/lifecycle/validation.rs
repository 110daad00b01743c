use rust_decimal::Decimal;

use crate::domain::OrderCreate;
use crate::order_actor::OrderError;

const MAX_CUSTOMER_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;
const MAX_PRODUCT_NAME_LEN: usize = 200;
const MAX_PRICE_SCALE: u32 = 2;

/// Checks a creation request. The first violation wins.
pub fn validate_create(request: &OrderCreate) -> Result<(), OrderError> {
    if request.items.is_empty() {
        return Err(OrderError::validation("items", "Order must contain at least one item"));
    }

    let name = request.customer_name.trim();
    if name.is_empty() {
        return Err(OrderError::validation("customer_name", "Customer name is required"));
    }
    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(OrderError::validation(
            "customer_name",
            format!("Customer name must be at most {} characters", MAX_CUSTOMER_NAME_LEN),
        ));
    }
    if !is_valid_email(&request.customer_email) {
        return Err(OrderError::validation("customer_email", "Invalid email format"));
    }

    let mut total = Decimal::ZERO;
    for (index, item) in request.items.iter().enumerate() {
        let field = |name: &str| format!("items[{}].{}", index, name);

        let product_name = item.product_name.trim();
        if product_name.is_empty() {
            return Err(OrderError::validation(field("product_name"), "Product name is required"));
        }
        if product_name.chars().count() > MAX_PRODUCT_NAME_LEN {
            return Err(OrderError::validation(
                field("product_name"),
                format!("Product name must be at most {} characters", MAX_PRODUCT_NAME_LEN),
            ));
        }
        if item.quantity < 1 {
            return Err(OrderError::validation(field("quantity"), "Item quantity must be greater than 0"));
        }
        if item.price <= Decimal::ZERO {
            return Err(OrderError::validation(field("price"), "Item price must be greater than 0"));
        }
        if item.price.normalize().scale() > MAX_PRICE_SCALE {
            return Err(OrderError::validation(
                field("price"),
                format!("Item price must have at most {} decimal places", MAX_PRICE_SCALE),
            ));
        }
        let subtotal = item
            .price
            .checked_mul(Decimal::from(item.quantity))
            .ok_or_else(|| OrderError::validation(field("price"), "Item subtotal is too large"))?;
        total = total
            .checked_add(subtotal)
            .ok_or_else(|| OrderError::validation("total_amount", "Order total is too large"))?;
    }
    Ok(())
}

/// `local@domain.tld`, no whitespace, no empty domain labels.
fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
