//! Order ledger - 订单明细与金额计算
//!
//! 纯函数，作用于订单的 item 列表；并发隔离由 `OrdersManager` 按订单加锁保证。
//!
//! 金额只通过 [`recompute_total`] 从完整明细重新推导，
//! 不存在增量加减路径。

use super::error::{OrderError, OrderResult};
use rust_decimal::Decimal;
use shared::models::{MenuItem, OrderItem};

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Quantity must be in `1..=MAX_QUANTITY`
pub fn validate_quantity(quantity: i32) -> OrderResult<()> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// Add `quantity` of a menu item
///
/// An existing line for the same menu item keeps its price snapshot and
/// has the quantities summed.
pub fn add_item(items: &mut Vec<OrderItem>, menu_item: &MenuItem, quantity: i32) -> OrderResult<()> {
    validate_quantity(quantity)?;

    if let Some(line) = items.iter_mut().find(|i| i.menu_item_id == menu_item.id) {
        let summed = line
            .quantity
            .checked_add(quantity)
            .ok_or(OrderError::InvalidQuantity(quantity))?;
        validate_quantity(summed)?;
        line.quantity = summed;
        return Ok(());
    }

    items.push(OrderItem {
        menu_item_id: menu_item.id,
        name: menu_item.name.clone(),
        quantity,
        unit_price_snapshot: menu_item.price,
    });
    Ok(())
}

/// Remove the line for `menu_item_id`
pub fn remove_item(items: &mut Vec<OrderItem>, menu_item_id: i64) -> OrderResult<OrderItem> {
    let index = items
        .iter()
        .position(|i| i.menu_item_id == menu_item_id)
        .ok_or(OrderError::ItemNotFound(menu_item_id))?;
    Ok(items.remove(index))
}

/// Overwrite a line's quantity; `<= 0` removes the line
pub fn set_quantity(items: &mut Vec<OrderItem>, menu_item_id: i64, quantity: i32) -> OrderResult<()> {
    if quantity <= 0 {
        remove_item(items, menu_item_id)?;
        return Ok(());
    }
    validate_quantity(quantity)?;

    let line = items
        .iter_mut()
        .find(|i| i.menu_item_id == menu_item_id)
        .ok_or(OrderError::ItemNotFound(menu_item_id))?;
    line.quantity = quantity;
    Ok(())
}

/// Exact Σ(unit_price_snapshot × quantity)
///
/// Catalog prices carry at most two decimal places, so the sum needs no
/// rounding. Out-of-range amounts fail with [`OrderError::AmountOverflow`].
pub fn recompute_total(items: &[OrderItem]) -> OrderResult<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, line| {
        line.unit_price_snapshot
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|amount| total.checked_add(amount))
            .ok_or(OrderError::AmountOverflow(line.menu_item_id))
    })
}
