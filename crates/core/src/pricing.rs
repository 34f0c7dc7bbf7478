//! Totals over cart lines.

use rust_decimal::Decimal;

use crate::{items::CartItem, promo::PromoCode};

/// Sum of price × quantity over payable lines. Gift lines never contribute.
pub fn payable_subtotal(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .filter(|item| item.is_payable())
        .fold(Decimal::ZERO, |acc, item| acc + item.line_total())
}

/// The checkout total: payable subtotal minus the promo discount, floored at
/// zero.
pub fn checkout_total(items: &[CartItem], promo: Option<&PromoCode>) -> Decimal {
    let subtotal = payable_subtotal(items);

    let discount = promo
        .map(|promo| promo.discount_on(subtotal))
        .unwrap_or_default();

    (subtotal - discount).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn subtotal_ignores_gift_lines() {
        let items = [
            CartItem::normal("betta-food", dec!(6.50), 2),
            CartItem::wheel_gift("wheel-plant", Timestamp::now()),
            CartItem::threshold_gift("free-net"),
        ];

        assert_eq!(payable_subtotal(&items), dec!(13.00));
    }

    #[test]
    fn total_without_promo_is_subtotal() {
        let items = [CartItem::normal("filter", dec!(39.90), 1)];

        assert_eq!(checkout_total(&items, None), dec!(39.90));
    }

    #[test]
    fn total_is_floored_at_zero() -> TestResult {
        let items = [CartItem::normal("air-stone", dec!(3.00), 1)];
        let promo = PromoCode::amount_off("WELCOME20", dec!(20.00))?;

        assert_eq!(checkout_total(&items, Some(&promo)), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn empty_cart_totals_to_zero() {
        assert_eq!(payable_subtotal(&[]), Decimal::ZERO);
        assert_eq!(checkout_total(&[], None), Decimal::ZERO);
    }
}
