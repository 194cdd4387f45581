//! Fixed per-token amounts for the product price.
//!
//! The kit costs $99. Stablecoins are paid at face value; native currencies
//! use a literal amount that was roughly $99 when the table was written.
//! Nothing here follows the market, so native amounts drift over time.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::token::TokenDescriptor;

/// Product price in US dollars, as shown to the buyer.
pub const PRICE_USD: &str = "99.00";

/// Amount charged in any stablecoin, and the fallback for unrecognized tokens.
pub const STABLECOIN_AMOUNT: &str = "99";

static NATIVE_AMOUNTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("ETH", "0.068"),
        ("BNB", "0.18"),
        ("MATIC", "600"),
    ])
});

/// Returns the decimal amount of `token` that pays for the kit.
///
/// Native tokens get their own literal; stablecoins, unrecognized natives and
/// the absence of a selection all fall back to [`STABLECOIN_AMOUNT`].
///
/// ```
/// use kitpay_types::networks::{KnownNetwork, USDC};
/// use kitpay_types::pricing::fixed_amount_for;
///
/// assert_eq!(fixed_amount_for(Some(&USDC::polygon())), "99");
/// assert_eq!(fixed_amount_for(None), "99");
/// ```
pub fn fixed_amount_for(token: Option<&TokenDescriptor>) -> &'static str {
    match token {
        Some(token) if token.is_native => NATIVE_AMOUNTS
            .get(token.symbol)
            .copied()
            .unwrap_or(STABLECOIN_AMOUNT),
        _ => STABLECOIN_AMOUNT,
    }
}
