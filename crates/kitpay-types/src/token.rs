//! Token descriptors and amount scaling.

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::util::money_amount::{MoneyAmount, MoneyAmountParseError};

/// A token the checkout accepts on a particular chain.
///
/// Native tokens (ETH, BNB, MATIC) are moved with a plain value transfer and
/// carry no contract address. Every other token is an ERC-20 style contract and
/// must carry its contract address; see [`TokenDescriptor::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    /// Ticker symbol, unique per chain (e.g., `USDT`).
    pub symbol: &'static str,
    /// Human-readable name (e.g., `Tether USD`).
    pub display_name: &'static str,
    /// Whether this is the chain's base currency.
    pub is_native: bool,
    /// Number of decimal places of the smallest unit (0 to 18).
    pub decimals: u8,
    /// Token contract, required iff the token is not native.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    /// Short glyph shown next to the token on the selector.
    pub logo: &'static str,
}

/// A token amount already scaled to the token's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount {
    /// Amount in the smallest unit (wei for 18-decimal tokens).
    pub value: U256,
    /// The token the amount is denominated in.
    pub token: TokenDescriptor,
}

impl TokenDescriptor {
    /// A descriptor is well formed when a non-native token names its contract
    /// and decimals stay within the EVM convention of at most 18.
    pub fn is_well_formed(&self) -> bool {
        self.decimals <= 18 && (self.is_native || self.contract_address.is_some())
    }

    /// Creates a token amount from a value already in the smallest unit.
    pub fn amount<V: Into<U256>>(&self, value: V) -> TokenAmount {
        TokenAmount {
            value: value.into(),
            token: self.clone(),
        }
    }

    /// Parses a human-readable amount (`"0.068"`, `"99"`) and scales it by
    /// the token's decimals.
    ///
    /// # Errors
    ///
    /// Fails when the input is not a positive number in range, or when it has
    /// more fractional digits than the token supports.
    ///
    /// ```
    /// use alloy_primitives::U256;
    /// use kitpay_types::networks::{KnownNetwork, USDT};
    /// use kitpay_types::token::TokenDescriptor;
    ///
    /// let usdt: TokenDescriptor = USDT::ethereum();
    /// let amount = usdt.parse("99").unwrap();
    /// assert_eq!(amount.value, U256::from(99_000_000u64));
    /// ```
    pub fn parse<V>(&self, v: V) -> Result<TokenAmount, MoneyAmountParseError>
    where
        V: TryInto<MoneyAmount>,
        MoneyAmountParseError: From<<V as TryInto<MoneyAmount>>::Error>,
    {
        let money_amount = v.try_into()?;
        let scale = money_amount.scale();
        let token_scale = self.decimals as u32;
        if scale > token_scale {
            return Err(MoneyAmountParseError::WrongPrecision {
                money: scale,
                token: token_scale,
            });
        }
        let multiplier = U256::from(10).pow(U256::from(token_scale - scale));
        let value = U256::from(money_amount.mantissa()) * multiplier;
        Ok(self.amount(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(decimals: u8, is_native: bool) -> TokenDescriptor {
        TokenDescriptor {
            symbol: "TST",
            display_name: "Test Token",
            is_native,
            decimals,
            contract_address: (!is_native).then_some(Address::ZERO),
            logo: "",
        }
    }

    #[test]
    fn test_parse_native_fraction() {
        let eth = token(18, true);
        let amount = eth.parse("0.068").unwrap();
        assert_eq!(amount.value, U256::from(68_000_000_000_000_000u128));
    }

    #[test]
    fn test_parse_whole_number_six_decimals() {
        let usdc = token(6, false);
        assert_eq!(usdc.parse("99").unwrap().value, U256::from(99_000_000u64));
    }

    #[test]
    fn test_parse_whole_number_eighteen_decimals() {
        let bsc_usdt = token(18, false);
        let expected = U256::from(99u64) * U256::from(10).pow(U256::from(18));
        assert_eq!(bsc_usdt.parse("99").unwrap().value, expected);
    }

    #[test]
    fn test_parse_precision_too_high() {
        let err = token(2, false).parse("1.234").unwrap_err();
        assert_eq!(
            err,
            MoneyAmountParseError::WrongPrecision { money: 3, token: 2 }
        );
    }

    #[test]
    fn test_parse_zero_decimals() {
        assert_eq!(token(0, false).parse("42").unwrap().value, U256::from(42u64));
    }

    #[test]
    fn test_well_formed() {
        assert!(token(18, true).is_well_formed());
        assert!(token(6, false).is_well_formed());
        let mut missing = token(6, false);
        missing.contract_address = None;
        assert!(!missing.is_well_formed());
        assert!(!token(19, true).is_well_formed());
    }
}
