use cosmwasm_std::{StdResult, Uint128, Uint256};

/// Exchange rates are 18-decimal fixed point: `1e18` means one share is worth one token.
pub const RATE_PRECISION: Uint128 = Uint128::new(1_000_000_000_000_000_000);

/// `shares * rate / 1e18`, rounded down.
pub fn shares_to_tokens(shares: Uint128, rate: Uint128) -> StdResult<Uint128> {
    let tokens = shares
        .full_mul(rate)
        .checked_div(Uint256::from(RATE_PRECISION))?;
    Ok(Uint128::try_from(tokens)?)
}

/// `tokens * 1e18 / rate`, rounded down. A zero rate is a divide-by-zero error.
pub fn tokens_to_shares(tokens: Uint128, rate: Uint128) -> StdResult<Uint128> {
    let shares = tokens
        .full_mul(RATE_PRECISION)
        .checked_div(Uint256::from(rate))?;
    Ok(Uint128::try_from(shares)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::StdError;

    #[test]
    fn par_rate() {
        let shares = Uint128::new(1_000_000);
        assert_eq!(shares_to_tokens(shares, RATE_PRECISION).unwrap(), shares);
        assert_eq!(tokens_to_shares(shares, RATE_PRECISION).unwrap(), shares);
    }

    #[test]
    fn accrued_rate_rounds_down() {
        // 1.05
        let rate = Uint128::new(1_050_000_000_000_000_000);

        assert_eq!(
            shares_to_tokens(Uint128::new(1_000), rate).unwrap(),
            Uint128::new(1_050)
        );
        // 1000 / 1.05 = 952.38
        assert_eq!(
            tokens_to_shares(Uint128::new(1_000), rate).unwrap(),
            Uint128::new(952)
        );
        // 952 * 1.05 = 999.6
        assert_eq!(
            shares_to_tokens(Uint128::new(952), rate).unwrap(),
            Uint128::new(999)
        );
    }

    #[test]
    fn large_values_do_not_overflow_intermediate() {
        let shares = Uint128::new(u128::MAX / 2);
        assert_eq!(
            shares_to_tokens(shares, RATE_PRECISION).unwrap(),
            shares
        );
    }

    #[test]
    fn result_overflow() {
        let rate = RATE_PRECISION * Uint128::new(2);
        let err = shares_to_tokens(Uint128::MAX, rate).unwrap_err();
        assert!(matches!(err, StdError::ConversionOverflow { .. }));
    }

    #[test]
    fn zero_rate() {
        let err = tokens_to_shares(Uint128::new(1), Uint128::zero()).unwrap_err();
        assert!(matches!(err, StdError::DivideByZero { .. }));
    }
}
