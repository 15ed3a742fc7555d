use crate::StrategyError;
use cosmwasm_std::{Addr, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::Map;

/// Added to both total shares and total assets so an empty position converts 1:1
/// and a donation to the position cannot inflate the price of the first share.
const OFFSET: Uint128 = Uint128::new(1);

/// Shares issued per underlying token, [`OFFSET`] not included.
const TOTAL_SHARES: Map<&Addr, Uint128> = Map::new("total_shares");

pub fn get_total_shares(storage: &dyn Storage, token: &Addr) -> StdResult<Uint128> {
    TOTAL_SHARES
        .may_load(storage, token)
        .map(|shares| shares.unwrap_or_default())
}

/// Share price with a virtual +1 on both sides:
/// `shares = assets * (S + 1) / (A + 1)` and `assets = shares * (A + 1) / (S + 1)`, rounded down.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualOffset {
    total_shares: Uint128,
    total_assets: Uint128,
    virtual_total_shares: Uint128,
    virtual_total_assets: Uint128,
}

impl VirtualOffset {
    pub fn new(total_shares: Uint128, total_assets: Uint128) -> StdResult<Self> {
        let virtual_total_shares = total_shares.checked_add(OFFSET).map_err(StdError::from)?;
        let virtual_total_assets = total_assets.checked_add(OFFSET).map_err(StdError::from)?;

        Ok(Self {
            total_shares,
            total_assets,
            virtual_total_shares,
            virtual_total_assets,
        })
    }

    pub fn shares_to_assets(&self, shares: Uint128) -> StdResult<Uint128> {
        shares
            .checked_mul(self.virtual_total_assets)
            .map_err(StdError::from)?
            .checked_div(self.virtual_total_shares)
            .map_err(StdError::from)
    }

    pub fn assets_to_shares(&self, assets: Uint128) -> StdResult<Uint128> {
        assets
            .checked_mul(self.virtual_total_shares)
            .map_err(StdError::from)?
            .checked_div(self.virtual_total_assets)
            .map_err(StdError::from)
    }

    pub fn total_shares(&self) -> Uint128 {
        self.total_shares
    }

    pub fn total_assets(&self) -> Uint128 {
        self.total_assets
    }
}

/// [VirtualOffset] backed by the per-token [TOTAL_SHARES] counter.
/// `total_assets` is always read live by the caller (e.g. a rebasing claim balance).
#[derive(Debug)]
pub struct TotalShares {
    token: Addr,
    offset: VirtualOffset,
}

impl TotalShares {
    pub fn load(storage: &dyn Storage, token: &Addr, total_assets: Uint128) -> StdResult<Self> {
        let total_shares = get_total_shares(storage, token)?;
        Ok(Self {
            token: token.clone(),
            offset: VirtualOffset::new(total_shares, total_assets)?,
        })
    }

    pub fn shares_to_assets(&self, shares: Uint128) -> StdResult<Uint128> {
        self.offset.shares_to_assets(shares)
    }

    pub fn assets_to_shares(&self, assets: Uint128) -> StdResult<Uint128> {
        self.offset.assets_to_shares(assets)
    }

    pub fn total_shares(&self) -> Uint128 {
        self.offset.total_shares
    }

    pub fn total_assets(&self) -> Uint128 {
        self.offset.total_assets
    }

    pub fn checked_add_shares(
        &mut self,
        storage: &mut dyn Storage,
        shares: Uint128,
    ) -> Result<(), StrategyError> {
        if shares.is_zero() {
            return Err(StrategyError::ZeroShares {});
        }

        let total_shares = self
            .offset
            .total_shares
            .checked_add(shares)
            .map_err(StdError::from)?;
        self.offset = VirtualOffset::new(total_shares, self.offset.total_assets)?;
        TOTAL_SHARES.save(storage, &self.token, &total_shares)?;
        Ok(())
    }

    pub fn checked_sub_shares(
        &mut self,
        storage: &mut dyn Storage,
        shares: Uint128,
    ) -> Result<(), StrategyError> {
        if shares.is_zero() {
            return Err(StrategyError::ZeroShares {});
        }

        let total_shares = self
            .offset
            .total_shares
            .checked_sub(shares)
            .map_err(|_| StrategyError::InsufficientPosition {})?;
        self.offset = VirtualOffset::new(total_shares, self.offset.total_assets)?;
        TOTAL_SHARES.save(storage, &self.token, &total_shares)?;
        Ok(())
    }

    /// Drop every share of the position, used when the whole position is unlocked.
    pub fn clear(self, storage: &mut dyn Storage) {
        TOTAL_SHARES.remove(storage, &self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    #[test]
    fn empty_position_is_one_to_one() {
        let offset = VirtualOffset::new(Uint128::zero(), Uint128::zero()).unwrap();
        assert_eq!(
            offset.assets_to_shares(Uint128::new(1_000)).unwrap(),
            Uint128::new(1_000)
        );
        assert_eq!(
            offset.shares_to_assets(Uint128::new(1_000)).unwrap(),
            Uint128::new(1_000)
        );
    }

    #[test]
    fn donation_captured_by_offset() {
        // 1 share outstanding, 1 deposited + 99,999 donated
        let offset = VirtualOffset::new(Uint128::new(1), Uint128::new(100_000)).unwrap();

        // (1) * 100,001 / 2
        assert_eq!(
            offset.shares_to_assets(Uint128::new(1)).unwrap(),
            Uint128::new(50_000)
        );
        // (10,000) * 2 / 100,001
        assert_eq!(
            offset.assets_to_shares(Uint128::new(10_000)).unwrap(),
            Uint128::zero()
        );
    }

    #[test]
    fn accrued_assets_raise_share_price() {
        // 1,000 shares over 1,100 assets after 10% growth
        let offset = VirtualOffset::new(Uint128::new(1_000), Uint128::new(1_100)).unwrap();

        // (500) * 1,101 / 1,001 = 549.95
        assert_eq!(
            offset.shares_to_assets(Uint128::new(500)).unwrap(),
            Uint128::new(549)
        );
        // (1,100) * 1,001 / 1,101 = 1000.09
        assert_eq!(
            offset.assets_to_shares(Uint128::new(1_100)).unwrap(),
            Uint128::new(1_000)
        );
    }

    #[test]
    fn overflow() {
        let err = VirtualOffset::new(Uint128::MAX, Uint128::MAX).unwrap_err();
        assert_eq!(err.to_string(), "Overflow: Cannot Add with given operands");
    }

    #[test]
    fn total_shares_per_token() {
        let mut deps = mock_dependencies();
        let token_a = deps.api.addr_make("token/a");
        let token_b = deps.api.addr_make("token/b");

        let mut total = TotalShares::load(&deps.storage, &token_a, Uint128::zero()).unwrap();
        total
            .checked_add_shares(&mut deps.storage, Uint128::new(300))
            .unwrap();
        assert_eq!(total.total_shares(), Uint128::new(300));

        assert_eq!(
            get_total_shares(&deps.storage, &token_a).unwrap(),
            Uint128::new(300)
        );
        assert_eq!(
            get_total_shares(&deps.storage, &token_b).unwrap(),
            Uint128::zero()
        );

        let mut total = TotalShares::load(&deps.storage, &token_a, Uint128::new(300)).unwrap();
        assert_eq!(
            total
                .checked_sub_shares(&mut deps.storage, Uint128::new(301))
                .unwrap_err(),
            StrategyError::InsufficientPosition {}
        );
        assert_eq!(
            total
                .checked_add_shares(&mut deps.storage, Uint128::zero())
                .unwrap_err(),
            StrategyError::ZeroShares {}
        );
        total
            .checked_sub_shares(&mut deps.storage, Uint128::new(100))
            .unwrap();
        assert_eq!(
            get_total_shares(&deps.storage, &token_a).unwrap(),
            Uint128::new(200)
        );

        total.clear(&mut deps.storage);
        assert_eq!(
            get_total_shares(&deps.storage, &token_a).unwrap(),
            Uint128::zero()
        );
    }
}
