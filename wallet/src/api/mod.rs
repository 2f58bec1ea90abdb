//! Query and command surface for the presentation shell.
//!
//! Functions here follow the same shape as the flows: validate input, run
//! the operation against the shared context, return a serde view. Errors
//! never propagate past the calling screen; [`resolve_action`] turns them
//! into their single user-visible notification.

pub mod types;

use uuid::Uuid;

use crate::address_book::{AddressDraft, AddressPatch, AddressRecord};
use crate::app_state::SharedWalletContext;
use crate::currency::{convert, Amount, REFERENCE_SYMBOL};
use crate::errors::WalletResult;
use crate::notify::NotificationCenter;

use types::{
    ActiveHoldsResponse, AddAddressRequest, BalancesResponse, CurrencyView,
    ExchangeQuoteRequest, ExchangeQuoteResponse, HoldView, ListAddressesResponse,
    SelectAddressResponse, TransactionHistoryResponse, TransactionView, UpdateAddressRequest,
    WalletInfoResponse,
};

/// Resolve a user action: pass successes through, turn failures into their
/// notification. Nothing propagates past the screen that triggered it.
pub fn resolve_action<T>(center: &NotificationCenter, result: WalletResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            center.report_error(&error);
            None
        }
    }
}

/// Dashboard header data: profile plus derived totals.
pub fn wallet_info(state: &SharedWalletContext) -> WalletResult<WalletInfoResponse> {
    state.read(|ctx| {
        let total = ctx.catalog().total_reference_balance()?;
        let usd_rate = ctx.catalog().require("USDT")?.reference_rate;
        let total_usd = convert(total, Amount::from_whole(1)?, usd_rate)?;
        Ok(WalletInfoResponse {
            profile: ctx.portfolio().profile().clone(),
            total_balance: total.as_string(),
            total_balance_usd: total_usd.as_string(),
            active_holds: ctx.portfolio().active_hold_count() as u32,
        })
    })
}

pub fn list_balances(state: &SharedWalletContext) -> WalletResult<BalancesResponse> {
    state.read(|ctx| {
        let currencies = ctx
            .catalog()
            .list()
            .iter()
            .map(CurrencyView::try_from_info)
            .collect::<WalletResult<Vec<_>>>()?;
        Ok(BalancesResponse {
            reference_symbol: REFERENCE_SYMBOL.to_string(),
            currencies,
        })
    })
}

pub fn transaction_history(
    state: &SharedWalletContext,
) -> WalletResult<TransactionHistoryResponse> {
    state.read(|ctx| {
        let transactions: Vec<TransactionView> = ctx
            .portfolio()
            .transactions()
            .iter()
            .map(TransactionView::from)
            .collect();
        let total_count = transactions.len() as u64;
        Ok(TransactionHistoryResponse {
            transactions,
            total_count,
        })
    })
}

pub fn active_holds(state: &SharedWalletContext) -> WalletResult<ActiveHoldsResponse> {
    state.read(|ctx| {
        Ok(ActiveHoldsResponse {
            holds: ctx.portfolio().holds().iter().map(HoldView::from).collect(),
        })
    })
}

pub fn list_addresses(state: &SharedWalletContext) -> WalletResult<ListAddressesResponse> {
    state.read(|ctx| {
        Ok(ListAddressesResponse {
            records: ctx.address_book().list().to_vec(),
        })
    })
}

pub fn add_address(
    state: &SharedWalletContext,
    request: AddAddressRequest,
) -> WalletResult<AddressRecord> {
    state.write(|ctx| {
        let record = ctx.address_book_mut().add(AddressDraft {
            name: request.name.clone(),
            address: request.address.clone(),
            network: request.network,
            currency: request.currency.clone(),
        })?;
        Ok(record.clone())
    })
}

pub fn update_address(
    state: &SharedWalletContext,
    request: UpdateAddressRequest,
) -> WalletResult<AddressRecord> {
    state.write(|ctx| {
        let record = ctx.address_book_mut().update(
            request.id,
            AddressPatch {
                name: request.name.clone(),
                address: request.address.clone(),
                network: request.network,
                currency: request.currency.clone(),
            },
        )?;
        Ok(record.clone())
    })
}

pub fn remove_address(state: &SharedWalletContext, id: Uuid) -> WalletResult<()> {
    state.write(|ctx| {
        ctx.address_book_mut().remove(id);
        Ok(())
    })
}

pub fn select_address(
    state: &SharedWalletContext,
    id: Uuid,
) -> WalletResult<SelectAddressResponse> {
    state.read(|ctx| {
        let address = ctx.address_book().select_for_use(id)?;
        Ok(SelectAddressResponse {
            address,
            close_book: true,
        })
    })
}

/// Stateless conversion preview for the exchange screen.
pub fn exchange_quote(
    state: &SharedWalletContext,
    request: ExchangeQuoteRequest,
) -> WalletResult<ExchangeQuoteResponse> {
    state.read(|ctx| {
        let amount = Amount::from_string(&request.amount).unwrap_or(Amount::ZERO);
        let converted = ctx
            .catalog()
            .convert(amount, &request.from_currency, &request.to_currency)?;
        let cross_rate = ctx
            .catalog()
            .cross_rate(&request.from_currency, &request.to_currency)?;
        Ok(ExchangeQuoteResponse {
            from_currency: request.from_currency.clone(),
            to_currency: request.to_currency.clone(),
            cross_rate: cross_rate.to_fixed_string(),
            converted_amount: converted.to_fixed_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::WalletContext;
    use crate::config::WalletConfig;
    use crate::currency::Network;
    use crate::errors::WalletError;
    use crate::notify::Severity;

    fn state() -> SharedWalletContext {
        SharedWalletContext::new(WalletContext::with_config(WalletConfig::default()))
    }

    #[test]
    fn wallet_info_derives_totals_from_the_catalog() {
        let info = wallet_info(&state()).unwrap();
        // 0.00234567x4200000 + 1.25x280000 + 1250x90 + 2.5x27000
        assert_eq!(info.total_balance, "539851.814");
        assert_eq!(info.active_holds, 3);
        assert_eq!(info.profile.account_id, 1_247_859);
    }

    #[test]
    fn balances_expose_every_catalog_entry() {
        let balances = list_balances(&state()).unwrap();
        assert_eq!(balances.reference_symbol, "RUB");
        assert_eq!(balances.currencies.len(), 4);
        let usdt = balances
            .currencies
            .iter()
            .find(|c| c.symbol == "USDT")
            .unwrap();
        assert_eq!(usdt.reference_balance, "112500");
        assert_eq!(usdt.default_network, Network::Trc20);
    }

    #[test]
    fn address_book_round_trip() {
        let state = state();
        let record = add_address(
            &state,
            AddAddressRequest {
                name: "Savings".to_string(),
                address: "0xabcdef1234567890".to_string(),
                network: Network::Erc20,
                currency: "ETH".to_string(),
            },
        )
        .unwrap();

        let updated = update_address(
            &state,
            UpdateAddressRequest {
                id: record.id,
                name: Some("Cold storage".to_string()),
                address: None,
                network: None,
                currency: None,
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Cold storage");

        let selected = select_address(&state, record.id).unwrap();
        assert_eq!(selected.address, "0xabcdef1234567890");
        assert!(selected.close_book);

        remove_address(&state, record.id).unwrap();
        // Idempotent: removing again is still fine
        remove_address(&state, record.id).unwrap();
        assert!(matches!(
            select_address(&state, record.id),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn quote_endpoint_matches_flow_arithmetic() {
        let quote = exchange_quote(
            &state(),
            ExchangeQuoteRequest {
                from_currency: "BTC".to_string(),
                to_currency: "USDT".to_string(),
                amount: "1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(quote.converted_amount, "46666.66666667");
    }

    #[test]
    fn resolve_action_emits_exactly_one_notification_per_failure() {
        let center = NotificationCenter::new();
        let outcome: Option<()> =
            resolve_action(&center, Err(WalletError::SameCurrencySelected));
        assert!(outcome.is_none());

        let drained = center.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].severity, Severity::Destructive);

        let outcome = resolve_action(&center, Ok(7));
        assert_eq!(outcome, Some(7));
        assert_eq!(center.pending(), 0);
    }
}
