// In crates/execution/src/simulated.rs

use crate::ledger::TradeLedger;
use crate::types::{Account, Position};
use analytics::types::Trade;
use core_types::{Bar, Error, Granularity, Market, PriceSeries, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strategies::Signal;
use tracing::{debug, info, warn};

/// What a finished simulation leaves behind.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Closed trades, in the order they were closed.
    pub trades: Vec<Trade>,
    /// Balances after the last bar, including any still-open position's base amount.
    pub account: Account,
    /// A position the data ran out on. It is never booked as a trade.
    pub open_position: Option<Position>,
}

/// A single-position, long-only fill simulator.
///
/// The simulator is either flat or holds exactly one position. Every buy
/// commits the same fixed quote notional and fills at the bar's close.
/// A simulator is consumed by [`TradeSimulator::run`], so balances and the
/// ledger are never shared between runs.
#[derive(Debug)]
pub struct TradeSimulator {
    account: Account,
    buy_order_quote: Decimal,
    position: Option<Position>,
    ledger: TradeLedger,
}

impl TradeSimulator {
    /// Creates a flat simulator.
    ///
    /// `buy_order_quote` must be positive and `initial_quote_balance` must not
    /// be negative.
    pub fn new(initial_quote_balance: Decimal, buy_order_quote: Decimal) -> Result<Self> {
        if buy_order_quote <= dec!(0) {
            return Err(Error::InvalidNotional { value: buy_order_quote });
        }
        if initial_quote_balance < dec!(0) {
            return Err(Error::InvalidNotional { value: initial_quote_balance });
        }
        Ok(Self {
            account: Account::new(initial_quote_balance),
            buy_order_quote,
            position: None,
            ledger: TradeLedger::new(),
        })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn open_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    /// Replays `signals` against `series`, one bar at a time, oldest first.
    pub fn run(
        mut self,
        series: &PriceSeries,
        signals: &[Signal],
        market: &Market,
        granularity: Granularity,
    ) -> Result<SimulationOutcome> {
        if series.len() != signals.len() {
            return Err(Error::SeriesMismatch {
                reason: format!("{} bars but {} signals", series.len(), signals.len()),
            });
        }

        for (index, (bar, signal)) in series.bars().iter().zip(signals).enumerate() {
            self.process_bar(index, bar, *signal, market, granularity)?;
        }

        if let Some(position) = &self.position {
            warn!(
                %market,
                entry_time = %position.entry_timestamp,
                base_amount = %position.base_amount,
                "Position still open at the end of the data. It is not included in the trade ledger."
            );
        }

        info!(
            %market,
            %granularity,
            trades = self.ledger.len(),
            quote_balance = %self.account.quote_balance,
            base_balance = %self.account.base_balance,
            "Simulation finished."
        );

        Ok(SimulationOutcome {
            trades: self.ledger.into_trades(),
            account: self.account,
            open_position: self.position,
        })
    }

    /// Applies one bar's signal.
    ///
    /// The buy is checked before the sell, so a bar flagged with both can open
    /// and close a position on the same close.
    pub fn process_bar(
        &mut self,
        index: usize,
        bar: &Bar,
        signal: Signal,
        market: &Market,
        granularity: Granularity,
    ) -> Result<Option<&Trade>> {
        if signal.buy && self.position.is_none() {
            self.process_entry(index, bar)?;
        }

        if signal.sell {
            if let Some(position) = self.position.take() {
                let trade = self.process_close(index, position, bar, market, granularity)?;
                return Ok(Some(self.ledger.record(trade)));
            }
        }

        Ok(None)
    }

    /// Opens a position worth `buy_order_quote` at the bar's close.
    fn process_entry(&mut self, index: usize, bar: &Bar) -> Result<()> {
        if bar.close <= dec!(0) {
            return Err(Error::InvalidPrice { index, price: bar.close });
        }
        let overflow = |operation| Error::ArithmeticOverflow { index, operation };
        let base_amount = self
            .buy_order_quote
            .checked_div(bar.close)
            .ok_or_else(|| overflow("sizing the buy"))?;

        self.account.quote_balance = self
            .account
            .quote_balance
            .checked_sub(self.buy_order_quote)
            .ok_or_else(|| overflow("debiting the quote balance"))?;
        self.account.base_balance = self
            .account
            .base_balance
            .checked_add(base_amount)
            .ok_or_else(|| overflow("crediting the base balance"))?;

        debug!(
            index,
            time = %bar.timestamp,
            price = %bar.close,
            %base_amount,
            quote_balance = %self.account.quote_balance,
            "Buy filled."
        );

        self.position = Some(Position {
            entry_index: index,
            entry_timestamp: bar.timestamp,
            entry_price: bar.close,
            base_amount,
            quote_spent: self.buy_order_quote,
            quote_balance_after_entry: self.account.quote_balance,
        });
        Ok(())
    }

    /// Sells the whole position at the bar's close and turns it into a `Trade`.
    fn process_close(
        &mut self,
        index: usize,
        position: Position,
        bar: &Bar,
        market: &Market,
        granularity: Granularity,
    ) -> Result<Trade> {
        let overflow = |operation| Error::ArithmeticOverflow { index, operation };
        if position.quote_spent <= dec!(0) {
            return Err(Error::InvalidNotional { value: position.quote_spent });
        }

        let quote_received = position
            .base_amount
            .checked_mul(bar.close)
            .ok_or_else(|| overflow("valuing the sell"))?;

        self.account.quote_balance = self
            .account
            .quote_balance
            .checked_add(quote_received)
            .ok_or_else(|| overflow("crediting the quote balance"))?;
        self.account.base_balance = self
            .account
            .base_balance
            .checked_sub(position.base_amount)
            .ok_or_else(|| overflow("debiting the base balance"))?;

        let profit = quote_received
            .checked_sub(position.quote_spent)
            .ok_or_else(|| overflow("computing profit"))?;
        let margin_percent = profit
            .checked_div(position.quote_spent)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| overflow("computing the margin"))?;

        debug!(
            index,
            time = %bar.timestamp,
            price = %bar.close,
            %quote_received,
            %profit,
            quote_balance = %self.account.quote_balance,
            "Sell filled."
        );

        Ok(Trade {
            market: market.clone(),
            granularity,
            entry_timestamp: position.entry_timestamp,
            entry_price: position.entry_price,
            quote_balance_after_entry: position.quote_balance_after_entry,
            quote_spent_on_entry: position.quote_spent,
            base_amount_acquired: position.base_amount,
            exit_timestamp: bar.timestamp,
            exit_price: bar.close,
            quote_received_on_exit: quote_received,
            quote_balance_after_exit: self.account.quote_balance,
            profit,
            margin_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn series(closes: &[Decimal]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| Bar {
                    timestamp: start + Duration::hours(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: dec!(1),
                })
                .collect(),
        )
    }

    fn market() -> Market {
        Market::from("BTC-GBP")
    }

    fn simulate(closes: &[Decimal], signals: &[Signal]) -> Result<SimulationOutcome> {
        TradeSimulator::new(dec!(1000), dec!(1000))?.run(&series(closes), signals, &market(), Granularity(3600))
    }

    const H: Signal = Signal::HOLD;
    const B: Signal = Signal::BUY;
    const S: Signal = Signal::SELL;

    #[test]
    fn buy_then_sell_books_one_trade() {
        let outcome = simulate(&[dec!(100), dec!(100), dec!(125), dec!(130)], &[H, B, S, H]).unwrap();

        assert_eq!(outcome.trades.len(), 1);
        let trade = &outcome.trades[0];
        assert_eq!(trade.market, market());
        assert_eq!(trade.granularity, Granularity(3600));
        assert_eq!(trade.entry_price, dec!(100));
        assert_eq!(trade.exit_price, dec!(125));
        assert_eq!(trade.base_amount_acquired, dec!(10));
        assert_eq!(trade.quote_spent_on_entry, dec!(1000));
        assert_eq!(trade.quote_balance_after_entry, dec!(0));
        assert_eq!(trade.quote_received_on_exit, dec!(1250));
        assert_eq!(trade.quote_balance_after_exit, dec!(1250));
        assert_eq!(trade.profit, dec!(250));
        assert_eq!(trade.margin_percent, dec!(25));
        assert!(trade.entry_timestamp < trade.exit_timestamp);

        assert_eq!(outcome.account, Account { quote_balance: dec!(1250), base_balance: dec!(0) });
        assert!(outcome.open_position.is_none());
    }

    #[test]
    fn sell_while_flat_is_ignored() {
        let outcome = simulate(&[dec!(100), dec!(110)], &[S, S]).unwrap();
        assert!(outcome.trades.is_empty());
        assert_eq!(outcome.account, Account::new(dec!(1000)));
    }

    #[test]
    fn buy_while_in_position_does_not_pyramid() {
        let outcome = simulate(&[dec!(100), dec!(50), dec!(200)], &[B, B, S]).unwrap();

        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].entry_price, dec!(100));
        assert_eq!(outcome.trades[0].base_amount_acquired, dec!(10));
        assert_eq!(outcome.trades[0].profit, dec!(1000));
    }

    #[test]
    fn buy_and_sell_on_the_same_bar_round_trips_at_that_close() {
        let both = Signal { buy: true, sell: true };
        let outcome = simulate(&[dec!(100), dec!(80)], &[H, both]).unwrap();

        assert_eq!(outcome.trades.len(), 1);
        let trade = &outcome.trades[0];
        assert_eq!(trade.entry_timestamp, trade.exit_timestamp);
        assert_eq!(trade.profit, dec!(0));
    }

    #[test]
    fn open_position_at_the_end_is_not_booked() {
        let outcome = simulate(&[dec!(100), dec!(120), dec!(150)], &[H, B, H]).unwrap();

        assert!(outcome.trades.is_empty());
        let position = outcome.open_position.expect("position should still be open");
        assert_eq!(position.entry_index, 1);
        assert_eq!(position.entry_price, dec!(120));
        assert_eq!(outcome.account.quote_balance, dec!(0));
        assert_eq!(outcome.account.base_balance, position.base_amount);
    }

    #[test]
    fn buying_at_a_non_positive_price_fails() {
        let err = simulate(&[dec!(100), dec!(0)], &[H, B]).unwrap_err();
        assert_eq!(err, Error::InvalidPrice { index: 1, price: dec!(0) });
    }

    #[test]
    fn overflowing_the_margin_is_an_error_not_a_panic() {
        let simulator = TradeSimulator::new(dec!(1000), dec!(1)).unwrap();
        let closes = [Decimal::new(1, 28), dec!(1)];

        let err = simulator
            .run(&series(&closes), &[B, S], &market(), Granularity(3600))
            .unwrap_err();
        assert_eq!(err, Error::ArithmeticOverflow { index: 1, operation: "computing the margin" });
    }

    #[test]
    fn selling_at_zero_books_a_total_loss() {
        let outcome = simulate(&[dec!(100), dec!(0)], &[B, S]).unwrap();
        assert_eq!(outcome.trades[0].profit, dec!(-1000));
        assert_eq!(outcome.trades[0].margin_percent, dec!(-100));
    }

    #[test]
    fn rejects_signal_count_mismatch() {
        let err = simulate(&[dec!(100), dec!(110)], &[H]).unwrap_err();
        assert!(matches!(err, Error::SeriesMismatch { .. }));
    }

    #[test]
    fn rejects_non_positive_notional() {
        assert_eq!(
            TradeSimulator::new(dec!(1000), dec!(0)).unwrap_err(),
            Error::InvalidNotional { value: dec!(0) }
        );
        assert!(TradeSimulator::new(dec!(-1), dec!(10)).is_err());
    }

    #[test]
    fn balances_carry_over_between_trades() {
        let outcome = simulate(
            &[dec!(100), dec!(200), dec!(50), dec!(25)],
            &[B, S, B, S],
        )
        .unwrap();

        assert_eq!(outcome.trades.len(), 2);
        assert_eq!(outcome.trades[0].quote_balance_after_exit, dec!(2000));
        assert_eq!(outcome.trades[1].quote_balance_after_entry, dec!(1000));
        assert_eq!(outcome.trades[1].profit, dec!(-500));
        assert_eq!(outcome.trades[1].quote_balance_after_exit, dec!(1500));
    }

    fn arb_signal() -> impl Strategy<Value = Signal> {
        (any::<bool>(), any::<bool>()).prop_map(|(buy, sell)| Signal { buy, sell })
    }

    proptest! {
        #[test]
        fn accounting_is_conserved_for_every_trade(
            bars in prop::collection::vec((1u32..1_000_000u32, arb_signal()), 1..120),
        ) {
            let closes: Vec<Decimal> = bars.iter().map(|(cents, _)| Decimal::new(*cents as i64, 2)).collect();
            let signals: Vec<Signal> = bars.iter().map(|(_, s)| *s).collect();
            let outcome = simulate(&closes, &signals).unwrap();

            for trade in &outcome.trades {
                prop_assert!(trade.base_amount_acquired > dec!(0));
                prop_assert!(trade.entry_timestamp <= trade.exit_timestamp);
                prop_assert_eq!(
                    trade.quote_balance_after_exit,
                    trade.quote_balance_after_entry + trade.quote_received_on_exit
                );
                prop_assert_eq!(trade.profit, trade.quote_received_on_exit - trade.quote_spent_on_entry);
            }
        }
    }
}
