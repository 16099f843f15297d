//! Bar-by-bar trade simulation state machine.
//!
//! States: Flat, Long, Short. Transitions, evaluated in bar order at the
//! close of the signal bar (the fill policy):
//! - Flat + Buy -> Long (entry commission charged)
//! - Flat + Sell -> Short, when short selling is enabled
//! - Long + Sell -> Flat; with short selling enabled the same Sell
//!   immediately reopens Short in the same step
//! - Short + Buy -> Flat (cover), then the same Buy reopens Long
//! - Hold -> no transition
//!
//! A closing signal arriving before `min_hold_bars` since entry is treated as
//! Hold. At series end any open position is force-closed at the final close
//! as a synthetic trade, so every run yields a fully realized equity curve.
//!
//! Accounting: quantity = cash / fill price; commissions are debited from
//! cash separately (`commission_rate * notional` per side), so net P&L per
//! round trip is gross P&L minus both sides' commissions. Equity is
//! marked-to-market every bar for the drawdown curve; realized cash moves
//! only on close.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Direction, OpenPosition, Signal, Trade};
use crate::error::CoreError;
use crate::indicators::IndicatorSet;
use crate::sim::metrics::{max_drawdown, total_return_pct, win_rate};
use crate::strategies::SignalStrategy;

/// Simulator configuration, validated at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub initial_capital: f64,
    /// Per-side commission as a fraction of notional (e.g. 0.0009).
    pub commission_rate: f64,
    /// When enabled, a Sell while Flat opens a short and a Buy while Short
    /// covers it.
    pub allow_short: bool,
    /// Minimum bars a position must be held before a closing signal acts.
    pub min_hold_bars: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission_rate: 0.0009,
            allow_short: false,
            min_hold_bars: 0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.initial_capital > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "initial_capital must be > 0, got {}",
                self.initial_capital
            )));
        }
        if self.commission_rate < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "commission_rate must be >= 0, got {}",
                self.commission_rate
            )));
        }
        Ok(())
    }
}

/// Complete result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_equity: f64,
    /// (final_equity / initial_capital - 1) * 100.
    pub total_return_pct: f64,
    pub trade_count: usize,
    /// Winning trades / total trades; 0.0 with no trades.
    pub win_rate: f64,
    /// Negative fraction: -0.15 means a 15% peak-to-trough decline.
    pub max_drawdown: f64,
    pub trades: Vec<Trade>,
    /// Marked-to-market equity, one entry per bar.
    pub equity_curve: Vec<f64>,
}

/// Consumes signals bar by bar and drives the position state machine.
#[derive(Debug, Clone)]
pub struct TradeSimulator {
    config: SimConfig,
}

impl TradeSimulator {
    pub fn new(config: SimConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run one simulation over the full bar series.
    ///
    /// The strategy and indicator set are read-only; all mutable state
    /// (cash, position, trade log) is local to this call, so one simulator
    /// can be shared across runs.
    pub fn run(
        &self,
        bars: &[Bar],
        strategy: &dyn SignalStrategy,
        set: &IndicatorSet,
    ) -> Result<BacktestResult, CoreError> {
        let rate = self.config.commission_rate;
        let mut cash = self.config.initial_capital;
        let mut position: Option<OpenPosition> = None;
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve: Vec<f64> = Vec::with_capacity(bars.len());

        for (i, bar) in bars.iter().enumerate() {
            let signal = strategy.evaluate(bars, i, set);
            let price = bar.close;

            // Decide the transition first, then apply it; a closing signal
            // inside the minimum hold window decides to Stay.
            enum Action {
                OpenLong,
                OpenShort,
                CloseLong,
                CloseShort,
                Stay,
            }
            let held_long_enough = |pos: &OpenPosition| {
                i - pos.entry_bar >= self.config.min_hold_bars
            };
            let action = match (&position, signal) {
                // A blown-out account (cash exhausted by commissions) stays flat.
                (None, Signal::Buy) if cash > 0.0 => Action::OpenLong,
                (None, Signal::Sell) if self.config.allow_short && cash > 0.0 => {
                    Action::OpenShort
                }
                (Some(pos), Signal::Sell)
                    if pos.direction == Direction::Long && held_long_enough(pos) =>
                {
                    Action::CloseLong
                }
                (Some(pos), Signal::Buy)
                    if pos.direction == Direction::Short && held_long_enough(pos) =>
                {
                    Action::CloseShort
                }
                // Hold, a signal in the direction already held, or a close
                // deferred by the minimum hold.
                _ => Action::Stay,
            };

            match action {
                Action::OpenLong => {
                    position = Some(open_position(&mut cash, Direction::Long, price, i, rate));
                }
                Action::OpenShort => {
                    position = Some(open_position(&mut cash, Direction::Short, price, i, rate));
                }
                Action::CloseLong => {
                    let pos = position.take().expect("long position present");
                    trades.push(close_position(&mut cash, pos, price, i, rate, false));
                    // The same Sell reopens Short in the same step.
                    if self.config.allow_short && cash > 0.0 {
                        position = Some(open_position(&mut cash, Direction::Short, price, i, rate));
                    }
                }
                Action::CloseShort => {
                    let pos = position.take().expect("short position present");
                    trades.push(close_position(&mut cash, pos, price, i, rate, false));
                    // Symmetric reopen: the covering Buy goes Long.
                    if cash > 0.0 {
                        position = Some(open_position(&mut cash, Direction::Long, price, i, rate));
                    }
                }
                Action::Stay => {}
            }

            let marked = match &position {
                Some(pos) => cash + position_value(pos, price),
                None => cash,
            };
            equity_curve.push(marked);
        }

        // Force-close any still-open position at the final close so the run
        // ends fully realized.
        if let Some(pos) = position.take() {
            let last = bars.len() - 1;
            let price = bars[last].close;
            trades.push(close_position(&mut cash, pos, price, last, rate, true));
            *equity_curve.last_mut().expect("curve non-empty here") = cash;
        }

        let final_equity = if equity_curve.is_empty() {
            self.config.initial_capital
        } else {
            cash
        };
        if !final_equity.is_finite() {
            return Err(CoreError::Evaluation(format!(
                "non-finite final equity {final_equity} from strategy {}",
                strategy.name()
            )));
        }

        Ok(BacktestResult {
            initial_capital: self.config.initial_capital,
            final_equity,
            total_return_pct: total_return_pct(self.config.initial_capital, final_equity),
            trade_count: trades.len(),
            win_rate: win_rate(&trades),
            max_drawdown: max_drawdown(&equity_curve),
            trades,
            equity_curve,
        })
    }
}

fn open_position(
    cash: &mut f64,
    direction: Direction,
    price: f64,
    bar_index: usize,
    rate: f64,
) -> OpenPosition {
    let quantity = *cash / price;
    let notional = quantity * price;
    let entry_commission = notional * rate;
    match direction {
        // Long: notional leaves cash; commission debited on top.
        Direction::Long => *cash -= notional + entry_commission,
        // Short: proceeds stay as margin; only the commission is debited.
        Direction::Short => *cash -= entry_commission,
    }
    OpenPosition {
        direction,
        entry_price: price,
        entry_bar: bar_index,
        quantity,
        entry_commission,
    }
}

fn close_position(
    cash: &mut f64,
    pos: OpenPosition,
    price: f64,
    bar_index: usize,
    rate: f64,
    forced: bool,
) -> Trade {
    let exit_notional = pos.quantity * price;
    let exit_commission = exit_notional * rate;
    let gross_pnl = pos.unrealized_pnl(price);

    match pos.direction {
        Direction::Long => *cash += exit_notional - exit_commission,
        Direction::Short => *cash += gross_pnl - exit_commission,
    }

    Trade {
        direction: pos.direction,
        entry_bar: pos.entry_bar,
        entry_price: pos.entry_price,
        exit_bar: bar_index,
        exit_price: price,
        quantity: pos.quantity,
        gross_pnl,
        commission: pos.entry_commission + exit_commission,
        net_pnl: gross_pnl - pos.entry_commission - exit_commission,
        bars_held: bar_index - pos.entry_bar,
        forced,
    }
}

/// Marked-to-market value of the open position at the given price, relative
/// to the cash already debited at entry.
fn position_value(pos: &OpenPosition, price: f64) -> f64 {
    match pos.direction {
        Direction::Long => pos.quantity * price,
        Direction::Short => pos.unrealized_pnl(price),
    }
}
