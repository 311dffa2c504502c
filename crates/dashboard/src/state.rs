//! Shared view state for every widget on the page.
//!
//! `ViewState` holds the current selection (ticker, report period, flow
//! diagram variant) and a listener list per [`EventKind`]. Setters assign and
//! then notify synchronously, in registration order, before returning.
//! Everything lives on one thread; fields use `Cell`/`RefCell` so widgets can
//! share the container through an `Rc`.

use models::{DashboardSettings, ReportVariant};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Slots per year on the time axis: the annual marker plus four quarters.
pub const SLOTS_PER_YEAR: u32 = 5;

const QUARTER_END: [(u32, u32); 4] = [(3, 31), (6, 30), (9, 30), (12, 31)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Symbol,
    Time,
    Resize,
    ReportVariantSelect,
}

impl EventKind {
    fn bit(self) -> u8 {
        match self {
            EventKind::Symbol => 1,
            EventKind::Time => 1 << 1,
            EventKind::Resize => 1 << 2,
            EventKind::ReportVariantSelect => 1 << 3,
        }
    }
}

/// Callback invoked on dispatch. Identity is the `Rc` allocation.
pub type Listener = Rc<dyn Fn(&ViewState)>;

/// A ticker symbol. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub transition_duration: Duration,
}

impl From<&DashboardSettings> for StateConfig {
    fn from(settings: &DashboardSettings) -> Self {
        Self {
            start_year: settings.start_year,
            end_year: settings.end_year,
            transition_duration: Duration::from_millis(settings.transition_duration_ms),
        }
    }
}

/// Selected time bucket, as a slot offset from the configured start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportPeriod {
    quarter_index: u32,
}

impl ReportPeriod {
    pub fn at_slot(slot: u32) -> Self {
        Self {
            quarter_index: slot,
        }
    }

    pub fn slot(self) -> u32 {
        self.quarter_index
    }

    pub fn is_quarterly(self) -> bool {
        self.quarter_index % SLOTS_PER_YEAR != 0
    }

    /// 1..=4 for a quarter, `None` for the annual marker.
    pub fn quarter(self) -> Option<u32> {
        let q = self.quarter_index % SLOTS_PER_YEAR;
        (q != 0).then_some(q)
    }

    pub fn year(self, start_year: i32) -> i32 {
        start_year + (self.quarter_index / SLOTS_PER_YEAR) as i32
    }

    /// `2016` for an annual marker, `Q3` for a quarter.
    pub fn label(self, start_year: i32) -> String {
        match self.quarter() {
            Some(q) => format!("Q{q}"),
            None => self.year(start_year).to_string(),
        }
    }
}

/// String layout of a date range; each dataset stores timestamps differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// `fiscalDateEnding`: `2016-12-31`
    Report,
    /// `datetime`: `2016-12-31 23:59:59`
    Intraday,
    /// `time_published`: `20161231T235959`
    News,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

pub struct ViewState {
    config: StateConfig,
    symbol: RefCell<Symbol>,
    period: Cell<ReportPeriod>,
    variant: Cell<ReportVariant>,
    listeners: RefCell<HashMap<EventKind, Vec<Listener>>>,
    dispatching: Cell<u8>,
}

impl ViewState {
    pub fn new(config: StateConfig, symbol: Symbol) -> Self {
        Self {
            config,
            symbol: RefCell::new(symbol),
            period: Cell::new(ReportPeriod::default()),
            variant: Cell::new(ReportVariant::default()),
            listeners: RefCell::new(HashMap::new()),
            dispatching: Cell::new(0),
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol.borrow().clone()
    }

    pub fn report_period(&self) -> ReportPeriod {
        self.period.get()
    }

    pub fn report_variant(&self) -> ReportVariant {
        self.variant.get()
    }

    pub fn transition_duration(&self) -> Duration {
        self.config.transition_duration
    }

    pub fn start_year(&self) -> i32 {
        self.config.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.config.end_year
    }

    /// Number of selectable slots, inclusive of the final year.
    pub fn slot_count(&self) -> u32 {
        let years = i64::from(self.config.end_year) - i64::from(self.config.start_year) + 1;
        u32::try_from(years.max(0))
            .unwrap_or(u32::MAX)
            .saturating_mul(SLOTS_PER_YEAR)
    }

    pub fn set_symbol(&self, symbol: Symbol) {
        tracing::debug!(symbol = %symbol, "symbol selected");
        *self.symbol.borrow_mut() = symbol;
        self.dispatch(EventKind::Symbol);
    }

    pub fn set_report_period(&self, period: ReportPeriod) {
        tracing::debug!(slot = period.slot(), "report period selected");
        self.period.set(period);
        self.dispatch(EventKind::Time);
    }

    pub fn set_quarter(&self, slot: u32) {
        self.set_report_period(ReportPeriod::at_slot(slot));
    }

    pub fn set_report_variant(&self, variant: ReportVariant) {
        tracing::debug!(variant = variant.as_str(), "report variant selected");
        self.variant.set(variant);
        self.dispatch(EventKind::ReportVariantSelect);
    }

    /// Appends `listener`. The same callback may be registered more than once.
    pub fn add_listener(&self, kind: EventKind, listener: Listener) {
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(listener);
    }

    /// Removes the first registration of `listener`; no-op when absent.
    pub fn remove_listener(&self, kind: EventKind, listener: &Listener) {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&kind) else {
            return;
        };
        if let Some(idx) = list.iter().position(|l| same_listener(l, listener)) {
            list.remove(idx);
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Registers `listener` and returns a handle that removes it when dropped.
    pub fn subscribe(self: &Rc<Self>, kind: EventKind, listener: Listener) -> Subscription {
        self.add_listener(kind, Rc::clone(&listener));
        Subscription {
            state: Rc::downgrade(self),
            kind,
            listener: Some(listener),
        }
    }

    /// Calls every listener registered for `kind` when dispatch starts.
    ///
    /// Listeners added or removed while the pass runs take effect on the next
    /// dispatch. A listener that re-dispatches its own kind is ignored.
    pub fn dispatch(&self, kind: EventKind) {
        if self.dispatching.get() & kind.bit() != 0 {
            tracing::warn!(?kind, "ignoring re-entrant dispatch");
            return;
        }

        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default();
        if snapshot.is_empty() {
            return;
        }

        let _guard = DispatchGuard::enter(&self.dispatching, kind);
        tracing::trace!(?kind, listeners = snapshot.len(), "dispatching");
        for listener in snapshot {
            listener(self);
        }
    }

    /// Start and end of the selected period, formatted for `kind`.
    pub fn query_date_range(&self, kind: DateKind) -> DateRange {
        let period = self.report_period();
        let year = period.year(self.config.start_year);
        let (start_month, (end_month, end_day)) = match period.quarter() {
            Some(q) => (3 * q - 2, QUARTER_END[(q - 1) as usize]),
            None => (1, (12, 31)),
        };

        let (start, end) = match kind {
            DateKind::Report => (
                format!("{year:04}-{start_month:02}-01"),
                format!("{year:04}-{end_month:02}-{end_day:02}"),
            ),
            DateKind::Intraday => (
                format!("{year:04}-{start_month:02}-01 00:00:00"),
                format!("{year:04}-{end_month:02}-{end_day:02} 23:59:59"),
            ),
            DateKind::News => (
                format!("{year:04}{start_month:02}01T000000"),
                format!("{year:04}{end_month:02}{end_day:02}T235959"),
            ),
        };
        DateRange { start, end }
    }
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("symbol", &self.symbol())
            .field("period", &self.report_period())
            .field("variant", &self.report_variant())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

struct DispatchGuard<'a> {
    flags: &'a Cell<u8>,
    bit: u8,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flags: &'a Cell<u8>, kind: EventKind) -> Self {
        let bit = kind.bit();
        flags.set(flags.get() | bit);
        Self { flags, bit }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flags.set(self.flags.get() & !self.bit);
    }
}

/// Handle returned by [`ViewState::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    state: Weak<ViewState>,
    kind: EventKind,
    listener: Option<Listener>,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let (Some(state), Some(listener)) = (self.state.upgrade(), self.listener.take()) {
            state.remove_listener(self.kind, &listener);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("active", &self.listener.is_some())
            .finish()
    }
}
