//! Client core of the finance dashboard: the shared view state, the query
//! client, and the widgets that render from them.

pub mod app;
pub mod debounce;
pub mod query;
pub mod state;
pub mod widget;
pub mod widgets;

#[cfg(test)]
mod testing;

pub use app::Dashboard;
pub use debounce::Debouncer;
pub use query::{DataSource, QueryClient};
pub use state::{
    DateKind, DateRange, EventKind, Listener, ReportPeriod, StateConfig, Subscription, Symbol,
    ViewState,
};
pub use widget::{Chart, Region, Request, ShapeError, Widget, WidgetStatus};
