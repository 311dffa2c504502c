use anyhow::{Context, Result};
use models::{DashboardSettings, Resource};
use serde_json::{json, Value};
use std::rc::Rc;
use std::time::Duration;

use crate::debounce::Debouncer;
use crate::query::DataSource;
use crate::state::{EventKind, StateConfig, Symbol, ViewState};
use crate::widget::Widget;
use crate::widgets::{
    FlowDiagram, IntradayChart, Overview, SentimentGauge, SymbolTable, TimeSlider, WordCloud,
};

const SETTLE_POLL: Duration = Duration::from_millis(10);

/// Composition root: one view state, every widget mounted on it.
///
/// Widgets never reference each other; they only meet through `state`.
pub struct Dashboard {
    state: Rc<ViewState>,
    pub table: Widget<SymbolTable>,
    pub slider: Widget<TimeSlider>,
    pub overview: Widget<Overview>,
    pub intraday: Widget<IntradayChart>,
    pub flow: Widget<FlowDiagram>,
    pub word_cloud: Widget<WordCloud>,
    pub gauge: Widget<SentimentGauge>,
    resize: Debouncer,
}

impl Dashboard {
    /// Seeds the state from the first listed company and mounts every widget.
    ///
    /// Must run inside a `tokio::task::LocalSet`.
    pub async fn bootstrap(settings: &DashboardSettings, source: Rc<dyn DataSource>) -> Result<Self> {
        let symbol = seed_symbol(source.as_ref(), settings).await?;
        tracing::info!(symbol = %symbol, "bootstrapping dashboard");

        let state = Rc::new(ViewState::new(StateConfig::from(settings), symbol));

        let weak = Rc::downgrade(&state);
        let resize = Debouncer::new(
            Duration::from_millis(settings.resize_debounce_ms),
            move || {
                if let Some(state) = weak.upgrade() {
                    state.dispatch(EventKind::Resize);
                }
            },
        );

        let dashboard = Self {
            table: Widget::new(SymbolTable, Rc::clone(&state), Rc::clone(&source)),
            slider: Widget::new(TimeSlider, Rc::clone(&state), Rc::clone(&source)),
            overview: Widget::new(Overview, Rc::clone(&state), Rc::clone(&source)),
            intraday: Widget::new(IntradayChart, Rc::clone(&state), Rc::clone(&source)),
            flow: Widget::new(FlowDiagram, Rc::clone(&state), Rc::clone(&source)),
            word_cloud: Widget::new(WordCloud, Rc::clone(&state), Rc::clone(&source)),
            gauge: Widget::new(SentimentGauge, Rc::clone(&state), source),
            state,
            resize,
        };
        dashboard.mount_all();
        Ok(dashboard)
    }

    pub fn state(&self) -> &Rc<ViewState> {
        &self.state
    }

    pub fn mount_all(&self) {
        self.table.mount();
        self.slider.mount();
        self.overview.mount();
        self.intraday.mount();
        self.flow.mount();
        self.word_cloud.mount();
        self.gauge.mount();
    }

    pub fn unmount_all(&self) {
        self.table.unmount();
        self.slider.unmount();
        self.overview.unmount();
        self.intraday.unmount();
        self.flow.unmount();
        self.word_cloud.unmount();
        self.gauge.unmount();
        self.resize.cancel();
    }

    /// Viewport changed. Bursts collapse into one RESIZE after the configured delay.
    pub fn window_resized(&self) {
        self.resize.trigger();
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn is_settled(&self) -> bool {
        !(self.table.is_loading()
            || self.slider.is_loading()
            || self.overview.is_loading()
            || self.intraday.is_loading()
            || self.flow.is_loading()
            || self.word_cloud.is_loading()
            || self.gauge.is_loading())
    }

    /// Waits until no widget is loading.
    pub async fn settled(&self) {
        while !self.is_settled() {
            tokio::time::sleep(SETTLE_POLL).await;
        }
    }

    /// Current selection plus every region's status.
    pub fn snapshot(&self) -> Result<Value> {
        let period = self.state.report_period();
        Ok(json!({
            "state": {
                "symbol": self.state.symbol().as_str(),
                "period": period.label(self.state.start_year()),
                "year": period.year(self.state.start_year()),
                "variant": self.state.report_variant(),
            },
            "table": serde_json::to_value(self.table.status())?,
            "slider": serde_json::to_value(self.slider.status())?,
            "overview": serde_json::to_value(self.overview.status())?,
            "intraday": serde_json::to_value(self.intraday.status())?,
            "flow": serde_json::to_value(self.flow.status())?,
            "word_cloud": serde_json::to_value(self.word_cloud.status())?,
            "gauge": serde_json::to_value(self.gauge.status())?,
        }))
    }
}

async fn seed_symbol(source: &dyn DataSource, settings: &DashboardSettings) -> Result<Symbol> {
    let listed = source
        .query(Resource::Symbols, None)
        .await
        .and_then(|rows| rows.into_iter().next())
        .and_then(|row| row.get("Symbol").and_then(Value::as_str).and_then(Symbol::new));

    match listed {
        Some(symbol) => Ok(symbol),
        None => {
            tracing::warn!(
                fallback = %settings.default_symbol,
                "no symbols listed; using configured default"
            );
            Symbol::new(&settings.default_symbol).context("default_symbol is blank")
        }
    }
}
