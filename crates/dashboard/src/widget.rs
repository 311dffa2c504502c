//! Widget lifecycle: mount, fetch, shape, render, resubscribe.
//!
//! A [`Widget`] owns one output [`Region`] and drives a [`Chart`] through
//! `Unmounted -> Loading -> {Rendered | Empty}`. Every refresh takes a new
//! generation token; a fetch that resolves after a newer refresh started is
//! dropped without touching the region.

use models::{QueryParams, QueryResult, Resource, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;

use crate::query::DataSource;
use crate::state::{EventKind, Listener, Subscription, ViewState};

/// Row data did not match what a chart needs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("row {row} has no `{column}` column")]
    MissingColumn { row: usize, column: &'static str },

    #[error("row {row}: {reason}")]
    InvalidValue { row: usize, reason: String },

    #[error("nothing to draw")]
    Empty,
}

/// One call to the query surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub resource: Resource,
    pub params: Option<QueryParams>,
}

impl Request {
    pub fn get(resource: Resource) -> Self {
        Self {
            resource,
            params: None,
        }
    }

    pub fn post(resource: Resource, params: QueryParams) -> Self {
        Self {
            resource,
            params: Some(params),
        }
    }
}

/// The per-widget part: what to fetch and how to turn rows into a view.
pub trait Chart: 'static {
    type Shape: Clone + fmt::Debug + Serialize;

    /// Dataset name shown in the placeholder.
    const NAME: &'static str;

    fn subscriptions(&self) -> &'static [EventKind];

    /// `None` when the chart draws from view state alone.
    fn request(&self, state: &ViewState) -> Option<Request>;

    fn shape(&self, state: &ViewState, rows: QueryResult) -> Result<Self::Shape, ShapeError>;

    fn dataset_name(&self, _state: &ViewState) -> &'static str {
        Self::NAME
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum WidgetStatus<S> {
    Unmounted,
    Loading,
    Rendered(S),
    Empty(String),
}

/// A widget's own output surface.
#[derive(Debug)]
pub struct Region<S> {
    status: WidgetStatus<S>,
    renders: u64,
}

impl<S> Default for Region<S> {
    fn default() -> Self {
        Self {
            status: WidgetStatus::Unmounted,
            renders: 0,
        }
    }
}

impl<S> Region<S> {
    pub fn status(&self) -> &WidgetStatus<S> {
        &self.status
    }

    /// Number of completed renders, placeholder included.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    fn clear(&mut self) {
        self.status = WidgetStatus::Unmounted;
    }

    fn begin_loading(&mut self) {
        self.status = WidgetStatus::Loading;
    }

    fn draw(&mut self, shape: S) {
        self.status = WidgetStatus::Rendered(shape);
        self.renders += 1;
    }

    fn placeholder(&mut self, text: String) {
        self.status = WidgetStatus::Empty(text);
        self.renders += 1;
    }
}

pub fn placeholder_text(dataset: &str, symbol: &str) -> String {
    format!("No {dataset} data available for {symbol}")
}

/// Mount controller for one chart bound to the shared view state.
pub struct Widget<C: Chart> {
    inner: Rc<WidgetInner<C>>,
}

struct WidgetInner<C: Chart> {
    chart: C,
    state: Rc<ViewState>,
    source: Rc<dyn DataSource>,
    region: RefCell<Region<C::Shape>>,
    generation: Cell<u64>,
    mounted: Cell<bool>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<C: Chart> Widget<C> {
    pub fn new(chart: C, state: Rc<ViewState>, source: Rc<dyn DataSource>) -> Self {
        Self {
            inner: Rc::new(WidgetInner {
                chart,
                state,
                source,
                region: RefCell::new(Region::default()),
                generation: Cell::new(0),
                mounted: Cell::new(false),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Clears the region, subscribes, and starts the first fetch.
    ///
    /// Mounting an already mounted widget drops the old subscriptions first,
    /// so listener counts never grow across remounts. Fetches run on
    /// `spawn_local`; call from inside a `LocalSet`.
    pub fn mount(&self) {
        self.unsubscribe_all();
        self.inner.region.borrow_mut().clear();

        let mut subscriptions = Vec::new();
        for &kind in self.inner.chart.subscriptions() {
            let weak: Weak<WidgetInner<C>> = Rc::downgrade(&self.inner);
            let listener: Listener = Rc::new(move |_: &ViewState| {
                if let Some(inner) = weak.upgrade() {
                    WidgetInner::refresh(&inner);
                }
            });
            subscriptions.push(self.inner.state.subscribe(kind, listener));
        }
        *self.inner.subscriptions.borrow_mut() = subscriptions;
        self.inner.mounted.set(true);

        tracing::debug!(widget = C::NAME, "mounted");
        WidgetInner::refresh(&self.inner);
    }

    /// Drops every subscription and invalidates any fetch in flight.
    pub fn unmount(&self) {
        self.unsubscribe_all();
        self.inner.mounted.set(false);
        self.inner.bump_generation();
        self.inner.region.borrow_mut().clear();
        tracing::debug!(widget = C::NAME, "unmounted");
    }

    pub fn remount(&self) {
        self.unmount();
        self.mount();
    }

    /// Re-runs fetch and render against the current view state. No-op while unmounted.
    pub fn refresh(&self) {
        if !self.is_mounted() {
            tracing::debug!(widget = C::NAME, "refresh ignored while unmounted");
            return;
        }
        WidgetInner::refresh(&self.inner);
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.inner.region.borrow().status(), WidgetStatus::Loading)
    }

    pub fn status(&self) -> WidgetStatus<C::Shape> {
        self.inner.region.borrow().status().clone()
    }

    pub fn region(&self) -> Ref<'_, Region<C::Shape>> {
        self.inner.region.borrow()
    }

    pub fn renders(&self) -> u64 {
        self.inner.region.borrow().renders()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    pub fn chart(&self) -> &C {
        &self.inner.chart
    }

    pub fn state(&self) -> &Rc<ViewState> {
        &self.inner.state
    }

    /// Edits the rendered view in place without fetching. No-op unless rendered.
    pub(crate) fn update_view(&self, edit: impl FnOnce(&mut C::Shape)) -> bool {
        let mut guard = self.inner.region.borrow_mut();
        let region = &mut *guard;
        match &mut region.status {
            WidgetStatus::Rendered(shape) => {
                edit(shape);
                region.renders += 1;
                true
            }
            _ => false,
        }
    }

    fn unsubscribe_all(&self) {
        // Take first: dropping a Subscription borrows the state's listener list
        let old = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        drop(old);
    }
}

impl<C: Chart> Drop for Widget<C> {
    fn drop(&mut self) {
        self.unsubscribe_all();
        self.inner.bump_generation();
    }
}

impl<C: Chart> WidgetInner<C> {
    fn bump_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    fn refresh(inner: &Rc<Self>) {
        let generation = inner.bump_generation();
        inner.region.borrow_mut().begin_loading();

        match inner.chart.request(&inner.state) {
            None => inner.render(generation, Vec::new()),
            Some(request) => {
                let inner = Rc::clone(inner);
                tokio::task::spawn_local(async move {
                    tracing::debug!(
                        widget = C::NAME,
                        resource = %request.resource,
                        generation,
                        "fetching"
                    );
                    let rows = inner.source.query(request.resource, request.params).await;
                    inner.commit(generation, rows);
                });
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation == self.generation.get() {
            return true;
        }
        tracing::debug!(
            widget = C::NAME,
            generation,
            current = self.generation.get(),
            "discarding stale result"
        );
        false
    }

    fn commit(&self, generation: u64, rows: Option<QueryResult>) {
        if !self.is_current(generation) {
            return;
        }
        match rows {
            Some(rows) if !rows.is_empty() => self.render(generation, rows),
            _ => self.show_placeholder(),
        }
    }

    fn render(&self, generation: u64, rows: QueryResult) {
        if !self.is_current(generation) {
            return;
        }
        match self.chart.shape(&self.state, rows) {
            Ok(shape) => self.region.borrow_mut().draw(shape),
            Err(e) => {
                tracing::warn!(widget = C::NAME, error = %e, "rows do not fit the chart");
                self.show_placeholder();
            }
        }
    }

    fn show_placeholder(&self) {
        let symbol = self.state.symbol();
        let text = placeholder_text(self.chart.dataset_name(&self.state), symbol.as_str());
        self.region.borrow_mut().placeholder(text);
    }
}

/// Checks that every row carries `columns`, then deserializes each row as `T`.
pub fn typed_rows<T: DeserializeOwned>(
    rows: QueryResult,
    columns: &[&'static str],
) -> Result<Vec<T>, ShapeError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| typed_row(idx, row, columns))
        .collect()
}

fn typed_row<T: DeserializeOwned>(
    idx: usize,
    row: Row,
    columns: &[&'static str],
) -> Result<T, ShapeError> {
    if let Some(column) = columns.iter().find(|c| !row.contains_key(**c)) {
        return Err(ShapeError::MissingColumn { row: idx, column });
    }
    serde_json::from_value(serde_json::Value::Object(row)).map_err(|e| ShapeError::InvalidValue {
        row: idx,
        reason: e.to_string(),
    })
}
