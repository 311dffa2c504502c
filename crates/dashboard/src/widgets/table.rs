use models::{QueryResult, Resource};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use super::numeric;
use crate::state::{EventKind, Symbol, ViewState};
use crate::widget::{Chart, Request, ShapeError, Widget};

const SYMBOL_COLUMN: &str = "Symbol";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub symbol: String,
    pub cells: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    pub sort: Option<SortState>,
}

impl TableView {
    /// Sorts by `column`; asking for the current column again flips direction.
    /// Unknown columns leave the table untouched.
    pub fn sort_by(&mut self, column: &str) -> bool {
        let Some(idx) = self.columns.iter().position(|c| c == column) else {
            return false;
        };

        let direction = match &self.sort {
            Some(sort) if sort.column == column && sort.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };

        self.rows.sort_by(|a, b| {
            let ord = compare_cells(&a.cells[idx], &b.cells[idx]);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        self.sort = Some(SortState {
            column: column.to_string(),
            direction,
        });
        true
    }
}

/// Numbers numerically, text lexically; blanks sort last ascending.
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) if b.is_null() => Ordering::Less,
        (None, Some(_)) if a.is_null() => Ordering::Greater,
        _ => match (a, b) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

/// Company listing; clicking a row selects that ticker for the whole page.
#[derive(Debug, Default)]
pub struct SymbolTable;

impl Chart for SymbolTable {
    type Shape = TableView;
    const NAME: &'static str = "symbol";

    fn subscriptions(&self) -> &'static [EventKind] {
        &[]
    }

    fn request(&self, _state: &ViewState) -> Option<Request> {
        Some(Request::get(Resource::Symbols))
    }

    fn shape(&self, _state: &ViewState, rows: QueryResult) -> Result<TableView, ShapeError> {
        let first = rows.first().ok_or(ShapeError::Empty)?;
        let columns: Vec<String> = first.keys().cloned().collect();

        let rows = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let symbol = row
                    .get(SYMBOL_COLUMN)
                    .and_then(Value::as_str)
                    .ok_or(ShapeError::MissingColumn {
                        row: idx,
                        column: SYMBOL_COLUMN,
                    })?;
                let cells = columns
                    .iter()
                    .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
                    .collect();
                Ok(TableRow {
                    symbol: symbol.to_string(),
                    cells,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;

        Ok(TableView {
            columns,
            rows,
            sort: None,
        })
    }
}

impl Widget<SymbolTable> {
    pub fn sort_by(&self, column: &str) -> bool {
        let mut sorted = false;
        self.update_view(|view| sorted = view.sort_by(column));
        sorted
    }

    /// Selects the ticker on the `index`th displayed row.
    pub fn select_row(&self, index: usize) -> Option<Symbol> {
        let symbol = match self.region().status() {
            crate::widget::WidgetStatus::Rendered(view) => view
                .rows
                .get(index)
                .and_then(|row| Symbol::new(&row.symbol)),
            _ => None,
        }?;
        // Region borrow ends above; listeners may read this widget
        self.state().set_symbol(symbol.clone());
        Some(symbol)
    }
}
