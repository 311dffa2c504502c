use models::QueryResult;
use serde::Serialize;

use crate::state::{EventKind, ReportPeriod, ViewState};
use crate::widget::{Chart, Request, ShapeError, Widget};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderTick {
    pub slot: u32,
    pub label: String,
    pub is_year: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderView {
    pub ticks: Vec<SliderTick>,
    pub selected: u32,
}

impl SliderView {
    pub fn selected_tick(&self) -> Option<&SliderTick> {
        self.ticks.iter().find(|t| t.slot == self.selected)
    }
}

/// Year/quarter picker. Draws from view state only.
#[derive(Debug, Default)]
pub struct TimeSlider;

impl Chart for TimeSlider {
    type Shape = SliderView;
    const NAME: &'static str = "time";

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Time, EventKind::Resize]
    }

    fn request(&self, _state: &ViewState) -> Option<Request> {
        None
    }

    fn shape(&self, state: &ViewState, _rows: QueryResult) -> Result<SliderView, ShapeError> {
        let ticks: Vec<SliderTick> = (0..state.slot_count())
            .map(|slot| {
                let period = ReportPeriod::at_slot(slot);
                SliderTick {
                    slot,
                    label: period.label(state.start_year()),
                    is_year: !period.is_quarterly(),
                }
            })
            .collect();
        if ticks.is_empty() {
            return Err(ShapeError::Empty);
        }

        Ok(SliderView {
            ticks,
            selected: state.report_period().slot(),
        })
    }
}

impl Widget<TimeSlider> {
    /// Moves the slider; slots past the last year clamp to the final tick.
    pub fn select(&self, slot: u32) {
        let last = self.state().slot_count().saturating_sub(1);
        self.state().set_quarter(slot.min(last));
    }
}
