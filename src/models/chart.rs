//! Chart state and widget lifecycle

use chrono::NaiveDate;
use tracing::debug;

use super::prediction::ValueRange;

/// RGB color of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// Bitcoin orange
    pub const BTC_ORANGE: Rgb = Rgb(247, 147, 26);
}

/// How a dataset is stroked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: u32,
    pub dashed: bool,
}

impl LineStyle {
    pub fn solid(color: Rgb, width: u32) -> Self {
        Self { color, width, dashed: false }
    }

    pub fn dashed(color: Rgb, width: u32) -> Self {
        Self { color, width, dashed: true }
    }
}

/// One line on a chart, as a sparse date → value mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub points: Vec<(NaiveDate, Option<f64>)>,
    pub style: LineStyle,
}

impl Dataset {
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|(_, v)| *v)
    }
}

/// The full visual state of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub title: String,
    /// x-axis domain, ascending
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<Dataset>,
    /// Fixed y bounds; computed from the data when absent
    pub y_range: Option<ValueRange>,
    pub x_desc: String,
    pub y_desc: String,
}

impl ChartState {
    /// A chart with no labels and a single empty dataset
    pub fn empty(style: LineStyle) -> Self {
        Self {
            title: String::new(),
            labels: Vec::new(),
            datasets: vec![Dataset {
                label: String::new(),
                points: Vec::new(),
                style,
            }],
            y_range: None,
            x_desc: String::new(),
            y_desc: String::new(),
        }
    }
}

/// Proof that a load was issued against one widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    instance: u64,
    seq: u64,
}

/// A chart instance bound to a canvas, owning its state
#[derive(Debug)]
pub struct ChartWidget {
    instance: u64,
    state: ChartState,
    issued: u64,
}

impl ChartWidget {
    fn create(instance: u64, state: ChartState) -> Self {
        Self {
            instance,
            state,
            issued: 0,
        }
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Issue a ticket for a new load; invalidates every earlier ticket
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket {
            instance: self.instance,
            seq: self.issued,
        }
    }

    /// Whether `ticket` is the latest one issued by this very instance
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.instance == self.instance && ticket.seq == self.issued
    }

    /// Replace the state wholesale
    pub fn update(&mut self, state: ChartState) {
        self.state = state;
    }
}

/// A drawing surface holding at most one chart instance
#[derive(Debug, Default)]
pub struct ChartCanvas {
    current: Option<ChartWidget>,
    created: u64,
    disposed: u64,
}

impl ChartCanvas {
    /// Create a new instance, disposing the existing one first
    pub fn mount(&mut self, state: ChartState) -> &mut ChartWidget {
        self.dispose();
        self.created += 1;
        self.current.insert(ChartWidget::create(self.created, state))
    }

    /// Release the current instance, if any
    pub fn dispose(&mut self) -> bool {
        match self.current.take() {
            Some(widget) => {
                self.disposed += 1;
                debug!("Disposed chart instance {} ({} so far)", widget.instance, self.disposed);
                true
            }
            None => false,
        }
    }

    pub fn widget(&self) -> Option<&ChartWidget> {
        self.current.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut ChartWidget> {
        self.current.as_mut()
    }

    #[cfg(test)]
    pub fn created(&self) -> u64 {
        self.created
    }

    #[cfg(test)]
    pub fn disposed(&self) -> u64 {
        self.disposed
    }

    /// Instances currently bound; never more than one
    #[cfg(test)]
    pub fn live(&self) -> u64 {
        self.created - self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_invalidates_older() {
        let mut canvas = ChartCanvas::default();
        let widget = canvas.mount(ChartState::empty(LineStyle::solid(Rgb::BLACK, 1)));
        let first = widget.begin_load();
        let second = widget.begin_load();
        assert!(!widget.is_current(first));
        assert!(widget.is_current(second));
    }

    #[test]
    fn test_mount_disposes_previous_instance() {
        let mut canvas = ChartCanvas::default();
        let style = LineStyle::solid(Rgb::BTC_ORANGE, 1);
        assert_eq!(canvas.mount(ChartState::empty(style)).instance(), 1);
        assert_eq!(canvas.mount(ChartState::empty(style)).instance(), 2);
        assert_eq!(canvas.disposed(), 1);
        assert_eq!(canvas.live(), 1);
        assert!(canvas.dispose());
        assert!(!canvas.dispose());
        assert_eq!(canvas.live(), 0);
    }

    #[test]
    fn test_ticket_from_disposed_instance_is_stale() {
        let mut canvas = ChartCanvas::default();
        let style = LineStyle::solid(Rgb::BTC_ORANGE, 1);
        let old = canvas.mount(ChartState::empty(style)).begin_load();

        let widget = canvas.mount(ChartState::empty(style));
        assert!(!widget.is_current(old));
        let fresh = widget.begin_load();
        assert!(widget.is_current(fresh));
    }
}
