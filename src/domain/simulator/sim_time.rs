use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Virtual simulation time in abstract time units.
///
/// Totally ordered (`f64::total_cmp`) so it can key the event queue and be
/// compared for the per-instant memo of the spatial index.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(transparent)]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn new(time: f64) -> Self {
        SimTime(time)
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    pub fn after(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }

    /// Time elapsed since `earlier`.
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for SimTime {
    fn from(time: f64) -> Self {
        SimTime(time)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
