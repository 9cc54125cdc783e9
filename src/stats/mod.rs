//! Stats module - exploratory statistics kernels and outcome screening

mod calculator;
mod screen;

pub use calculator::{LinearFit, StatsCalculator, SIGNIFICANCE_THRESHOLD};
pub use screen::{OutcomeScreen, ScreenError, ScreenOptions, ScreenReport, ScreenResult};
