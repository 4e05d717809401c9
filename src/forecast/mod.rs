//! ARIMA(2,1,2) forecasting of the yearly mean rate

mod arima;
mod assembler;
pub mod diff;
pub mod optimizer;

pub use arima::{
    ArimaCoefficients, ArimaConfig, ArimaModel, FittedArima, ForecastPoint, AR_ORDER, DIFF_ORDER,
    MA_ORDER, MIN_OBSERVATIONS,
};
pub use assembler::{assemble, ForecastEntry, ForecastResult};
