//! Result export port. How a finished run is rendered or stored is a
//! collaborator concern; the engine only produces the value object.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::ScalplabError;
use std::path::Path;

pub trait ReportPort {
    fn write_report(&self, result: &BacktestResult, path: &Path) -> Result<(), ScalplabError>;
}
