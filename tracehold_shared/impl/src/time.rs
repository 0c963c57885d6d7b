use chrono::{DateTime, Utc};
use tracehold_di::Build;
use tracehold_shared_contracts::time::TimeService;
use tracehold_utils::trace_instrument;

#[derive(Debug, Clone, Copy, Build)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[trace_instrument(skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
