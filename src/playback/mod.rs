pub(crate) mod clock;
pub(crate) mod scheduler;
pub(crate) mod stage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{
    FixedRatePacer, LoopParams, LoopScheduler, Presenter, RefreshPacer, SchedulerState,
    StopHandle,
};
pub use stage::{Stage, StageElement};
