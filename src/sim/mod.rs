pub mod event;
pub mod registry;
pub mod runner;
pub mod sink;

pub use event::{AnomalyDetector, AphelionDetector, EventDetector, EventKind, PerihelionDetector, SimEvent};
pub use registry::{BodyInfo, BodyRegistry, BodyState};
pub use runner::{run, FrameDriver};
pub use sink::{BodySink, NullSink, RecordingSink};
