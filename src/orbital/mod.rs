pub mod anomaly;
pub mod elements;
pub mod propagator;
pub mod tracer;

pub use anomaly::{advance, AnomalyStep, FALLBACK_PERIOD};
pub use elements::OrbitalElements;
pub use propagator::{propagate, position_au, DISPLAY_SCALE};
pub use tracer::{trace_orbit, OrbitPolyline, DEFAULT_TRACE_STEP, MIN_TRACE_STEP};
