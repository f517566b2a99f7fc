//! Statutory deduction calculators and the per-period aggregator

mod aggregator;
mod epf;
mod pcb;

pub use aggregator::{
    ComponentToggles, EngineConfig, PeriodInput, StatutoryEngine, StatutoryResult, YtdSnapshot,
};
pub use epf::{compute_epf, EpfRates};
pub use pcb::{compute_pcb, compute_pcb_detailed, PcbBreakdown};
