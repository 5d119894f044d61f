// Draft engine: eligibility cascade, roster bucketing, pool allocation,
// and the per-pick turn state machine.

pub mod eligibility;
pub mod pick;
pub mod pool;
pub mod roster;
pub mod turn;
