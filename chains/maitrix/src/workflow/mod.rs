//! Mint and stake workflow for one account.

pub mod approval;
pub mod executor;
pub mod gate;
pub mod operations;
pub mod orchestrator;

pub use approval::ApprovalManager;
pub use executor::{explorer_link, TransactionExecutor};
pub use gate::{Holding, TokenLedgerGate};
pub use operations::{MintAmount, OperationRunner};
pub use orchestrator::{
    CycleReport, MintBlock, Pacing, StakeStep, StepRecord, WorkflowOrchestrator, WorkflowPlan,
};
