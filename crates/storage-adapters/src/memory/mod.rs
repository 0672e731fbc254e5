//! Process-local repositories over `DashMap`. Contents vanish on restart.

mod accounts;
mod applications;
mod opportunities;

pub use accounts::MemoryAccountRepository;
pub use applications::MemoryApplicationRepository;
pub use opportunities::MemoryOpportunityRepository;
