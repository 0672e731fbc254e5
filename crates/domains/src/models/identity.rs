use std::collections::BTreeSet;

use crate::errors::{DomainError, DomainResult};
use crate::models::account::Account;

/// Something an authenticated caller is allowed to do.
///
/// Every valid account holds `Authenticated` today. A role field on
/// [`Account`] can later grant more capabilities through
/// [`Identity::for_account`] without changing how routes check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Authenticated,
}

/// The resolved caller attached to a request after token verification.
#[derive(Debug, Clone)]
pub struct Identity {
    account: Account,
    capabilities: BTreeSet<Capability>,
}

impl Identity {
    pub fn for_account(account: Account) -> Self {
        let capabilities = BTreeSet::from([Capability::Authenticated]);
        Self { account, capabilities }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> DomainResult<()> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(DomainError::unauthorized(
                "You do not have permission to perform this action",
            ))
        }
    }
}
