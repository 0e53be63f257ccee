use comercio_core::{AccountId, EmployeeId, RoleId};

/// Authenticated account context for a request.
///
/// Populated by the bearer middleware from a verified access token; present
/// on every protected route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccountContext {
    account_id: AccountId,
    role_id: RoleId,
    employee_id: EmployeeId,
}

impl AccountContext {
    pub fn new(account_id: AccountId, role_id: RoleId, employee_id: EmployeeId) -> Self {
        Self {
            account_id,
            role_id,
            employee_id,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }
}
