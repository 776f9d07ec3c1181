use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Guest,
    Client,
    Supplier,
    Admin,
}

/// Platform-side approval state for a client or supplier account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Pending,
    Approved,
    Suspended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KycStatus {
    NotSubmitted,
    InReview,
    Verified,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub company_name: String,
    pub verified: bool,
    pub status: AccountStatus,
    pub kyc_status: KycStatus,
}

impl User {
    /// Whether this account may participate in the RFQ workflow at all.
    pub fn can_transact(&self) -> bool {
        self.verified && self.status == AccountStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountStatus, KycStatus, Role, User, UserId};

    fn user(status: AccountStatus, verified: bool) -> User {
        User {
            id: UserId("U-1".to_string()),
            role: Role::Supplier,
            company_name: "Acme Metals".to_string(),
            verified,
            status,
            kyc_status: KycStatus::Verified,
        }
    }

    #[test]
    fn approved_verified_accounts_can_transact() {
        assert!(user(AccountStatus::Approved, true).can_transact());
    }

    #[test]
    fn pending_or_unverified_accounts_cannot_transact() {
        assert!(!user(AccountStatus::Pending, true).can_transact());
        assert!(!user(AccountStatus::Approved, false).can_transact());
        assert!(!user(AccountStatus::Suspended, true).can_transact());
    }
}
