use serde::{Deserialize, Serialize};

/// Banking figures of a citizen used to pre-fill a tax declaration.
///
/// The session core treats this as opaque: it is stored when the consent
/// process succeeds and returned verbatim to the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BankData {
    pub deposit_interest: f64,
    pub debt_security_interest: f64,
    pub securities_deductable: f64,
    pub non_personified_income: f64,
}

impl BankData {
    pub fn new(
        deposit_interest: f64,
        debt_security_interest: f64,
        securities_deductable: f64,
        non_personified_income: f64,
    ) -> Self {
        Self {
            deposit_interest,
            debt_security_interest,
            securities_deductable,
            non_personified_income,
        }
    }
}
