use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Which side of the platform an account belongs to.
///
/// Stored explicitly at creation time; login never infers it from
/// which profile fields happen to be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum AccountKind {
    #[default]
    #[display("user")]
    User = 0,
    #[display("doctor")]
    Doctor = 1,
}

impl AccountKind {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountKind::User => "user",
            AccountKind::Doctor => "doctor",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(AccountKind::User),
            1 => Some(AccountKind::Doctor),
            _ => {
                tracing::error!(account_kind = id, "Unknown account kind id");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_kind_ids() {
        assert_eq!(AccountKind::from_id(0), Some(AccountKind::User));
        assert_eq!(AccountKind::from_id(1), Some(AccountKind::Doctor));
        assert_eq!(AccountKind::from_id(7), None);
        assert_eq!(AccountKind::Doctor.id(), 1);
    }

    #[test]
    fn test_account_kind_display_matches_code() {
        assert_eq!(AccountKind::User.to_string(), AccountKind::User.code());
        assert_eq!(AccountKind::Doctor.to_string(), "doctor");
        assert_eq!(serde_json::to_string(&AccountKind::Doctor).unwrap(), r#""doctor""#);
    }
}
