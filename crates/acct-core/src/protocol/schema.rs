//! Schema validation between wire records and domain types.
//!
//! Every conversion *into* the domain is a `TryFrom` that checks the account
//! id and every tag.  Conversions *out of* the domain are plain `From`s
//! because a valid domain value always has a valid wire form.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::domain::{Account, AccountConfig, AccountId, BasisOption, QaItem, SchemaError};

use super::messages::{AccountRecord, ConfigRecord, SaveConfigRequest};

/// Parses a list of wire tags into a set, rejecting the first unknown tag.
///
/// Duplicates collapse; order is not preserved.
pub fn parse_tags<T>(raw: &[String]) -> Result<BTreeSet<T>, SchemaError>
where
    T: FromStr<Err = SchemaError> + Ord,
{
    raw.iter().map(|tag| tag.parse::<T>()).collect()
}

fn tags_to_wire<T: Copy + ToString>(set: &BTreeSet<T>) -> Vec<String> {
    set.iter().map(ToString::to_string).collect()
}

fn build_config(
    account: &str,
    url: String,
    context: String,
    basis: &[String],
    qa: &[String],
) -> Result<AccountConfig, SchemaError> {
    let mut config = AccountConfig::new(AccountId::parse(account)?);
    config.url = url;
    config.context = context;
    config.basis = parse_tags::<BasisOption>(basis)?;
    config.qa = parse_tags::<QaItem>(qa)?;
    Ok(config)
}

impl TryFrom<ConfigRecord> for AccountConfig {
    type Error = SchemaError;

    fn try_from(record: ConfigRecord) -> Result<Self, Self::Error> {
        build_config(
            &record.account,
            record.url,
            record.context,
            &record.basis,
            &record.qa,
        )
    }
}

impl TryFrom<SaveConfigRequest> for AccountConfig {
    type Error = SchemaError;

    fn try_from(req: SaveConfigRequest) -> Result<Self, Self::Error> {
        build_config(&req.uid, req.url, req.context, &req.basis, &req.qa)
    }
}

impl ConfigRecord {
    /// Validates the record and checks that it belongs to `expected`.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] from validation, or
    /// [`SchemaError::AccountMismatch`] when the record is for another account.
    pub fn into_config_for(self, expected: &AccountId) -> Result<AccountConfig, SchemaError> {
        let config = AccountConfig::try_from(self)?;
        if config.account_id() != expected {
            return Err(SchemaError::AccountMismatch {
                expected: expected.to_string(),
                found: config.account_id().to_string(),
            });
        }
        Ok(config)
    }
}

impl From<&AccountConfig> for ConfigRecord {
    fn from(config: &AccountConfig) -> Self {
        Self {
            account: config.account_id().to_string(),
            url: config.url.clone(),
            context: config.context.clone(),
            basis: tags_to_wire(&config.basis),
            qa: tags_to_wire(&config.qa),
        }
    }
}

impl From<&AccountConfig> for SaveConfigRequest {
    fn from(config: &AccountConfig) -> Self {
        Self {
            uid: config.account_id().to_string(),
            url: config.url.clone(),
            context: config.context.clone(),
            basis: tags_to_wire(&config.basis),
            qa: tags_to_wire(&config.qa),
        }
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = SchemaError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            uid: AccountId::parse(&record.uid)?,
            email: record.email,
            name: record.name,
        })
    }
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        Self {
            uid: account.uid.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(account: &str, basis: &[&str], qa: &[&str]) -> ConfigRecord {
        ConfigRecord {
            account: account.to_string(),
            url: "old.example.com".to_string(),
            context: "hi".to_string(),
            basis: basis.iter().map(|s| s.to_string()).collect(),
            qa: qa.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_record_converts() {
        // Arrange
        let rec = record("acct-1", &["support-context"], &["verified-caller"]);

        // Act
        let cfg = AccountConfig::try_from(rec).unwrap();

        // Assert
        assert_eq!(cfg.account_id().as_str(), "acct-1");
        assert_eq!(cfg.url, "old.example.com");
        assert!(cfg.basis.contains(&BasisOption::SupportContext));
        assert!(cfg.qa.contains(&QaItem::VerifiedCaller));
    }

    #[test]
    fn test_unknown_qa_tag_is_rejected() {
        let rec = record("acct-1", &[], &["verified-caller", "made-up"]);
        assert_eq!(
            AccountConfig::try_from(rec),
            Err(SchemaError::UnknownQaItem("made-up".to_string()))
        );
    }

    #[test]
    fn test_unknown_basis_tag_is_rejected() {
        let rec = record("acct-1", &["free-lunch"], &[]);
        assert_eq!(
            AccountConfig::try_from(rec),
            Err(SchemaError::UnknownBasis("free-lunch".to_string()))
        );
    }

    #[test]
    fn test_empty_account_is_rejected() {
        let rec = record("", &[], &[]);
        assert_eq!(AccountConfig::try_from(rec), Err(SchemaError::EmptyAccountId));
    }

    #[test]
    fn test_duplicate_tags_collapse() {
        let rec = record("acct-1", &[], &["additional-help", "additional-help"]);
        let cfg = AccountConfig::try_from(rec).unwrap();
        assert_eq!(cfg.qa.len(), 1);
    }

    #[test]
    fn test_into_config_for_detects_mismatch() {
        // Arrange
        let rec = record("someone-else", &[], &[]);
        let expected = AccountId::parse("acct-1").unwrap();

        // Act
        let result = rec.into_config_for(&expected);

        // Assert
        assert_eq!(
            result,
            Err(SchemaError::AccountMismatch {
                expected: "acct-1".to_string(),
                found: "someone-else".to_string(),
            })
        );
    }

    #[test]
    fn test_config_to_save_request_carries_uid() {
        // Arrange
        let mut cfg = AccountConfig::new(AccountId::parse("acct-9").unwrap());
        cfg.url = "https://example.com".to_string();
        cfg.qa.insert(QaItem::VerifiedCaller);

        // Act
        let req = SaveConfigRequest::from(&cfg);

        // Assert
        assert_eq!(req.uid, "acct-9");
        assert_eq!(req.url, "https://example.com");
        assert_eq!(req.context, "");
        assert!(req.basis.is_empty());
        assert_eq!(req.qa, vec!["verified-caller".to_string()]);
    }

    #[test]
    fn test_account_record_with_empty_uid_is_rejected() {
        let rec = AccountRecord {
            uid: " ".to_string(),
            email: "x@example.com".to_string(),
            name: None,
        };
        assert_eq!(Account::try_from(rec), Err(SchemaError::EmptyAccountId));
    }
}
