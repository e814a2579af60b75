//! Access policy evaluation for recipient requests.
//!
//! Checks short-circuit in a fixed order: revocation, expiry, email gate.
//! Nothing here is cached; every access re-evaluates against the stored
//! share.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_entity::access_log::AccessAction;
use docshare_entity::share::Share;

/// Why access was withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The share was revoked.
    Revoked,
    /// The share's expiry has passed.
    Expired,
    /// The share is email-gated and no email was supplied.
    EmailVerificationRequired,
    /// The supplied email is not a recipient.
    EmailNotAuthorized,
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    /// Whether content may be shown.
    pub allowed: bool,
    /// Set when `allowed` is false.
    pub reason: Option<DenialReason>,
    /// The caller must supply a recipient email.
    pub requires_email_verification: bool,
    /// An email was supplied and did not match.
    pub email_rejected: bool,
}

impl PolicyDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            requires_email_verification: false,
            email_rejected: false,
        }
    }

    fn deny(reason: DenialReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            requires_email_verification: matches!(
                reason,
                DenialReason::EmailVerificationRequired | DenialReason::EmailNotAuthorized
            ),
            email_rejected: reason == DenialReason::EmailNotAuthorized,
        }
    }
}

/// Decides whether `share` may be shown to a caller who supplied `email`.
pub fn evaluate(share: &Share, email: Option<&str>, now: DateTime<Utc>) -> PolicyDecision {
    if share.is_revoked {
        return PolicyDecision::deny(DenialReason::Revoked);
    }
    if now >= share.expires_at {
        return PolicyDecision::deny(DenialReason::Expired);
    }
    if share.security_options.email_verification {
        let supplied = email.map(str::trim).filter(|e| !e.is_empty());
        return match supplied {
            None => PolicyDecision::deny(DenialReason::EmailVerificationRequired),
            Some(e) if share.find_recipient(e).is_none() => {
                PolicyDecision::deny(DenialReason::EmailNotAuthorized)
            }
            Some(_) => PolicyDecision::allow(),
        };
    }
    PolicyDecision::allow()
}

/// Applies per-action security options. Views are always permitted;
/// downloads are refused when the share prevents them.
pub fn authorize_action(share: &Share, action: AccessAction) -> AppResult<()> {
    match action {
        AccessAction::Download if share.security_options.prevent_downloads => {
            Err(AppError::downloads_disabled())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use docshare_core::error::ErrorKind;
    use docshare_core::types::{DocumentId, UserId, VesselId};
    use docshare_entity::share::{NewShare, Recipient, RecipientType, SecurityOptions};

    fn share(options: SecurityOptions) -> Share {
        NewShare {
            token: "t".to_string(),
            vessel_id: VesselId::new(),
            document_ids: vec![DocumentId::new()],
            recipients: vec![Recipient {
                email: "Surveyor@Class.org".to_string(),
                name: None,
                recipient_type: RecipientType::Surveyor,
            }],
            security_options: options,
            message: None,
            expires_at: Utc::now() + Duration::days(1),
            created_by: UserId::new(),
            created_by_name: "Chief Engineer".to_string(),
            team_id: None,
        }
        .into_share(Utc::now())
    }

    fn gated() -> SecurityOptions {
        SecurityOptions {
            email_verification: true,
            ..SecurityOptions::default()
        }
    }

    #[test]
    fn test_open_share_allowed_without_email() {
        let decision = evaluate(&share(SecurityOptions::default()), None, Utc::now());
        assert!(decision.allowed);
        assert_eq!(decision.reason, None);
    }

    #[test]
    fn test_revoked_checked_before_expired() {
        let mut s = share(gated());
        s.is_revoked = true;
        s.expires_at = Utc::now() - Duration::days(1);
        let decision = evaluate(&s, None, Utc::now());
        assert_eq!(decision.reason, Some(DenialReason::Revoked));
        assert!(!decision.requires_email_verification);
    }

    #[test]
    fn test_expired_at_exact_instant() {
        let s = share(SecurityOptions::default());
        let decision = evaluate(&s, None, s.expires_at);
        assert_eq!(decision.reason, Some(DenialReason::Expired));
        assert!(evaluate(&s, None, s.expires_at - Duration::milliseconds(1)).allowed);
    }

    #[test]
    fn test_email_gate() {
        let s = share(gated());
        let now = Utc::now();

        let missing = evaluate(&s, None, now);
        assert!(!missing.allowed);
        assert!(missing.requires_email_verification);
        assert!(!missing.email_rejected);
        assert_eq!(evaluate(&s, Some("   "), now), missing);

        let wrong = evaluate(&s, Some("other@class.org"), now);
        assert!(!wrong.allowed);
        assert!(wrong.email_rejected);
        assert_eq!(wrong.reason, Some(DenialReason::EmailNotAuthorized));

        assert!(evaluate(&s, Some("surveyor@class.org"), now).allowed);
        assert!(evaluate(&s, Some(" SURVEYOR@CLASS.ORG "), now).allowed);
        assert!(!evaluate(&s, Some("surveyor@class.org.evil"), now).allowed);
    }

    #[test]
    fn test_download_gating() {
        let locked = share(SecurityOptions {
            prevent_downloads: true,
            ..SecurityOptions::default()
        });
        let err = authorize_action(&locked, AccessAction::Download).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DownloadsDisabled);
        assert!(authorize_action(&locked, AccessAction::ViewDocument).is_ok());

        let open = share(SecurityOptions::default());
        assert!(authorize_action(&open, AccessAction::Download).is_ok());
    }
}
