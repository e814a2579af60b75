//! Share lifecycle service: creation, recipient resolution, document
//! actions, owner management and share emails.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use validator::ValidateEmail;

use docshare_auth::rbac::RbacEnforcer;
use docshare_core::config::{NotificationConfig, ShareConfig};
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::{DocumentId, ShareId, VesselId};
use docshare_database::store::{BatchRevokeOutcome, DocumentCatalog, ShareStore};
use docshare_entity::access_log::{
    AccessAction, AccessLogEntry, ChainVerification, ClientInfo, NewAccessLogEntry,
};
use docshare_entity::catalog::VesselSummary;
use docshare_entity::share::{
    DocumentAccess, DurationPreset, NewShare, Recipient, SecurityOptions, Share, ShareCreated,
    ShareInfo, ShareSummary, ShareView, normalize_email,
};

use super::logger::AccessLogger;
use super::policy::{self, DenialReason};
use super::token;
use crate::context::RequestContext;
use crate::notification::{DeliveryReport, NotificationDispatcher, ShareEmail, deliver_all};

/// Fresh tokens tried when the store reports a token collision.
const TOKEN_ATTEMPTS: usize = 3;

/// Request to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// Vessel the documents belong to.
    pub vessel_id: VesselId,
    /// Documents to expose, in display order.
    pub document_ids: Vec<DocumentId>,
    /// Authorized recipients.
    pub recipients: Vec<Recipient>,
    /// Policy flags.
    #[serde(default)]
    pub security_options: SecurityOptions,
    /// Optional note for recipients.
    #[serde(default)]
    pub message: Option<String>,
    /// Absolute expiry. Mutually exclusive with `duration_preset`.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Symbolic lifetime. Mutually exclusive with `expires_at`.
    #[serde(default)]
    pub duration_preset: Option<DurationPreset>,
}

/// What a recipient gets when opening a share link.
#[derive(Debug, Clone)]
pub enum ShareResolution {
    /// Every gate passed.
    View(Box<ShareView>),
    /// The share is email-gated and no email was supplied.
    RequiresVerification,
    /// The supplied email is not an authorized recipient.
    EmailNotAuthorized,
    /// The share's expiry has passed.
    Expired(ShareInfo),
    /// The share was revoked.
    Revoked(ShareInfo),
    /// No share has this token.
    NotFound,
}

/// Outcome of a document action.
#[derive(Debug, Clone)]
pub enum DocumentAccessOutcome {
    /// The action is granted.
    Granted(DocumentAccess),
    /// The share itself cannot be opened; carries the same outcome a link
    /// resolution would.
    Unavailable(ShareResolution),
}

enum Gate {
    Open {
        share: Share,
        recipient: Option<Recipient>,
    },
    Closed(ShareResolution),
}

/// Orchestrates the share store, catalog, access policy, access logger and
/// notification dispatcher.
#[derive(Debug, Clone)]
pub struct ShareLifecycleService {
    shares: Arc<dyn ShareStore>,
    catalog: Arc<dyn DocumentCatalog>,
    logger: AccessLogger,
    dispatcher: Arc<dyn NotificationDispatcher>,
    rbac: RbacEnforcer,
    config: ShareConfig,
    from_address: String,
    email_timeout: Duration,
}

impl ShareLifecycleService {
    /// Creates a new share lifecycle service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        catalog: Arc<dyn DocumentCatalog>,
        logger: AccessLogger,
        dispatcher: Arc<dyn NotificationDispatcher>,
        config: ShareConfig,
        notification: &NotificationConfig,
    ) -> Self {
        Self {
            shares,
            catalog,
            logger,
            dispatcher,
            rbac: RbacEnforcer::new(),
            config,
            from_address: notification.from_address.clone(),
            email_timeout: Duration::from_secs(notification.timeout_seconds.max(1)),
        }
    }

    /// The access logger, for flushing on shutdown.
    pub fn logger(&self) -> &AccessLogger {
        &self.logger
    }

    /// Creates a share and returns its public link.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        req: CreateShareRequest,
    ) -> AppResult<ShareCreated> {
        let now = Utc::now();
        let expires_at = self.resolve_expiry(req.expires_at, req.duration_preset, now)?;

        let document_ids = dedup_documents(req.document_ids);
        if document_ids.is_empty() {
            return Err(AppError::invalid_share_spec(
                "Select at least one document to share",
            ));
        }
        if document_ids.len() > self.config.max_documents {
            return Err(AppError::invalid_share_spec(format!(
                "A share may include at most {} documents",
                self.config.max_documents
            )));
        }

        let recipients = normalize_recipients(req.recipients)?;
        if recipients.is_empty() {
            return Err(AppError::invalid_share_spec("Add at least one recipient"));
        }
        if recipients.len() > self.config.max_recipients {
            return Err(AppError::invalid_share_spec(format!(
                "A share may have at most {} recipients",
                self.config.max_recipients
            )));
        }

        let message = req
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        if let Some(m) = &message {
            if m.chars().count() > self.config.max_message_length {
                return Err(AppError::validation(format!(
                    "Message may be at most {} characters",
                    self.config.max_message_length
                )));
            }
        }

        let found = self
            .catalog
            .find_documents(req.vessel_id, &document_ids)
            .await?;
        if found.len() != document_ids.len() {
            return Err(AppError::invalid_share_spec(
                "One or more documents do not belong to this vessel",
            ));
        }

        let mut attempt = 0;
        let share = loop {
            attempt += 1;
            let new_share = NewShare {
                token: token::generate_token()?,
                vessel_id: req.vessel_id,
                document_ids: document_ids.clone(),
                recipients: recipients.clone(),
                security_options: req.security_options,
                message: message.clone(),
                expires_at,
                created_by: ctx.user_id,
                created_by_name: ctx.username.clone(),
                team_id: ctx.team_id,
            };
            match self.shares.create(new_share).await {
                Ok(share) => break share,
                Err(e) if e.kind == ErrorKind::Conflict && attempt < TOKEN_ATTEMPTS => {
                    warn!(attempt, "Share token collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            vessel_id = %share.vessel_id,
            documents = share.document_ids.len(),
            recipients = share.recipients.len(),
            expires_at = %share.expires_at,
            "Share created"
        );

        Ok(ShareCreated {
            id: share.id,
            share_url: self.share_url(&share.token),
            token: share.token,
            expires_at: share.expires_at,
        })
    }

    /// Resolves a public link for a recipient.
    ///
    /// Store failures are logged and reported as [`ShareResolution::NotFound`].
    pub async fn resolve_share(
        &self,
        token: &str,
        recipient_email: Option<&str>,
        client: ClientInfo,
    ) -> ShareResolution {
        let (share, recipient) = match self.gate(token, recipient_email).await {
            Gate::Open { share, recipient } => (share, recipient),
            Gate::Closed(resolution) => return resolution,
        };

        match self.build_view(&share, recipient).await {
            Ok(view) => {
                self.logger.record(NewAccessLogEntry::now(
                    share.id,
                    None,
                    AccessAction::ViewShare,
                    recipient_email.map(str::to_string),
                    client,
                ));
                ShareResolution::View(Box::new(view))
            }
            Err(e) => {
                error!(share_id = %share.id, error = %e, "Failed to assemble share view");
                ShareResolution::NotFound
            }
        }
    }

    /// Grants a view or download of one document of a share.
    ///
    /// Re-runs the full access policy, then the per-action policy. Records
    /// exactly one access entry when granted.
    pub async fn access_document(
        &self,
        token: &str,
        document_id: DocumentId,
        action: AccessAction,
        recipient_email: Option<&str>,
        client: ClientInfo,
    ) -> AppResult<DocumentAccessOutcome> {
        if action == AccessAction::ViewShare {
            return Err(AppError::validation(
                "Document action must be view_document or download",
            ));
        }

        let (share, recipient) = match self.gate(token, recipient_email).await {
            Gate::Open { share, recipient } => (share, recipient),
            Gate::Closed(resolution) => return Ok(DocumentAccessOutcome::Unavailable(resolution)),
        };

        if !share.contains_document(document_id) {
            return Err(AppError::not_found("Document not found in this share"));
        }
        policy::authorize_action(&share, action)?;

        let document = self
            .catalog
            .find_documents(share.vessel_id, &[document_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        self.logger.record(NewAccessLogEntry::now(
            share.id,
            Some(document_id),
            action,
            recipient_email.map(str::to_string),
            client,
        ));

        let watermark = share.security_options.watermark;
        let watermark_text = watermark.then(|| {
            let who = recipient
                .as_ref()
                .map(|r| r.email.as_str())
                .or(recipient_email.map(str::trim))
                .filter(|e| !e.is_empty())
                .unwrap_or("external recipient");
            format!(
                "Shared with {who} on {} - not for redistribution",
                Utc::now().format("%Y-%m-%d")
            )
        });

        Ok(DocumentAccessOutcome::Granted(DocumentAccess {
            share_id: share.id,
            document_id,
            action,
            file_url: document.file_url,
            watermark,
            watermark_text,
        }))
    }

    /// Records a client-reported access event. Never fails; events for
    /// unknown, revoked or expired shares, foreign documents, and actions
    /// the share forbids are dropped.
    pub async fn log_access(
        &self,
        share_id: ShareId,
        document_id: Option<DocumentId>,
        action: AccessAction,
        recipient_email: Option<String>,
        client: ClientInfo,
    ) {
        match self.shares.get_by_id(share_id).await {
            Ok(share) => {
                if !share.is_accessible() {
                    debug!(share_id = %share_id, action = %action, "Access event for inaccessible share ignored");
                    return;
                }
                if policy::authorize_action(&share, action).is_err() {
                    debug!(share_id = %share_id, action = %action, "Access event for forbidden action ignored");
                    return;
                }
                if let Some(doc) = document_id {
                    if !share.contains_document(doc) {
                        debug!(share_id = %share_id, document_id = %doc, "Access event for foreign document ignored");
                        return;
                    }
                }
                self.logger.record(NewAccessLogEntry::now(
                    share_id,
                    document_id,
                    action,
                    recipient_email,
                    client,
                ));
            }
            Err(e) if e.is_not_found() => {
                debug!(share_id = %share_id, "Access event for unknown share ignored");
            }
            Err(e) => {
                warn!(share_id = %share_id, error = %e, "Access event dropped, share lookup failed");
            }
        }
    }

    /// Revokes a share. Idempotent.
    pub async fn revoke_share(&self, ctx: &RequestContext, id: ShareId) -> AppResult<ShareSummary> {
        self.load_managed(ctx, id).await?;
        let share = self.shares.revoke(id).await?;

        info!(user_id = %ctx.user_id, share_id = %id, "Share revoked");
        Ok(self.summary(share))
    }

    /// Moves a share's expiry forward. Reactivates an expired share.
    pub async fn extend_share(
        &self,
        ctx: &RequestContext,
        id: ShareId,
        new_expires_at: DateTime<Utc>,
    ) -> AppResult<ShareSummary> {
        let current = self.load_managed(ctx, id).await?;
        if current.is_revoked {
            return Err(AppError::share_revoked("A revoked share cannot be extended"));
        }
        if new_expires_at <= Utc::now() {
            return Err(AppError::expiry_must_increase(
                "New expiry must lie in the future",
            ));
        }
        let share = self.shares.extend(id, new_expires_at).await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %id,
            previous = %current.expires_at,
            expires_at = %share.expires_at,
            "Share extended"
        );
        Ok(self.summary(share))
    }

    /// Revokes several shares. Ids the caller may not manage, unknown ids
    /// and store failures are reported as failed.
    pub async fn batch_revoke_shares(
        &self,
        ctx: &RequestContext,
        ids: &[ShareId],
    ) -> AppResult<BatchRevokeOutcome> {
        let actor = ctx.actor();
        let mut seen = HashSet::new();
        let mut permitted = Vec::new();
        let mut rejected = Vec::new();

        for id in ids.iter().copied().filter(|id| seen.insert(*id)) {
            match self.shares.get_by_id(id).await {
                Ok(share) if self.rbac.can_manage_share(&actor, &share) => permitted.push(id),
                Ok(_) => {
                    warn!(user_id = %ctx.user_id, share_id = %id, "Batch revoke denied for share");
                    rejected.push(id);
                }
                Err(e) => {
                    debug!(share_id = %id, error = %e, "Batch revoke lookup failed");
                    rejected.push(id);
                }
            }
        }

        let mut outcome = self.shares.batch_revoke(&permitted).await?;
        outcome.failed.extend(rejected);

        info!(
            user_id = %ctx.user_id,
            revoked = outcome.revoked.len(),
            failed = outcome.failed.len(),
            "Batch revoke completed"
        );
        Ok(outcome)
    }

    /// Gets a share for its owner dashboard.
    pub async fn get_share(&self, ctx: &RequestContext, id: ShareId) -> AppResult<ShareSummary> {
        let share = self.load_managed(ctx, id).await?;
        Ok(self.summary(share))
    }

    /// Lists the vessel's shares the caller may manage, newest first.
    pub async fn list_vessel_shares(
        &self,
        ctx: &RequestContext,
        vessel_id: VesselId,
    ) -> AppResult<Vec<ShareSummary>> {
        let actor = ctx.actor();
        let shares = self.shares.list_by_vessel(vessel_id).await?;
        Ok(shares
            .into_iter()
            .filter(|share| self.rbac.can_manage_share(&actor, share))
            .map(|share| self.summary(share))
            .collect())
    }

    /// Emails the share link to every recipient.
    pub async fn send_share_email(
        &self,
        ctx: &RequestContext,
        id: ShareId,
    ) -> AppResult<DeliveryReport> {
        let share = self.load_managed(ctx, id).await?;
        if share.is_revoked {
            return Err(AppError::share_revoked("A revoked share cannot be emailed"));
        }
        if Utc::now() >= share.expires_at {
            return Err(AppError::share_expired("An expired share cannot be emailed"));
        }

        let vessel_name = self.vessel_quietly(&share).await.map(|v| v.name);
        let share_url = self.share_url(&share.token);
        let emails = share
            .recipients
            .iter()
            .map(|recipient| ShareEmail {
                share_id: share.id,
                from: self.from_address.clone(),
                to: recipient.clone(),
                share_url: share_url.clone(),
                sender_name: share.created_by_name.clone(),
                vessel_name: vessel_name.clone(),
                document_count: share.document_ids.len(),
                message: share.message.clone(),
                expires_at: share.expires_at,
            })
            .collect();

        let report = deliver_all(self.dispatcher.as_ref(), emails, self.email_timeout).await;

        info!(
            user_id = %ctx.user_id,
            share_id = %id,
            sent = report.total_sent,
            failed = report.total_failed,
            "Share emails dispatched"
        );
        Ok(report)
    }

    /// A share's access history in append order.
    pub async fn list_access_logs(
        &self,
        ctx: &RequestContext,
        id: ShareId,
    ) -> AppResult<Vec<AccessLogEntry>> {
        self.load_managed(ctx, id).await?;
        self.logger.list_for_share(id).await
    }

    /// Re-walks a share's access log hash chain.
    pub async fn verify_access_logs(
        &self,
        ctx: &RequestContext,
        id: ShareId,
    ) -> AppResult<ChainVerification> {
        self.load_managed(ctx, id).await?;
        self.logger.verify_chain(id).await
    }

    fn resolve_expiry(
        &self,
        expires_at: Option<DateTime<Utc>>,
        preset: Option<DurationPreset>,
        now: DateTime<Utc>,
    ) -> AppResult<DateTime<Utc>> {
        match (expires_at, preset) {
            (Some(at), None) if at <= now => Err(AppError::invalid_share_spec(
                "Expiry must lie in the future",
            )),
            (Some(at), None) => Ok(at),
            (None, Some(preset)) => {
                Ok(preset.expires_at(now, self.config.never_expires_after_days))
            }
            (Some(_), Some(_)) => Err(AppError::invalid_share_spec(
                "Provide either expiresAt or durationPreset, not both",
            )),
            (None, None) => Err(AppError::invalid_share_spec(
                "An expiry is required (expiresAt or durationPreset)",
            )),
        }
    }

    async fn gate(&self, token: &str, email: Option<&str>) -> Gate {
        if token.is_empty() {
            return Gate::Closed(ShareResolution::NotFound);
        }
        let share = match self.shares.get_by_token(token).await {
            Ok(share) => share,
            Err(e) if e.is_not_found() => {
                debug!("Share token not found");
                return Gate::Closed(ShareResolution::NotFound);
            }
            Err(e) => {
                error!(error = %e, "Share lookup failed");
                return Gate::Closed(ShareResolution::NotFound);
            }
        };

        let decision = policy::evaluate(&share, email, Utc::now());
        match decision.reason {
            None => {
                let recipient = email.and_then(|e| share.find_recipient(e)).cloned();
                Gate::Open { share, recipient }
            }
            Some(DenialReason::Revoked) => {
                Gate::Closed(ShareResolution::Revoked(self.share_info(&share).await))
            }
            Some(DenialReason::Expired) => {
                Gate::Closed(ShareResolution::Expired(self.share_info(&share).await))
            }
            Some(DenialReason::EmailVerificationRequired) => {
                Gate::Closed(ShareResolution::RequiresVerification)
            }
            Some(DenialReason::EmailNotAuthorized) => {
                info!(share_id = %share.id, "Email gate rejected supplied address");
                Gate::Closed(ShareResolution::EmailNotAuthorized)
            }
        }
    }

    async fn build_view(&self, share: &Share, recipient: Option<Recipient>) -> AppResult<ShareView> {
        let vessel = self.catalog.find_vessel(share.vessel_id).await?;
        let documents = self
            .catalog
            .find_documents(share.vessel_id, &share.document_ids)
            .await?;

        Ok(ShareView {
            share_id: share.id,
            vessel_id: share.vessel_id,
            vessel_name: vessel.as_ref().map(|v| v.name.clone()),
            port: vessel.as_ref().and_then(|v| v.port.clone()),
            imo_number: vessel.as_ref().and_then(|v| v.imo_number.clone()),
            documents: documents.iter().map(Into::into).collect(),
            message: share.message.clone(),
            sender_name: share.created_by_name.clone(),
            shared_at: share.created_at,
            expires_at: share.expires_at,
            security_options: share.security_options,
            can_download: !share.security_options.prevent_downloads,
            recipient,
        })
    }

    async fn share_info(&self, share: &Share) -> ShareInfo {
        let vessel = self.vessel_quietly(share).await;
        ShareInfo::from_share(share, vessel.as_ref())
    }

    async fn vessel_quietly(&self, share: &Share) -> Option<VesselSummary> {
        match self.catalog.find_vessel(share.vessel_id).await {
            Ok(vessel) => vessel,
            Err(e) => {
                warn!(share_id = %share.id, error = %e, "Vessel lookup failed");
                None
            }
        }
    }

    async fn load_managed(&self, ctx: &RequestContext, id: ShareId) -> AppResult<Share> {
        let share = self.shares.get_by_id(id).await?;
        self.rbac.require_share_manager(&ctx.actor(), &share)?;
        Ok(share)
    }

    fn summary(&self, share: Share) -> ShareSummary {
        ShareSummary {
            share_url: self.share_url(&share.token),
            status: share.status_at(Utc::now()),
            share,
        }
    }

    fn share_url(&self, token: &str) -> String {
        format!(
            "{}/share/{}",
            self.config.public_base_url.trim_end_matches('/'),
            token
        )
    }
}

fn dedup_documents(ids: Vec<DocumentId>) -> Vec<DocumentId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Trims, validates and case-insensitively de-duplicates recipients.
fn normalize_recipients(recipients: Vec<Recipient>) -> AppResult<Vec<Recipient>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(recipients.len());

    for recipient in recipients {
        let email = recipient.email.trim().to_string();
        if !email.validate_email() {
            return Err(AppError::invalid_share_spec(format!(
                "Invalid recipient email address: '{email}'"
            )));
        }
        if !seen.insert(normalize_email(&email)) {
            continue;
        }
        out.push(Recipient {
            email,
            name: recipient
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            recipient_type: recipient.recipient_type,
        });
    }
    Ok(out)
}
