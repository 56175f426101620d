//! Pull request creation for tickets.

use crate::config::target_branch_setting;
use crate::workflow::{
    domain::{BranchName, PullRequestRef, Ticket},
    ports::{
        CodeReview, DiffSummarizer, IssueTracker, NewPullRequest, SummarizerError,
        VersionControl,
    },
    services::error::{WorkflowError, WorkflowResult, WorkflowWarning},
};
use minijinja::Environment;
use serde_json::{Map, Value};
use std::sync::Arc;

const DESCRIPTION_TEMPLATE: &str = "\
## {{ key }}: {{ summary }}

- **Ticket:** [{{ key }}]({{ ticket_url }})
- **Status:** {{ status }}
{% if diff_summary %}
## Summary of changes

{{ diff_summary }}
{% endif %}";

/// Largest diff, in bytes, handed to the summarizer before truncation.
pub const MAX_SUMMARY_DIFF_BYTES: usize = 64 * 1024;

const DIFF_TRUNCATED_MARKER: &str = "\n[diff truncated]\n";

/// Successful pull request creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCreated {
    pull_request: PullRequestRef,
    warnings: Vec<WorkflowWarning>,
}

impl PullRequestCreated {
    /// Returns the created pull request.
    #[must_use]
    pub const fn pull_request(&self) -> &PullRequestRef {
        &self.pull_request
    }

    /// Returns best-effort step failures.
    #[must_use]
    pub fn warnings(&self) -> &[WorkflowWarning] {
        &self.warnings
    }
}

/// Pull request workflow orchestration service.
#[derive(Clone)]
pub struct PullRequestWorkflowService<T, V, R>
where
    T: IssueTracker,
    V: VersionControl,
    R: CodeReview,
{
    tracker: Arc<T>,
    version_control: Arc<V>,
    code_review: Arc<R>,
    summarizer: Option<Arc<dyn DiffSummarizer>>,
    max_diff_bytes: usize,
}

impl<T, V, R> PullRequestWorkflowService<T, V, R>
where
    T: IssueTracker,
    V: VersionControl,
    R: CodeReview,
{
    /// Creates a service without a diff summarizer.
    #[must_use]
    pub const fn new(tracker: Arc<T>, version_control: Arc<V>, code_review: Arc<R>) -> Self {
        Self {
            tracker,
            version_control,
            code_review,
            summarizer: None,
            max_diff_bytes: MAX_SUMMARY_DIFF_BYTES,
        }
    }

    /// Enables diff-summary enrichment of pull request descriptions.
    #[must_use]
    pub fn with_summarizer(mut self, summarizer: Arc<dyn DiffSummarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Caps the diff handed to the summarizer at `max_bytes`.
    ///
    /// Longer diffs are cut at a character boundary and end with a
    /// truncation marker.
    #[must_use]
    pub const fn with_max_diff_bytes(mut self, max_bytes: usize) -> Self {
        self.max_diff_bytes = max_bytes;
        self
    }

    /// Opens a pull request for `ticket` from `source_branch` into
    /// `target_branch`, then links it from the ticket.
    ///
    /// The diff summary and the ticket comment are best-effort: their
    /// failures are returned as warnings alongside the created pull request.
    /// The comment is only posted once the pull request exists.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Configuration`] for an unusable target
    /// branch, [`WorkflowError::Domain`] for an invalid source branch,
    /// [`WorkflowError::DescriptionRender`] when the description cannot be
    /// rendered, and [`WorkflowError::RemoteService`] when the code-review
    /// service rejects the creation.
    pub async fn create_pull_request(
        &self,
        ticket: &Ticket,
        source_branch: &str,
        target_branch: &str,
    ) -> WorkflowResult<PullRequestCreated> {
        let target = target_branch_setting(target_branch)?;
        let source = BranchName::new(source_branch)?;
        let mut warnings = Vec::new();

        let title = ticket.pull_request_title();
        let diff_summary = self.summarize_diff(&source, &target, &mut warnings).await;
        let ticket_url = self.tracker.ticket_url(ticket.key());
        let description = render_description(ticket, &ticket_url, diff_summary.as_deref())?;

        let request = NewPullRequest {
            source_branch: source,
            target_branch: target,
            title,
            description,
        };
        let pull_request = self
            .code_review
            .create(&request)
            .await
            .map_err(|err| WorkflowError::remote("create pull request", err))?;
        tracing::info!(
            ticket = %ticket.key(),
            pull_request = %pull_request.id(),
            "pull request created"
        );

        let comment = format!("Pull request created: {}", pull_request.url());
        if let Err(err) = self.tracker.add_comment(ticket.key(), &comment).await {
            tracing::warn!(
                ticket = %ticket.key(),
                error = %err,
                "could not link pull request from ticket"
            );
            warnings.push(WorkflowWarning::TicketCommentFailed {
                ticket_key: ticket.key().clone(),
                reason: err.to_string(),
            });
        }

        Ok(PullRequestCreated {
            pull_request,
            warnings,
        })
    }

    async fn summarize_diff(
        &self,
        source: &BranchName,
        target: &BranchName,
        warnings: &mut Vec<WorkflowWarning>,
    ) -> Option<String> {
        let summarizer = self.summarizer.as_ref()?;

        let diff = match self.version_control.diff(target, source).await {
            Ok(diff) => diff,
            Err(err) => {
                tracing::warn!(error = %err, "could not compute diff for summary");
                warnings.push(WorkflowWarning::DiffSummaryUnavailable {
                    reason: err.to_string(),
                });
                return None;
            }
        };
        if diff.trim().is_empty() {
            return None;
        }
        let diff = truncate_diff(diff, self.max_diff_bytes);

        match summarizer.summarize(&diff).await {
            Ok(summary) => summary.filter(|text| !text.trim().is_empty()),
            Err(SummarizerError::NotConfigured) => None,
            Err(err) => {
                tracing::warn!(error = %err, "diff summary failed");
                warnings.push(WorkflowWarning::DiffSummaryUnavailable {
                    reason: err.to_string(),
                });
                None
            }
        }
    }
}

fn truncate_diff(mut diff: String, max_bytes: usize) -> String {
    if diff.len() <= max_bytes {
        return diff;
    }
    let cut = (0..=max_bytes)
        .rev()
        .find(|&index| diff.is_char_boundary(index))
        .unwrap_or(0);
    tracing::debug!(
        original_bytes = diff.len(),
        kept_bytes = cut,
        "truncating diff before summary"
    );
    diff.truncate(cut);
    diff.push_str(DIFF_TRUNCATED_MARKER);
    diff
}

/// Renders the pull request description for a ticket.
///
/// # Errors
///
/// Returns [`WorkflowError::DescriptionRender`] when template rendering
/// fails.
pub fn render_description(
    ticket: &Ticket,
    ticket_url: &str,
    diff_summary: Option<&str>,
) -> WorkflowResult<String> {
    let mut context = Map::new();
    context.insert("key".to_owned(), Value::String(ticket.key().to_string()));
    context.insert("summary".to_owned(), Value::String(ticket.summary().to_owned()));
    context.insert("status".to_owned(), Value::String(ticket.status_name().to_owned()));
    context.insert("ticket_url".to_owned(), Value::String(ticket_url.to_owned()));
    context.insert(
        "diff_summary".to_owned(),
        diff_summary.map_or(Value::Null, |text| Value::String(text.trim().to_owned())),
    );

    Environment::new()
        .render_str(DESCRIPTION_TEMPLATE, context)
        .map_err(|err| WorkflowError::DescriptionRender(err.to_string()))
}
