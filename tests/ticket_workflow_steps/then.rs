//! Then steps for ticket workflow BDD scenarios.

use super::world::TicketWorkflowWorld;
use rstest_bdd_macros::then;
use workbridge::workflow::{
    domain::{BranchName, TicketKey, resolve_actions},
    services::{WorkflowErrorKind, WorkflowWarning},
};

#[then(r#"the actions for "{key}" are "{actions}""#)]
fn actions_are(
    world: &TicketWorkflowWorld,
    key: String,
    actions: String,
) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing refresh report"))?;
    let ticket_key = TicketKey::new(key).map_err(|err| eyre::eyre!("invalid key: {err}"))?;
    let state = report
        .state_for(&ticket_key)
        .ok_or_else(|| eyre::eyre!("ticket {ticket_key} missing from report"))?;
    let resolved: Vec<&str> = resolve_actions(state)
        .into_iter()
        .map(|action| action.as_str())
        .collect();
    let expected: Vec<&str> = actions.split(',').map(str::trim).collect();
    if resolved != expected {
        return Err(eyre::eyre!("expected actions {expected:?}, found {resolved:?}"));
    }
    Ok(())
}

#[then(r#"the created branch is "{name}""#)]
fn created_branch_is(world: &TicketWorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let result = world
        .last_branch_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing branch creation result"))?;
    let created = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected branch creation failure: {err}"))?;
    if created.branch().as_str() != name {
        return Err(eyre::eyre!("expected branch {name}, found {}", created.branch()));
    }
    Ok(())
}

#[then(r#"the branch for "{key}" is checked out"#)]
fn branch_checked_out(world: &TicketWorkflowWorld, key: String) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing refresh report"))?;
    let ticket_key = TicketKey::new(key).map_err(|err| eyre::eyre!("invalid key: {err}"))?;
    let state = report
        .state_for(&ticket_key)
        .ok_or_else(|| eyre::eyre!("ticket {ticket_key} missing from report"))?;
    if !state.branch().exists() || !state.branch().is_current() {
        return Err(eyre::eyre!("expected the ticket branch to exist and be current"));
    }
    if state.pull_request().is_some() {
        return Err(eyre::eyre!("expected no pull request yet"));
    }
    Ok(())
}

#[then("branch creation fails with a conflict")]
fn branch_creation_conflicts(world: &TicketWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_branch_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing branch creation result"))?;
    match result {
        Err(err) if err.kind() == WorkflowErrorKind::Conflict => Ok(()),
        Err(err) => Err(eyre::eyre!("expected a conflict, got {err}")),
        Ok(created) => Err(eyre::eyre!(
            "expected a conflict, branch {} was created",
            created.branch()
        )),
    }
}

#[then(r#"the working copy is still on "{name}""#)]
fn still_on(world: &TicketWorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let expected = BranchName::new(name).map_err(|err| eyre::eyre!("invalid branch: {err}"))?;
    let current = world.vcs.current()?;
    if current.as_ref() != Some(&expected) {
        return Err(eyre::eyre!("expected {expected} checked out, found {current:?}"));
    }
    Ok(())
}

#[then("a pull warning is reported")]
fn pull_warning_reported(world: &TicketWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_branch_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing branch creation result"))?;
    let created = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected branch creation failure: {err}"))?;
    let warned = created
        .warnings()
        .iter()
        .any(|warning| matches!(warning, WorkflowWarning::PullFailed { .. }));
    if !warned {
        return Err(eyre::eyre!("expected a pull warning, got {:?}", created.warnings()));
    }
    Ok(())
}

#[then(r#"a pull request is opened from "{source_ref}""#)]
fn pull_request_opened_from(
    world: &TicketWorkflowWorld,
    source_ref: String,
) -> Result<(), eyre::Report> {
    let result = world
        .last_pull_request_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pull request result"))?;
    let created = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected pull request failure: {err}"))?;
    if created.pull_request().source_ref_name() != source_ref {
        return Err(eyre::eyre!(
            "expected source {source_ref}, found {}",
            created.pull_request().source_ref_name()
        ));
    }
    Ok(())
}

#[then("a ticket comment warning is reported")]
fn comment_warning_reported(world: &TicketWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_pull_request_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pull request result"))?;
    let created = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected pull request failure: {err}"))?;
    let warned = created
        .warnings()
        .iter()
        .any(|warning| matches!(warning, WorkflowWarning::TicketCommentFailed { .. }));
    if !warned {
        return Err(eyre::eyre!(
            "expected a comment warning, got {:?}",
            created.warnings()
        ));
    }
    Ok(())
}
