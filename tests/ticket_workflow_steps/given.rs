//! Given steps for ticket workflow BDD scenarios.

use super::world::{TicketWorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use workbridge::workflow::{
    adapters::memory::VersionControlOperation,
    domain::{BranchName, Ticket},
    ports::VersionControl,
};

#[given(r#"the working copy is on "{current}" with target branch "{target}""#)]
fn working_copy_on(
    world: &mut TicketWorkflowWorld,
    current: String,
    target: String,
) -> Result<(), eyre::Report> {
    let current_branch = BranchName::new(current).wrap_err("current branch name")?;
    let target_branch = BranchName::new(target.clone()).wrap_err("target branch name")?;
    world.vcs.add_local_branch(target_branch)?;
    world.vcs.add_local_branch(current_branch.clone())?;
    run_async(world.vcs.checkout(&current_branch)).wrap_err("check out current branch")?;
    world.settings.target_branch = target;
    Ok(())
}

#[given(r#"a ticket "{key}" titled "{summary}""#)]
fn ticket_titled(
    world: &mut TicketWorkflowWorld,
    key: String,
    summary: String,
) -> Result<(), eyre::Report> {
    let ticket = Ticket::from_parts(&key, &summary, "In Progress").wrap_err("scenario ticket")?;
    world.tickets.push(ticket);
    world.tracker.set_tickets(world.tickets.clone())?;
    Ok(())
}

#[given(r#"the remote already has branch "{name}""#)]
fn remote_has_branch(world: &mut TicketWorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let branch = BranchName::new(name).wrap_err("remote branch name")?;
    world.vcs.add_remote_branch(branch)?;
    Ok(())
}

#[given("pulling the target branch fails")]
fn pulling_fails(world: &mut TicketWorkflowWorld) -> Result<(), eyre::Report> {
    world.vcs.fail(VersionControlOperation::Pull)?;
    Ok(())
}

#[given(r#"a branch has been created for "{key}""#)]
fn branch_created(world: &mut TicketWorkflowWorld, key: String) -> Result<(), eyre::Report> {
    let ticket = world.ticket(&key)?;
    let engine = world.engine()?;
    run_async(engine.create_branch(ticket.key())).wrap_err("create branch in background")?;
    Ok(())
}

#[given("commenting on tickets fails")]
fn commenting_fails(world: &mut TicketWorkflowWorld) -> Result<(), eyre::Report> {
    world.tracker.fail_comments(Some("tracker unreachable"))?;
    Ok(())
}
