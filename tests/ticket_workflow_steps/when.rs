//! When steps for ticket workflow BDD scenarios.

use super::world::{TicketWorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the workflow state is refreshed")]
fn state_refreshed(world: &mut TicketWorkflowWorld) -> Result<(), eyre::Report> {
    let engine = world.engine()?;
    let report = run_async(engine.refresh()).wrap_err("refresh workflow state")?;
    world.last_report = Some(report);
    Ok(())
}

#[when(r#"a branch is created for "{key}""#)]
fn branch_is_created(world: &mut TicketWorkflowWorld, key: String) -> Result<(), eyre::Report> {
    let ticket = world.ticket(&key)?;
    let engine = world.engine()?;
    let result = run_async(engine.create_branch(ticket.key()));
    world.last_branch_result = Some(result);
    Ok(())
}

#[when(r#"a pull request is created for "{key}""#)]
fn pull_request_is_created(
    world: &mut TicketWorkflowWorld,
    key: String,
) -> Result<(), eyre::Report> {
    let ticket = world.ticket(&key)?;
    let engine = world.engine()?;
    let result = run_async(engine.create_pull_request(&ticket));
    world.last_pull_request_result = Some(result);
    Ok(())
}
