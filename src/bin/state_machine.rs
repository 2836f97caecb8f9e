//! Prints the state machine definition for the function ARNs in the
//! environment, ready to be handed to Step Functions.

use sauerpod::workflow::{WorkflowFunctions, state_machine_definition};

fn main() -> anyhow::Result<()> {
    let functions = WorkflowFunctions::from_env()?;
    let definition = state_machine_definition(&functions);
    println!("{}", serde_json::to_string_pretty(&definition)?);
    Ok(())
}
