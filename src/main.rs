//! amp-form - submit a form through the XHR submission controller
//!
//! Builds an in-memory form targeting the given `action-xhr` URL, fires a
//! submit event and reports how the submission settled.

use amp_form::dom::{Element, HostElement};
use amp_form::form::ACTION_XHR_ATTR;
use amp_form::{Settings, SubmissionController, SubmitState, XhrClient};
use anyhow::{anyhow, Result};
use std::io;
use std::rc::Rc;
use tokio::task::LocalSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amp_form=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let target = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: amp-form <action-xhr-url>"))?;

    let tasks = Rc::new(LocalSet::new());
    let result = tasks.run_until(run(&target, &tasks)).await;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(target: &str, tasks: &Rc<LocalSet>) -> Result<()> {
    let settings = Settings::load()?;
    let form = build_form(target);
    let xhr = XhrClient::new(&settings)?;
    let controller =
        SubmissionController::new(form.clone(), xhr, &settings.target_policy(), tasks)?;
    let mut state = controller.subscribe();

    if form.submit() {
        return Err(anyhow!("Native submission was not intercepted"));
    }
    state.wait_for(SubmitState::is_settled).await?;

    let outcome = controller.state();
    println!("{outcome} ({})", form.class_name());
    match (outcome, controller.last_response(), controller.last_error()) {
        (SubmitState::SubmitSuccess, Some(response), _) => {
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            Ok(())
        }
        (_, _, Some(err)) => Err(anyhow!("Submission failed: {}", err)),
        _ => Err(anyhow!("Submission ended in unexpected state {}", outcome)),
    }
}

/// A minimal form: one named input and one submit control
fn build_form(target: &str) -> Element {
    let form = Element::new("form");
    form.set_attribute(ACTION_XHR_ATTR, target);
    form.append_child(Element::with_attributes(
        "input",
        &[("name", "name"), ("value", "John Miller")],
    ));
    form.append_child(Element::with_attributes("input", &[("type", "submit")]));
    form
}
