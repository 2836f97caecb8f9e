use sauerpod::steps::lambda::commander_handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    sauerpod::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(commander_handler)).await
}
