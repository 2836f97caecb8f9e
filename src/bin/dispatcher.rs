use sauerpod::steps::lambda::dispatcher_handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    sauerpod::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(dispatcher_handler)).await
}
