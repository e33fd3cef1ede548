//! Live end-to-end tests for the s3gate proxy stack.
//!
//! These tests deploy real resources into the AWS account the ambient
//! credential chain resolves to, and are marked `#[ignore]` so they don't
//! run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p s3gate-integration -- --ignored --test-threads=1
//! ```

use std::sync::Once;

use s3gate_core::{AwsRegion, StackConfig};
use s3gate_deploy::Deployer;
use s3gate_model::ProxyStack;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Region the tests deploy into.
fn test_region() -> AwsRegion {
    std::env::var("DEFAULT_REGION").map_or_else(|_| AwsRegion::default(), AwsRegion::new)
}

/// Build a stack config with uniquified resource names, so concurrent test
/// accounts can't collide on the globally-scoped bucket name.
#[must_use]
pub fn test_stack_config(prefix: &str) -> StackConfig {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    StackConfig::builder()
        .region(test_region())
        .role_name(format!("s3gate-{prefix}-{id}-role"))
        .bucket_name(format!("s3gate-{prefix}-{id}"))
        .log_group_name(format!("s3gate-{prefix}-{id}-access-log"))
        .api_name(format!("s3gate-{prefix}-{id}-api"))
        .build()
}

/// Build a deployer from the ambient credential chain.
pub async fn deployer(config: &StackConfig) -> Deployer {
    init_tracing();
    Deployer::from_env(config.region.clone()).await
}

/// Assemble and validate the stack for a config.
#[must_use]
pub fn stack(config: &StackConfig) -> ProxyStack {
    let stack = ProxyStack::from_config(config);
    stack.validate().expect("test stack must be valid");
    stack
}

/// Destroy a stack, ignoring errors. Used as a best-effort cleanup guard so
/// a failing assertion doesn't strand resources.
pub async fn cleanup(deployer: &Deployer, stack: &ProxyStack) {
    if let Err(e) = deployer.destroy(stack).await {
        tracing::warn!(error = %e, "cleanup destroy failed");
    }
}

mod test_proxy;
mod test_teardown;
