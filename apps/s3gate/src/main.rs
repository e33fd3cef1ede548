//! s3gate - declare, synthesize, and deploy the API Gateway → S3 proxy stack.
//!
//! The stack is three resource groups: an IAM role assumable by API
//! Gateway, an S3 bucket granting that role read/write, and a regional REST
//! API proxying `GET /`, `GET /{object}`, and `PUT /{object}` straight to
//! the bucket, with access logging to CloudWatch Logs.
//!
//! # Usage
//!
//! ```text
//! s3gate synth      # print the synthesized template JSON
//! s3gate validate   # check the declared stack's invariants
//! s3gate deploy     # validate, then create the stack in the target account
//! s3gate destroy    # tear the stack down, leaving nothing behind
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DEFAULT_REGION` | `us-east-1` | Target region |
//! | `ROLE_NAME` | `apigatewayS3AccessRole` | Access role name |
//! | `BUCKET_NAME` | `apigateway-s3-demo-bucket` | Storage bucket name |
//! | `LOG_GROUP_NAME` | `apigatewayS3DemoAccessLog` | Access log group name |
//! | `API_NAME` | `apigatewayS3CDKRestAPI` | REST API name |
//! | `STAGE_NAME` | `prod` | Deployed stage name |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use s3gate_core::StackConfig;
use s3gate_deploy::Deployer;
use s3gate_model::ProxyStack;

/// The subcommands the CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print the synthesized template.
    Synth,
    /// Validate the declared stack.
    Validate,
    /// Deploy the stack.
    Deploy,
    /// Tear the stack down.
    Destroy,
}

impl Command {
    /// Parse a subcommand name.
    fn parse(arg: &str) -> Option<Self> {
        match arg {
            "synth" => Some(Self::Synth),
            "validate" => Some(Self::Validate),
            "deploy" => Some(Self::Deploy),
            "destroy" => Some(Self::Destroy),
            _ => None,
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

const USAGE: &str = "usage: s3gate <synth|validate|deploy|destroy>";

#[tokio::main]
async fn main() -> Result<()> {
    let command = std::env::args()
        .nth(1)
        .as_deref()
        .and_then(Command::parse)
        .context(USAGE)?;

    let config = StackConfig::from_env()?;
    let stack = ProxyStack::from_config(&config);

    // synth and validate are pure; only deploy/destroy need tracing and clients.
    match command {
        Command::Synth => {
            stack.validate()?;
            println!("{}", stack.synth(&config).to_string_pretty());
        }
        Command::Validate => {
            stack.validate()?;
            println!("stack is valid");
        }
        Command::Deploy => {
            init_tracing(&config.log_level)?;
            info!(region = %config.region, "deploying stack");
            let deployer = Deployer::from_env(config.region.clone()).await;
            let outputs = deployer.deploy(&stack).await?;
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        }
        Command::Destroy => {
            init_tracing(&config.log_level)?;
            info!(region = %config.region, "destroying stack");
            let deployer = Deployer::from_env(config.region.clone()).await;
            deployer.destroy(&stack).await?;
            println!("stack destroyed");
        }
    }

    Ok(())
}
