//! Teardown tests: destroy must leave nothing behind.

#[cfg(test)]
mod tests {
    use crate::{deployer, stack, test_stack_config};

    #[tokio::test]
    #[ignore = "requires AWS credentials and deploys real resources"]
    async fn test_should_leave_no_orphaned_resources_after_destroy() {
        let config = test_stack_config("teardown");
        let stack = stack(&config);
        let deployer = deployer(&config).await;

        deployer.deploy(&stack).await.expect("deploy");
        deployer.destroy(&stack).await.expect("destroy");

        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let iam = aws_sdk_iam::Client::new(&shared);
        assert!(
            iam.get_role()
                .role_name(&config.role_name)
                .send()
                .await
                .is_err(),
            "role must be deleted"
        );

        let s3 = aws_sdk_s3::Client::new(&shared);
        assert!(
            s3.head_bucket()
                .bucket(&config.bucket_name)
                .send()
                .await
                .is_err(),
            "bucket must be deleted"
        );

        let logs = aws_sdk_cloudwatchlogs::Client::new(&shared);
        let groups = logs
            .describe_log_groups()
            .log_group_name_prefix(&config.log_group_name)
            .send()
            .await
            .expect("describe log groups");
        assert!(
            groups
                .log_groups()
                .iter()
                .all(|g| g.log_group_name() != Some(config.log_group_name.as_str())),
            "log group must be deleted"
        );

        let apigateway = aws_sdk_apigateway::Client::new(&shared);
        let apis = apigateway
            .get_rest_apis()
            .limit(500)
            .send()
            .await
            .expect("list rest apis");
        assert!(
            apis.items()
                .iter()
                .all(|a| a.name() != Some(config.api_name.as_str())),
            "REST API must be deleted"
        );
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials and deploys real resources"]
    async fn test_should_allow_destroy_to_be_rerun() {
        let config = test_stack_config("rerun");
        let stack = stack(&config);
        let deployer = deployer(&config).await;

        deployer.deploy(&stack).await.expect("deploy");
        deployer.destroy(&stack).await.expect("first destroy");
        // Every resource is already gone; a rerun must still succeed.
        deployer.destroy(&stack).await.expect("second destroy");
    }
}
