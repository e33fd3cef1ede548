//! Proxy round-trip tests: PUT then GET through the deployed API.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{cleanup, deployer, stack, test_stack_config};

    /// Small JPEG-ish payload; the gateway must pass the bytes through
    /// untouched since `image/jpeg` is declared binary.
    const BODY: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0xFF, 0xD9];

    #[tokio::test]
    #[ignore = "requires AWS credentials and deploys real resources"]
    async fn test_should_roundtrip_binary_object_through_proxy() {
        let config = test_stack_config("roundtrip");
        let stack = stack(&config);
        let deployer = deployer(&config).await;

        let outputs = deployer.deploy(&stack).await.expect("deploy");
        // Freshly created IAM roles take a moment to propagate to API Gateway.
        tokio::time::sleep(Duration::from_secs(15)).await;

        let http = reqwest::Client::new();
        let object_url = format!("{}/photo.jpg", outputs.invoke_url);

        let put = http
            .put(&object_url)
            .header("Content-Type", "image/jpeg")
            .body(BODY.to_vec())
            .send()
            .await
            .expect("put object");
        assert_eq!(put.status(), 200, "PUT should pass through the 200 tier");
        assert_eq!(
            put.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*"),
        );

        let get = http
            .get(&object_url)
            .header("Accept", "image/jpeg")
            .send()
            .await
            .expect("get object");
        assert_eq!(get.status(), 200);
        assert_eq!(
            get.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("image/jpeg"),
            "content type must be preserved through the header mapping"
        );
        assert!(
            get.headers().contains_key("timestamp"),
            "backend Date must surface as Timestamp"
        );
        let bytes = get.bytes().await.expect("body");
        assert_eq!(&bytes[..], BODY, "bytes must round-trip unchanged");

        // Root GET lists the bucket.
        let list = http.get(&outputs.invoke_url).send().await.expect("list bucket");
        assert_eq!(list.status(), 200);
        let listing = list.text().await.expect("listing body");
        assert!(listing.contains("photo.jpg"));

        cleanup(&deployer, &stack).await;
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials and deploys real resources"]
    async fn test_should_pass_backend_errors_through_with_cors_only() {
        let config = test_stack_config("errors");
        let stack = stack(&config);
        let deployer = deployer(&config).await;

        let outputs = deployer.deploy(&stack).await.expect("deploy");
        tokio::time::sleep(Duration::from_secs(15)).await;

        let http = reqwest::Client::new();
        let missing = http
            .get(format!("{}/no-such-object.jpg", outputs.invoke_url))
            .send()
            .await
            .expect("get missing object");

        // S3 reports 404 for the missing key; the 4xx tier folds it to 400.
        assert_eq!(missing.status(), 400);
        assert_eq!(
            missing
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*"),
        );
        assert!(
            !missing.headers().contains_key("timestamp"),
            "error tiers set only the CORS header"
        );

        cleanup(&deployer, &stack).await;
    }
}
