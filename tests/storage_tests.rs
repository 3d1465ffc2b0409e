use asset_portal::storage::{MockStorageService, S3StorageClient, StorageService};
use uuid::Uuid;

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success() {
        let mock = MockStorageService::new();
        let filename = "laptop.jpg";
        let result = mock.get_presigned_upload_url(filename, "image/jpeg").await;
        assert!(result.is_ok());

        let url = result.unwrap();

        assert!(url.contains("signature=fake"));
        // The key is embedded in the returned URL
        assert!(url.contains(filename));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockStorageService::new_failing();
        let result = mock.get_presigned_upload_url("laptop.jpg", "image/jpeg").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_delete_records_keys() {
        let mock = MockStorageService::new();
        mock.delete_object("asset-photos/a.jpg").await.unwrap();
        mock.delete_object("asset-photos/b.jpg").await.unwrap();
        assert_eq!(
            mock.deleted(),
            vec![
                "asset-photos/a.jpg".to_string(),
                "asset-photos/b.jpg".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_sanitization() {
        let mock = MockStorageService::new();
        let result = mock
            .get_presigned_upload_url("../../etc/passwd", "text/plain")
            .await;
        assert!(result.is_ok());

        let url = result.unwrap();

        // The sanitized key is embedded in the URL; traversal segments are gone.
        assert!(!url.contains(".."));
    }
}

#[cfg(test)]
mod s3_tests {
    use super::*;

    #[tokio::test]
    async fn test_s3_client_creation() {
        let _client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
        )
        .await;
        // Just testing that construction doesn't panic
    }

    #[tokio::test]
    async fn test_s3_presigned_url_format() {
        let client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
        )
        .await;

        let key = format!("asset-photos/{}.jpg", Uuid::new_v4());
        let result = client.get_presigned_upload_url(&key, "image/jpeg").await;

        // Presigning is local key-signing; no network round-trip is needed.
        assert!(result.is_ok());

        let url = result.unwrap();

        assert!(url.contains("localhost:9000"));
        assert!(url.contains(&key));
    }
}
