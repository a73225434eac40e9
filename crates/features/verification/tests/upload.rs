use ctn_kernel::client::ApiClient;
use ctn_kernel::domain::config::{ApiConfig, VerificationConfig};
use ctn_kernel::domain::registry::FeatureSlice;
use ctn_kernel::notify::Notifier;
use ctn_verification::{Verification, VerificationError};
use tempfile::TempDir;

fn slice(max_upload_bytes: u64) -> Verification {
    // Nothing listens here; every test fails before a request is sent.
    let client = ApiClient::new(&ApiConfig { base_url: "http://127.0.0.1:9".into(), timeout_secs: 1 })
        .expect("client");
    let config = VerificationConfig { max_upload_bytes, ..VerificationConfig::default() };
    let initialized = ctn_verification::init(client, Notifier::new(Default::default()), config);
    initialized.state.as_any().downcast_ref::<Verification>().expect("verification slice").clone()
}

#[tokio::test]
async fn oversized_files_are_rejected_locally() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("extract.pdf");
    std::fs::write(&path, b"%PDF-1.7 0123456789").expect("write");

    let err = slice(8).upload_file("le-1", &path).await.expect_err("too large");
    assert_eq!(err.kind(), "InvalidDocument");
}

#[tokio::test]
async fn large_files_are_refused_from_their_size() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("scan.pdf");
    let file = std::fs::File::create(&path).expect("create");
    file.set_len(64 * 1024 * 1024).expect("sparse file");

    let err = slice(10 * 1024 * 1024).upload_file("le-1", &path).await.expect_err("too large");
    assert!(err.to_string().contains("67108864 bytes; the limit is 10485760"));
}

#[tokio::test]
async fn missing_files_are_io_errors() {
    let temp = TempDir::new().expect("tempdir");
    let err = slice(1024).upload_file("le-1", &temp.path().join("absent.pdf")).await.expect_err("absent");
    assert!(matches!(err, VerificationError::Io { .. }));
}

#[tokio::test]
async fn non_pdf_names_are_rejected_locally() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("extract.docx");
    std::fs::write(&path, b"%PDF-1.7").expect("write");

    let err = slice(1024).upload_file("le-1", &path).await.expect_err("not pdf");
    assert!(err.to_string().contains("not a .pdf"));
}
