use std::path::Path;

use anyhow::{Context, bail};
use expensa_core::identity::ActorProfile;
use expensa_db::upload::UploadFile;
use serde_json::{Map, Value};

/// Field values from `--data` or `--file`, as a JSON object.
pub async fn read_fields(data: Option<&str>, file: Option<&str>) -> anyhow::Result<Map<String, Value>> {
    let raw = match (data, file) {
        (Some(data), _) => data.to_string(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {path}"))?,
        (None, None) => bail!("pass field values with --data or --file"),
    };
    parse_object(&raw)
}

pub fn parse_object(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("field values are not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("field values must be a JSON object, got {other}"),
    }
}

pub async fn read_profile(path: &str) -> anyhow::Result<ActorProfile> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read profile {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid profile in {path}"))
}

/// Read a local file into an upload payload.
pub async fn read_upload(path: &str, content_type: Option<&str>) -> anyhow::Result<UploadFile> {
    let name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{path} has no file name"))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {path}"))?;
    let content_type = content_type.map_or_else(|| guess_content_type(&name), str::to_string);
    Ok(UploadFile::new(name, content_type, bytes))
}

fn guess_content_type(name: &str) -> String {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn object_required() {
        assert!(parse_object(r#"{"title": "Trip"}"#).is_ok());
        let err = parse_object("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
        assert!(parse_object("{").is_err());
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(guess_content_type("Receipt.PDF"), "application/pdf");
        assert_eq!(guess_content_type("photo.jpeg"), "image/jpeg");
        assert_eq!(guess_content_type("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn upload_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxi.txt");
        std::fs::write(&path, b"35.00").unwrap();

        let file = read_upload(path.to_str().unwrap(), None).await.unwrap();
        assert_eq!(file.name, "taxi.txt");
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.size_bytes(), 5);
    }

    #[tokio::test]
    async fn fields_need_a_source() {
        let err = read_fields(None, None).await.unwrap_err();
        assert!(err.to_string().contains("--data or --file"));
    }
}
