use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use expensa_core::enums::{AttachmentOrigin, EntityType, FundingRequestStatus};

    use super::parse_enum;

    #[test]
    fn parses_snake_case_enum() {
        let status: FundingRequestStatus =
            parse_enum("under_analysis", "status").expect("status should parse");
        assert_eq!(status, FundingRequestStatus::UnderAnalysis);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let entity: EntityType =
            parse_enum("reimbursement-claim", "entity-type").expect("entity type should parse");
        assert_eq!(entity, EntityType::ReimbursementClaim);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<AttachmentOrigin>("partner", "origin").expect_err("should fail");
        assert!(err.to_string().contains("invalid origin 'partner'"));
    }
}
