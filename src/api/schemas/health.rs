use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: CheckStatus,
    pub database: CheckStatus,
    pub cache: CheckStatus,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database: CheckStatus, cache: CheckStatus) -> Self {
        let status =
            if database == CheckStatus::Ok && cache == CheckStatus::Ok { CheckStatus::Ok } else { CheckStatus::Error };
        Self { status, database, cache }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == CheckStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_failing_component_fails_readiness() {
        let body = HealthResponse::new(CheckStatus::Ok, CheckStatus::Error);
        assert!(!body.is_ready());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "status": "error", "database": "ok", "cache": "error" })
        );

        assert!(HealthResponse::new(CheckStatus::Ok, CheckStatus::Ok).is_ready());
    }
}
