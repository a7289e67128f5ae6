#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{schema::Schema, PathItemType, RefOr};
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components should be generated");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("{} should be an object schema", name),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();
        for name in [
            "ErrorResponse",
            "HealthResponse",
            "AttributesResponse",
            "DashboardResponse",
            "Insight",
            "SummaryRow",
            "MetricCard",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_health_response_schema_structure() {
        let properties = object_properties("HealthResponse");
        for field in ["status", "version", "data_source", "rows"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_openapi_paths_contain_all_endpoints() {
        let openapi = ApiDoc::openapi();

        for path in [
            "/health",
            "/api/v1/attributes",
            "/api/v1/dashboard",
            "/api/v1/insights",
            "/api/v1/summary",
            "/api/v1/charts/timeseries",
            "/api/v1/charts/distribution",
        ] {
            let item = openapi
                .paths
                .paths
                .get(path)
                .unwrap_or_else(|| panic!("missing path {}", path));
            assert!(item.operations.contains_key(&PathItemType::Get));
        }
    }

    #[test]
    fn test_chart_endpoints_document_not_found() {
        let openapi = ApiDoc::openapi();
        let chart = openapi.paths.paths.get("/api/v1/charts/timeseries").unwrap();
        let operation = chart.operations.get(&PathItemType::Get).unwrap();

        assert!(operation.responses.responses.contains_key("200"));
        assert!(operation.responses.responses.contains_key("404"));
    }

    #[test]
    fn test_filter_parameters_are_documented() {
        let openapi = ApiDoc::openapi();
        let dashboard = openapi.paths.paths.get("/api/v1/dashboard").unwrap();
        let operation = dashboard.operations.get(&PathItemType::Get).unwrap();
        let names: Vec<&str> = operation
            .parameters
            .as_ref()
            .map(|params| params.iter().map(|p| p.name.as_str()).collect())
            .unwrap_or_default();

        assert_eq!(names, vec!["attribute", "provenance", "start_date", "end_date"]);
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi = ApiDoc::openapi();
        let openapi_json = serde_json::to_string(&openapi).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("ErrorResponse"));
    }
}
