use utoipa::OpenApi;

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Vitals endpoints
        crate::api::handlers::vitals::get_thresholds,
        crate::api::handlers::vitals::evaluate_vitals,
        crate::api::handlers::vitals::check_vitals
    ),
    components(
        schemas(
            // Domain entities
            vital_monitor_domain::Reading,
            vital_monitor_domain::VitalKind,
            vital_monitor_domain::Threshold,
            vital_monitor_domain::AlertPolicy,

            // Public entities
            crate::entities::common::ErrorResponse,
            crate::entities::vitals::VitalVerdict,
            crate::entities::vitals::EvaluationResponse,
            crate::entities::vitals::CheckResponse,
            crate::entities::vitals::ThresholdsResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "vitals", description = "Vital sign evaluation and alerting endpoints")
    ),
    info(
        title = "VitalMonitor API",
        version = "0.1.0",
        description = "Range evaluation and alerting for bedside vital signs",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
