pub mod chart_service;
pub mod fragment_service;
pub mod navigator_service;
pub mod prediction_service;
pub mod readiness_service;
