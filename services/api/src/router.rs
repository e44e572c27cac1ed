use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use optica_core::health::{healthz, readyz};
use optica_core::middleware::request_id_layer;

use crate::config::RegistrationMode;
use crate::handlers::{
    patient::{
        create_patient, delete_patient, get_patient, list_patients, patient_filter_options,
        toggle_patient_status, update_patient,
    },
    prescription::{
        create_prescription, delete_prescription, get_prescription, list_prescriptions,
        update_prescription,
    },
    session::{login, logout},
    user::{create_user, delete_user, get_user, list_users, reset_password, signup, update_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/session", post(login))
        .route("/session", delete(logout))
        // Users (admin)
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", patch(update_user))
        .route("/users/{id}", delete(delete_user))
        .route("/users/{id}/reset-password", post(reset_password))
        // Patients
        .route("/patients", get(list_patients))
        .route("/patients", post(create_patient))
        .route("/patients/filter-options", get(patient_filter_options))
        .route("/patients/{id}", get(get_patient))
        .route("/patients/{id}", patch(update_patient))
        .route("/patients/{id}", delete(delete_patient))
        .route("/patients/{id}/toggle-status", post(toggle_patient_status))
        // Prescriptions
        .route("/patients/{id}/prescriptions", get(list_prescriptions))
        .route("/patients/{id}/prescriptions", post(create_prescription))
        .route("/prescriptions/{id}", get(get_prescription))
        .route("/prescriptions/{id}", patch(update_prescription))
        .route("/prescriptions/{id}", delete(delete_prescription));

    if state.registration_mode == RegistrationMode::Open {
        router = router.route("/signup", post(signup));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
