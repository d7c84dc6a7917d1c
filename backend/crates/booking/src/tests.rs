//! Router-level tests for the booking crate

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use kernel::id::AccountId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::BookingConfig;
    use crate::domain::entities::DoctorStats;
    use crate::infra::memory::{MemoryBookingStore, RecordingMailer, StubGateway};
    use crate::presentation::router::booking_router;

    struct TestApp {
        router: Router,
        store: MemoryBookingStore,
        gateway: StubGateway,
        mailer: RecordingMailer,
        doctor_id: AccountId,
        patient_id: AccountId,
    }

    fn app(patients_count: i32) -> TestApp {
        let store = MemoryBookingStore::default();
        let gateway = StubGateway::default();
        let mailer = RecordingMailer::default();
        let doctor_id = store.seed_doctor("Dr Bello", "dr.bello@example.com", patients_count);
        let patient_id = store.seed_patient("Ada Obi", "ada@example.com");
        let router = booking_router(
            store.clone(),
            gateway.clone(),
            mailer.clone(),
            BookingConfig::default(),
        );
        TestApp {
            router,
            store,
            gateway,
            mailer,
            doctor_id,
            patient_id,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Status and `Location` of a redirect
    async fn follow(router: &Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        (response.status(), location)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn callback_uri(app: &TestApp, transaction_id: &str) -> String {
        format!(
            "/payment-success?status=successful&tx_ref=foodmed-x&transaction_id={transaction_id}&doctorId={}&patientEmail=ada%40example.com",
            app.doctor_id
        )
    }

    #[tokio::test]
    async fn test_appointment_crud() {
        let app = app(0);

        let (status, created) = send(
            &app.router,
            json_request(
                Method::POST,
                "/appointment",
                json!({
                    "doctorId": app.doctor_id.to_string(),
                    "patientId": app.patient_id.to_string(),
                    "date": "2026-11-02",
                    "time": "10:30",
                    "notes": "Low-sodium meal plan review"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Confirmed");
        assert_eq!(created["doctor"]["name"], "Dr Bello");
        assert_eq!(created["doctor"]["specialty"], "Nutrition");
        assert_eq!(created["patient"]["email"], "ada@example.com");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, list) = send(
            &app.router,
            get(&format!("/appointment/doctor/{}", app.doctor_id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["patient"]["name"], "Ada Obi");

        let (status, list) = send(
            &app.router,
            get(&format!("/appointment/patient/{}", app.patient_id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["id"], id.as_str());

        let (status, body) = send(
            &app.router,
            json_request(
                Method::PATCH,
                &format!("/appointment/{id}"),
                json!({ "status": "Completed", "time": "11:00" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["appointment"]["status"], "Completed");
        assert_eq!(body["appointment"]["time"], "11:00");
        assert_eq!(body["appointment"]["notes"], "Low-sodium meal plan review");
    }

    #[tokio::test]
    async fn test_appointment_errors() {
        let app = app(0);

        let (status, _) = send(
            &app.router,
            json_request(
                Method::POST,
                "/appointment",
                json!({ "doctorId": app.doctor_id.to_string() }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app.router,
            json_request(
                Method::PATCH,
                &format!("/appointment/{}", AccountId::new()),
                json!({ "status": "Cancelled" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app.router, get("/appointment/doctor/not-an-id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.store.appointment_count(), 0);
    }

    #[tokio::test]
    async fn test_pay_returns_hosted_link() {
        let app = app(0);

        let (status, body) = send(
            &app.router,
            json_request(
                Method::POST,
                "/pay",
                json!({
                    "doctorId": app.doctor_id.to_string(),
                    "patientEmail": "ada@example.com",
                    "patientName": "Ada Obi"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let tx_ref = body["txRef"].as_str().unwrap();
        assert!(body["link"].as_str().unwrap().ends_with(tx_ref));
        assert_eq!(app.gateway.last_request().unwrap().customer_name, "Ada Obi");

        app.gateway.fail_create();
        let (status, body) = send(
            &app.router,
            json_request(
                Method::POST,
                "/pay",
                json!({
                    "doctorId": app.doctor_id.to_string(),
                    "patientEmail": "ada@example.com"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Payment gateway error");
    }

    #[tokio::test]
    async fn test_callback_redirects_to_success_once() {
        let app = app(9);
        let uri = callback_uri(&app, "4861231");

        let (status, location) = follow(&app.router, &uri).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(
            location,
            "https://foodmed.app/payment-success.html?status=successful&transactionId=4861231"
        );
        assert_eq!(
            app.store.doctor_stats(&app.doctor_id),
            Some(DoctorStats {
                patients_count: 10,
                stars: 1
            })
        );
        assert_eq!(app.store.appointment_count(), 1);
        assert_eq!(app.mailer.sent().len(), 2);

        let (status, replayed) = follow(&app.router, &uri).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(replayed, location);
        assert_eq!(app.store.doctor_stats(&app.doctor_id).unwrap().patients_count, 10);
        assert_eq!(app.store.appointment_count(), 1);
    }

    #[tokio::test]
    async fn test_callback_failures_redirect_to_failure_page() {
        let app = app(9);
        app.gateway.set_status("failed");

        let (status, location) = follow(&app.router, &callback_uri(&app, "4861231")).await;
        assert_eq!(status, StatusCode::FOUND);
        assert!(location.starts_with("https://foodmed.app/payment-failed.html?status=failed"));
        assert!(location.contains("reason=payment_not_verified"));
        assert!(location.contains(&format!("doctorId={}", app.doctor_id)));
        assert_eq!(app.store.doctor_stats(&app.doctor_id).unwrap().patients_count, 9);

        let (status, location) = follow(&app.router, "/payment-success").await;
        assert_eq!(status, StatusCode::FOUND);
        assert!(location.contains("reason=missing_parameters"));
        assert_eq!(app.gateway.verify_calls(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_callback_query_still_redirects() {
        let app = app(9);

        // both spellings of the id, and a repeated key
        let both = format!("{}&transactionId=4861231", callback_uri(&app, "4861231"));
        let repeated = format!("{}&doctorId=x", callback_uri(&app, "4861231"));

        for uri in [both, repeated] {
            let (status, location) = follow(&app.router, &uri).await;
            assert_eq!(status, StatusCode::FOUND, "{uri}");
            assert!(location.starts_with("https://foodmed.app/payment-failed.html?status=failed"));
            assert!(location.contains("reason=missing_parameters"));
        }
        assert_eq!(app.gateway.verify_calls(), 0);
        assert_eq!(app.store.doctor_stats(&app.doctor_id).unwrap().patients_count, 9);
    }

    #[tokio::test]
    async fn test_callback_with_path_in_transaction_id_is_refused() {
        let app = app(9);
        follow(&app.router, &callback_uri(&app, "4861231")).await;

        let (status, location) =
            follow(&app.router, &callback_uri(&app, "4861231%2Fverify%3Freplay%3D")).await;
        assert_eq!(status, StatusCode::FOUND);
        assert!(location.contains("reason=invalid_input"));
        assert_eq!(app.store.doctor_stats(&app.doctor_id).unwrap().patients_count, 10);
        assert_eq!(app.store.appointment_count(), 1);
    }
}
