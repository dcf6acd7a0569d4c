//! Ticket API tests driven through the in-process router.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use common::{start_time, TestFixture};
use helpdesk_core::TicketError;

fn printer_jam() -> Value {
    json!({
        "title": "Printer jam",
        "description": "Tray 2",
        "category_id": 1,
        "status": "New"
    })
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

// ============================================================================
// Health & lookups
// ============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_lookups_are_sorted() {
    let fixture = TestFixture::new();

    let categories = fixture.get("/api/v1/categories").await;
    assert_eq!(categories.status, StatusCode::OK);
    let names: Vec<&str> = categories
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Hardware", "Network", "Software"]);

    let employees = fixture.get("/api/v1/employees").await;
    assert_eq!(employees.status, StatusCode::OK);
    let names: Vec<&str> = employees
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Grace Hopper", "Ada Lovelace", "Alan Turing"]);
}

// ============================================================================
// Add
// ============================================================================

#[tokio::test]
async fn test_create_ticket() {
    let fixture = TestFixture::new();

    let response = fixture.post("/api/v1/tickets", printer_jam()).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Ticket added successfully.");
    assert_eq!(response.body["ticket"]["title"], "Printer jam");
    assert_eq!(response.body["ticket"]["status"], "New");
    assert_eq!(
        timestamp(&response.body["ticket"]["date_created"]),
        start_time()
    );
    assert!(response.body["ticket"].get("date_resolved").is_none());
}

#[tokio::test]
async fn test_create_ticket_validation_failures() {
    let fixture = TestFixture::new();

    let cases = [
        (
            json!({ "title": "  ", "category_id": 1, "status": "New" }),
            "Title must not be empty.",
        ),
        (
            json!({ "title": "Printer jam", "category_id": 0, "status": "New" }),
            "Category must be selected.",
        ),
        (
            json!({ "title": "Printer jam", "category_id": 1, "status": "" }),
            "Status must be selected.",
        ),
        (
            json!({ "title": "Printer jam", "category_id": 1, "status": "Pending" }),
            "Invalid ticket status.",
        ),
        (
            json!({ "title": "Printer jam", "category_id": 1, "status": "Closed",
                    "resolution_notes": "done" }),
            "Employee must be assigned.",
        ),
        (
            json!({ "title": "Printer jam", "category_id": 1, "status": "Resolved",
                    "assigned_employee_id": 3 }),
            "Resolution Notes are required.",
        ),
    ];

    for (body, message) in cases {
        let response = fixture.post("/api/v1/tickets", body).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["message"], message);
    }

    let list = fixture.get("/api/v1/tickets").await;
    assert_eq!(list.body["total"], 0);
}

#[tokio::test]
async fn test_create_resolved_ticket_stamps_date() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/v1/tickets",
            json!({
                "title": "Printer jam",
                "category_id": 1,
                "status": "Resolved",
                "assigned_employee_id": 3,
                "resolution_notes": "Cleared the paper path"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        timestamp(&response.body["ticket"]["date_resolved"]),
        start_time()
    );
}

#[tokio::test]
async fn test_create_store_failure_is_500() {
    let fixture = TestFixture::with_mock_store();
    fixture
        .mock_store
        .as_ref()
        .unwrap()
        .set_next_error(TicketError::Database("disk full".to_string()));

    let response = fixture.post("/api/v1/tickets", printer_jam()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["success"], false);
    assert_eq!(
        response.body["message"],
        "Error adding ticket: Database error: disk full"
    );
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn test_get_ticket_with_display_names() {
    let fixture = TestFixture::new();
    let id = fixture
        .create(json!({
            "title": "VPN drops",
            "category_id": 2,
            "status": "In-Progress",
            "assigned_employee_id": 1
        }))
        .await;

    let response = fixture.get(&format!("/api/v1/tickets/{}", id)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["category"], "Network");
    assert_eq!(response.body["assigned_employee"], "Ada Lovelace");
    assert_eq!(response.body["status"], "In-Progress");
}

#[tokio::test]
async fn test_get_missing_ticket() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/tickets/999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Ticket not found.");
}

#[tokio::test]
async fn test_list_filters() {
    let fixture = TestFixture::new();
    fixture.create(printer_jam()).await;
    fixture.clock.advance(Duration::minutes(1));
    fixture
        .create(json!({ "title": "VPN drops", "category_id": 2, "status": "In-Progress" }))
        .await;
    fixture.clock.advance(Duration::minutes(1));
    fixture
        .create(json!({ "title": "Monitor flicker", "category_id": 1, "status": "New" }))
        .await;

    let all = fixture.get("/api/v1/tickets").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["total"], 3);
    assert_eq!(all.body["tickets"][0]["title"], "Monitor flicker");
    assert_eq!(all.body["tickets"][2]["title"], "Printer jam");

    let in_progress = fixture.get("/api/v1/tickets?status=In-Progress").await;
    assert_eq!(in_progress.body["total"], 1);
    assert_eq!(in_progress.body["tickets"][0]["title"], "VPN drops");

    let hardware = fixture.get("/api/v1/tickets?category_id=1").await;
    assert_eq!(hardware.body["total"], 2);

    let keyword = fixture.get("/api/v1/tickets?keyword=tray").await;
    assert_eq!(keyword.body["total"], 1);
    assert_eq!(keyword.body["tickets"][0]["title"], "Printer jam");

    let blank_status = fixture.get("/api/v1/tickets?status=").await;
    assert_eq!(blank_status.body["total"], 3);

    let bad_status = fixture.get("/api/v1/tickets?status=Done").await;
    assert_eq!(bad_status.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(bad_status.body["message"], "Invalid ticket status.");
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_lifecycle() {
    let fixture = TestFixture::new();
    let id = fixture.create(printer_jam()).await;
    let path = format!("/api/v1/tickets/{}", id);

    fixture.clock.advance(Duration::hours(2));
    let resolved = fixture
        .put(
            &path,
            json!({
                "title": "Printer jam",
                "category_id": 1,
                "status": "Resolved",
                "assigned_employee_id": 3,
                "resolution_notes": "Cleared the paper path"
            }),
        )
        .await;

    assert_eq!(resolved.status, StatusCode::OK);
    assert_eq!(resolved.body["message"], "Ticket updated successfully.");
    assert_eq!(
        timestamp(&resolved.body["ticket"]["date_created"]),
        start_time()
    );
    assert_eq!(
        timestamp(&resolved.body["ticket"]["date_resolved"]),
        start_time() + Duration::hours(2)
    );

    let reopened = fixture
        .put(
            &path,
            json!({ "title": "Printer jam", "category_id": 1, "status": "New" }),
        )
        .await;
    assert_eq!(reopened.status, StatusCode::OK);
    assert!(reopened.body["ticket"].get("resolution_notes").is_none());
    assert!(reopened.body["ticket"].get("date_resolved").is_none());
}

#[tokio::test]
async fn test_update_rejected_leaves_ticket_unchanged() {
    let fixture = TestFixture::new();
    let id = fixture.create(printer_jam()).await;
    let path = format!("/api/v1/tickets/{}", id);

    let response = fixture
        .put(
            &path,
            json!({
                "title": "Printer on fire",
                "category_id": 1,
                "status": "Closed",
                "resolution_notes": "done"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["message"], "Assigned Employee is required.");

    let stored = fixture.get(&path).await;
    assert_eq!(stored.body["title"], "Printer jam");
    assert_eq!(stored.body["status"], "New");
}

#[tokio::test]
async fn test_update_missing_ticket() {
    let fixture = TestFixture::new();
    let response = fixture.put("/api/v1/tickets/999", printer_jam()).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Ticket not found.");
}

#[tokio::test]
async fn test_update_resolution_before_creation() {
    let fixture = TestFixture::new();
    let id = fixture.create(printer_jam()).await;

    fixture.clock.set(start_time() - Duration::seconds(1));
    let response = fixture
        .put(
            &format!("/api/v1/tickets/{}", id),
            json!({
                "title": "Printer jam",
                "category_id": 1,
                "status": "Resolved",
                "assigned_employee_id": 3,
                "resolution_notes": "done"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["message"],
        "Date Resolved cannot be earlier than Date Created."
    );
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_ticket() {
    let fixture = TestFixture::new();
    let id = fixture.create(printer_jam()).await;
    let path = format!("/api/v1/tickets/{}", id);

    let response = fixture.delete(&path).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Ticket deleted successfully.");
    assert_eq!(response.body["ticket"]["id"], id);

    let again = fixture.delete(&path).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body["message"], "Ticket not found.");
}

#[tokio::test]
async fn test_delete_all_tickets() {
    let fixture = TestFixture::new();

    let empty = fixture.delete("/api/v1/tickets").await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["message"], "No tickets to clear or delete.");

    fixture.create(printer_jam()).await;
    fixture.create(printer_jam()).await;

    let response = fixture.delete("/api/v1/tickets").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(
        response.body["message"],
        "All tickets have been deleted successfully."
    );
    assert_eq!(response.body["deleted"].as_array().unwrap().len(), 2);

    let list = fixture.get("/api/v1/tickets").await;
    assert_eq!(list.body["total"], 0);
}

#[tokio::test]
async fn test_delete_all_reports_failures() {
    let fixture = TestFixture::with_mock_store();
    fixture.create(printer_jam()).await;
    fixture.create(printer_jam()).await;
    fixture
        .mock_store
        .as_ref()
        .unwrap()
        .set_next_error(TicketError::Database("busy".to_string()));

    let response = fixture.delete("/api/v1/tickets").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["deleted"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["failures"].as_array().unwrap().len(), 1);
    assert_eq!(
        response.body["failures"][0]["message"],
        "Error deleting ticket: Database error: busy"
    );
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.create(printer_jam()).await;

    let response = fixture.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("helpdesk_ticket_operations_total"));
    assert!(response.text.contains("helpdesk_tickets_by_status"));
    assert!(response.text.contains("helpdesk_http_requests_total"));
}
