/// Integration tests for the ContentFlow API
///
/// These tests drive the full router over an in-memory store:
/// - Signup/login with email normalization and duplicate rejection
/// - Content assignment, visibility scoping, and the review loop
/// - Revision submission forcing re-review
/// - Calendar ownership and value-addressed item operations
/// - Submission recording and scoping

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

/// Assigns a content item as the admin and returns its id
async fn assign_content(
    ctx: &TestContext,
    admin_token: &str,
    customer_id: Uuid,
    creator_id: Uuid,
) -> Uuid {
    let (status, body) = ctx
        .post(
            "/v1/content",
            admin_token,
            json!({
                "title": "Spring launch",
                "description": "Teaser post",
                "customer_id": customer_id,
                "creator_id": creator_id,
                "platform": "instagram",
                "content_type": "image"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "assign failed: {}", body);

    body["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_signup_normalizes_email_and_rejects_duplicates() {
    let ctx = TestContext::new();

    // Whitespace and case in the address are normalized away
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/signup/customer",
            None,
            Some(json!({ "email": "  Client@Example.COM ", "password": common::PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

    // Login works with the canonical form
    let token = ctx.login("client@example.com").await;
    assert!(!token.is_empty());

    // Any variant of the same address is a conflict, even across roles
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/signup/creator",
            None,
            Some(json!({ "email": "client@example.com", "password": common::PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_weak_password_is_a_validation_error() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/signup/admin",
            None,
            Some(json!({ "email": "admin@example.com", "password": "alllowercase" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_login_reports_same_message_for_unknown_and_wrong() {
    let ctx = TestContext::new();
    ctx.signup("customer", "client@example.com").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": common::PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let unknown_message = body["message"].clone();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "client@example.com", "password": "Wr0ng$password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], unknown_message);
}

#[tokio::test]
async fn test_refresh_issues_a_working_access_token() {
    let ctx = TestContext::new();
    ctx.signup("admin", "admin@example.com").await;

    let (_, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": common::PASSWORD })),
        )
        .await;
    let refresh_token = body["refresh_token"].as_str().unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let access = body["access_token"].as_str().unwrap();
    let (status, _) = ctx.get("/v1/users", access).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_authentication() {
    let ctx = TestContext::new();

    let (status, _) = ctx.request("GET", "/v1/content", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays public
    let (status, body) = ctx.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.signup_and_login("admin", "admin@example.com").await;
    let (_, customer) = ctx.signup_and_login("customer", "client@example.com").await;

    let (status, body) = ctx.get("/v1/users?role=customer", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    // The safe projection never carries the credential hash
    assert!(body[0].get("password_hash").is_none());

    let (status, _) = ctx.get("/v1/users", &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_profile_is_invisible_to_other_customers() {
    let ctx = TestContext::new();
    let (owner_id, owner) = ctx.signup_and_login("customer", "one@example.com").await;
    let (_, other) = ctx.signup_and_login("customer", "two@example.com").await;

    let (status, _) = ctx
        .get(&format!("/v1/customers/{}", owner_id), &owner)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Same request from a different customer is a plain not-found
    let (status, body) = ctx
        .get(&format!("/v1/customers/{}", owner_id), &other)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn test_content_review_loop() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.signup_and_login("admin", "admin@example.com").await;
    let (customer_id, customer) = ctx.signup_and_login("customer", "client@example.com").await;
    let (creator_id, creator) = ctx.signup_and_login("creator", "maker@example.com").await;

    let content_id = assign_content(&ctx, &admin, customer_id, creator_id).await;
    let uri = format!("/v1/content/{}", content_id);

    // Creator submits a first draft; item moves to review
    let (status, _) = ctx
        .post(
            &format!("{}/revisions", uri),
            &creator,
            json!({ "changes": "first draft", "files": ["https://assets.example/1.png"] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = ctx.get(&uri, &creator).await;
    assert_eq!(body["status"], "under_review");

    // Creator cannot hand down a verdict
    let (status, _) = ctx
        .put(
            &format!("{}/status", uri),
            &creator,
            json!({ "status": "approved" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Customer asks for changes
    let (status, _) = ctx
        .put(
            &format!("{}/status", uri),
            &customer,
            json!({ "status": "revision_requested", "notes": "logo too small" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Creator resubmits; forced back under review, revision log grows
    let (status, _) = ctx
        .post(
            &format!("{}/revisions", uri),
            &creator,
            json!({ "changes": "bigger logo" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = ctx.get(&uri, &customer).await;
    assert_eq!(body["status"], "under_review");
    assert_eq!(body["revisions"].as_array().unwrap().len(), 2);

    // Customer approves; the audit trail records every change
    let (status, body) = ctx
        .put(
            &format!("{}/status", uri),
            &customer,
            json!({ "status": "approved", "notes": "ship it" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let comments = body["comments"].as_array().unwrap();
    let audit = comments.last().unwrap();
    assert_eq!(audit["type"], "status_change");
    assert_eq!(audit["message"], "Status changed to: approved. ship it");
}

#[tokio::test]
async fn test_content_is_invisible_outside_the_owning_pair() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.signup_and_login("admin", "admin@example.com").await;
    let (customer_id, customer) = ctx.signup_and_login("customer", "client@example.com").await;
    let (creator_id, creator) = ctx.signup_and_login("creator", "maker@example.com").await;
    let (_, stranger) = ctx.signup_and_login("customer", "other@example.com").await;

    let content_id = assign_content(&ctx, &admin, customer_id, creator_id).await;
    let uri = format!("/v1/content/{}", content_id);

    for token in [&admin, &customer, &creator] {
        let (status, _) = ctx.get(&uri, token).await;
        assert_eq!(status, StatusCode::OK);
    }

    // A foreign customer gets the same not-found as a bogus id
    let (status, body) = ctx.get(&uri, &stranger).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Content not found");

    let (status, other) = ctx
        .get(&format!("/v1/content/{}", Uuid::new_v4()), &stranger)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(other["message"], body["message"]);

    // Listing is scoped, not erroring
    let (status, body) = ctx.get("/v1/content", &stranger).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = ctx.get("/v1/content", &creator).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_assignment_is_admin_only() {
    let ctx = TestContext::new();
    let (customer_id, customer) = ctx.signup_and_login("customer", "client@example.com").await;
    let (creator_id, _) = ctx.signup_and_login("creator", "maker@example.com").await;

    let (status, _) = ctx
        .post(
            "/v1/content",
            &customer,
            json!({
                "title": "Self-assigned",
                "description": "",
                "customer_id": customer_id,
                "creator_id": creator_id,
                "platform": "instagram",
                "content_type": "image"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_submissions_are_creator_scoped() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.signup_and_login("admin", "admin@example.com").await;
    let (_, creator_a) = ctx.signup_and_login("creator", "a@example.com").await;
    let (_, creator_b) = ctx.signup_and_login("creator", "b@example.com").await;
    let (_, customer) = ctx.signup_and_login("customer", "client@example.com").await;

    // Images are mandatory
    let (status, _) = ctx
        .post(
            "/v1/submissions",
            &creator_a,
            json!({ "assignment_id": Uuid::new_v4(), "images": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .post(
            "/v1/submissions",
            &creator_a,
            json!({
                "assignment_id": Uuid::new_v4(),
                "caption": "spring vibes",
                "hashtags": ["#launch"],
                "images": ["https://assets.example/1.png"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "saved");

    // Each creator sees only their own records; admins see all
    let (_, body) = ctx.get("/v1/submissions", &creator_a).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = ctx.get("/v1/submissions", &creator_b).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = ctx.get("/v1/submissions", &admin).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Customers have no submission surface at all
    let (status, _) = ctx.get("/v1/submissions", &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_calendar_ownership_is_pinned_to_the_customer() {
    let ctx = TestContext::new();
    let (customer_id, customer) = ctx.signup_and_login("customer", "one@example.com").await;
    let (other_id, other) = ctx.signup_and_login("customer", "two@example.com").await;

    // Whatever customer_id the body claims, the calendar lands on the caller
    let (status, body) = ctx
        .post(
            "/v1/calendars",
            &customer,
            json!({ "name": "May schedule", "customer_id": other_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["customer_id"], customer_id.to_string());
    let calendar_id = body["id"].as_str().unwrap().to_string();

    // The other customer cannot see it, by listing or by id
    let (status, _) = ctx
        .get(&format!("/v1/calendars/customer/{}", customer_id), &other)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx
        .get(&format!("/v1/calendars/{}", calendar_id), &other)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Calendar not found");

    // Item-level addressing is gated the same way: the scope check fires
    // before the aggregate, so the response names the calendar, not the item
    ctx.post(
        &format!("/v1/calendars/{}/items", calendar_id),
        &customer,
        json!({ "date": "2024-05-01", "description": "Launch post" }),
    )
    .await;
    let (status, body) = ctx
        .put(
            &format!(
                "/v1/calendars/{}/items/2024-05-01/Launch%20post",
                calendar_id
            ),
            &other,
            json!({ "platform": "instagram" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Calendar not found");

    let (_, body) = ctx.get("/v1/calendars", &other).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_calendar_item_operations_by_value() {
    let ctx = TestContext::new();
    let (_, customer) = ctx.signup_and_login("customer", "client@example.com").await;

    let (_, body) = ctx
        .post("/v1/calendars", &customer, json!({ "name": "May schedule" }))
        .await;
    let calendar_id = body["id"].as_str().unwrap().to_string();
    let items_uri = format!("/v1/calendars/{}/items", calendar_id);

    // Adding the same item twice keeps one copy
    let item = json!({ "date": "2024-05-01", "description": "Launch post" });
    ctx.post(&items_uri, &customer, item.clone()).await;
    let (status, body) = ctx.post(&items_uri, &customer, item.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content_items"].as_array().unwrap().len(), 1);

    // Patch by quasi-key; description in the path is percent-encoded
    let (status, body) = ctx
        .put(
            &format!("{}/2024-05-01/Launch%20post", items_uri),
            &customer,
            json!({ "platform": "instagram", "time": "10:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content_items"][0]["platform"], "instagram");
    assert_eq!(body["content_items"][0]["time"], "10:00");

    // A non-string quasi-key value is rejected, not stashed in the item
    let (status, body) = ctx
        .put(
            &format!("{}/2024-05-01/Launch%20post", items_uri),
            &customer,
            json!({ "date": 123 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Field `date` must be a string");

    // Unknown quasi-key is a not-found on the item, not the calendar
    let (status, body) = ctx
        .put(
            &format!("{}/2024-05-02/Launch%20post", items_uri),
            &customer,
            json!({ "platform": "facebook" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Content item not found");

    // Delete by quasi-key
    let (status, body) = ctx
        .delete(
            &format!("{}/2024-05-01/Launch%20post", items_uri),
            &customer,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = ctx
        .get(&format!("/v1/calendars/{}", calendar_id), &customer)
        .await;
    assert!(body["content_items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_calendar_update_and_delete_paths_trim_differently() {
    let ctx = TestContext::new();
    let (_, customer) = ctx.signup_and_login("customer", "client@example.com").await;

    let (_, body) = ctx
        .post(
            "/v1/calendars",
            &customer,
            json!({
                "name": "May schedule",
                "content_items": [{ "date": "2024-05-01", "description": " Launch post " }]
            }),
        )
        .await;
    let calendar_id = body["id"].as_str().unwrap().to_string();
    let item_uri = format!(
        "/v1/calendars/{}/items/2024-05-01/Launch%20post",
        calendar_id
    );

    // The update path matches the padded stored description
    let (status, _) = ctx
        .put(&item_uri, &customer, json!({ "platform": "instagram" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    // The delete path compares the stored side verbatim, so it misses
    let (status, body) = ctx.delete(&item_uri, &customer, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Content item not found");
}

#[tokio::test]
async fn test_calendar_crud_for_admins() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.signup_and_login("admin", "admin@example.com").await;
    let (customer_id, _) = ctx.signup_and_login("customer", "client@example.com").await;

    // Admins must name the owning customer
    let (status, _) = ctx
        .post("/v1/calendars", &admin, json!({ "name": "Unowned" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .post(
            "/v1/calendars",
            &admin,
            json!({ "name": "May schedule", "customer_id": customer_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let calendar_id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/v1/calendars/{}", calendar_id);

    let (status, body) = ctx
        .put(&uri, &admin, json!({ "name": "June schedule", "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "June schedule");
    assert_eq!(body["is_active"], false);

    let (status, body) = ctx.delete(&uri, &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = ctx.get(&uri, &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
