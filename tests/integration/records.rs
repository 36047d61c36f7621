//! Record operations against a mock org over real HTTP.

use super::common::{client_for, mock_org, rest_path};
use busbar_sf_client::Session;
use busbar_sf_sobject::{FieldFilter, SessionExt};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_case_lifecycle() {
    let server = mock_org().await;

    Mock::given(method("POST"))
        .and(path(rest_path("sobjects/Case/")))
        .and(header("Authorization", "Bearer 00Dxx0000001gPL!AQ4AQMockToken"))
        .and(body_json(json!({"Subject": "Printer jammed", "Origin": "Web"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": "500xx000000001AAA", "success": true, "errors": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(rest_path("sobjects/Case/500xx000000001AAA")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attributes": {
                "type": "Case",
                "url": "/services/data/v62.0/sobjects/Case/500xx000000001AAA"
            },
            "Id": "500xx000000001AAA",
            "Subject": "Printer jammed",
            "Origin": "Web",
            "Status": "New",
            "CaseNumber": "00001026",
            "CreatedDate": "2024-05-01T10:00:00.000+0000",
            "OwnerId": "005xx000001Sv6AAAS"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(rest_path("sobjects/Case/500xx000000001AAA")))
        .and(body_json(json!({
            "Subject": "Printer jammed",
            "Origin": "Web",
            "Status": "Working",
            "OwnerId": "005xx000001Sv6AAAS"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(rest_path("sobjects/Case/500xx000000001AAA")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = client_for(&uri);

        let mut case = client.sobject("Case");
        case.set("Subject", "Printer jammed").set("Origin", "Web");
        case.create().expect("create should succeed");
        assert_eq!(case.id(), "500xx000000001AAA");

        case.get(None).expect("get should succeed");
        assert_eq!(case.string_field("Status"), "New");
        assert_eq!(case.string_field("CaseNumber"), "00001026");

        let owner = case.sobject_field("User", "OwnerId").expect("owner id");
        assert_eq!(owner.type_name(), "User");
        assert_eq!(owner.id(), "005xx000001Sv6AAAS");

        case.set("Status", "Working");
        case.update().expect("update should succeed");

        case.delete(None).expect("delete should succeed");
        assert_eq!(case.string_field("Subject"), "Printer jammed");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_failure_reported_in_body() {
    let server = mock_org().await;
    Mock::given(method("POST"))
        .and(path(rest_path("sobjects/Case/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "",
            "success": false,
            "errors": ["INVALID_FIELD"]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let client = client_for(&uri);
        let mut case = client.sobject("Case");
        case.set("Bogus__c", 1);
        case.create().map(|_| ()).unwrap_err()
    })
    .await
    .unwrap();

    assert!(err.is_aggregate());
    assert!(err.to_string().contains("INVALID_FIELD"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_describe_and_http_errors() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path(rest_path("sobjects/Case/describe")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Case",
            "fields": [{"name": "Id"}, {"name": "Subject"}, {"name": "Status"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(rest_path("sobjects/Nope__c/describe")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!([{
            "errorCode": "NOT_FOUND",
            "message": "The requested resource does not exist"
        }])))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = client_for(&uri);

        let meta = client.sobject("Case").describe().expect("describe");
        assert_eq!(meta.name(), "Case");
        assert_eq!(meta.field_names(), vec!["Id", "Subject", "Status"]);

        let err = client.sobject("Nope__c").describe().unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(404));
        assert!(err.transport_error().is_some_and(|e| e.is_not_found()));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upsert_created_then_updated() {
    let server = mock_org().await;
    Mock::given(method("PATCH"))
        .and(path(rest_path("sobjects/Account/External_Key__c/ACME-1")))
        .and(body_json(json!({"Name": "Acme"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "001xx000003DGb2AAG",
            "success": true,
            "created": true,
            "errors": []
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(rest_path("sobjects/Account/External_Key__c/ACME-2")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = client_for(&uri);

        let mut created = client.sobject("Account");
        created.set("External_Key__c", "ACME-1").set("Name", "Acme");
        created.upsert("External_Key__c").expect("upsert create");
        assert_eq!(created.id(), "001xx000003DGb2AAG");

        let mut updated = client.sobject("Account");
        updated.set("External_Key__c", "ACME-2").set("Name", "Acme Two");
        updated.upsert("External_Key__c").expect("upsert update");
        assert_eq!(updated.id(), "");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_query_pages_and_linked_rows() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path(rest_path("query")))
        .and(query_param(
            "q",
            "SELECT Id, CommentBody, ParentId, CreatedBy.Name FROM CaseComment",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 2,
            "done": false,
            "nextRecordsUrl": "/services/data/v62.0/query/01gxx000000MOCK-1",
            "records": [{
                "attributes": {"type": "CaseComment", "url": "/services/data/v62.0/sobjects/CaseComment/00axx1"},
                "Id": "00axx1",
                "CommentBody": "Tried turning it off and on",
                "ParentId": "500xx000000001AAA",
                "CreatedBy": {
                    "attributes": {"type": "User", "url": "/services/data/v62.0/sobjects/User/005xx1"},
                    "Name": "Ada Lovelace"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query/01gxx000000MOCK-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 2,
            "done": true,
            "records": [{
                "attributes": {"type": "CaseComment", "url": "/services/data/v62.0/sobjects/CaseComment/00axx2"},
                "Id": "00axx2",
                "CommentBody": "Replaced the toner",
                "ParentId": "500xx000000001AAA",
                "CreatedBy": null
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = client_for(&uri);

        let first = client
            .query("SELECT Id, CommentBody, ParentId, CreatedBy.Name FROM CaseComment")
            .expect("query");
        assert_eq!(first.total_size(), 2);
        assert!(!first.is_done());

        let comment = &first.records()[0];
        assert_eq!(comment.type_name(), "CaseComment");
        let parent = comment.sobject_field("Case", "ParentId").expect("parent");
        assert_eq!(parent.id(), "500xx000000001AAA");
        let author = comment.sobject_field("User", "CreatedBy").expect("author");
        assert_eq!(author.id(), "005xx1");
        assert_eq!(author.string_field("Name"), "Ada Lovelace");

        let second = first.fetch_next().expect("more pages").expect("second page");
        assert!(second.is_done());
        assert!(second.fetch_next().is_none());
        assert!(second.records()[0].sobject_field("User", "CreatedBy").is_none());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_next_page_on_foreign_origin_is_not_followed() {
    let server = mock_org().await;
    let elsewhere = wiremock::MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true, "records": []})))
        .expect(0)
        .mount(&elsewhere)
        .await;
    Mock::given(method("GET"))
        .and(path(rest_path("query")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 2,
            "done": false,
            "nextRecordsUrl": format!("{}/services/data/v62.0/query/01gxx-2000", elsewhere.uri()),
            "records": [{"attributes": {"type": "Case"}, "Id": "500xx1"}]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = client_for(&uri);
        let first = client.query("SELECT Id FROM Case").expect("first page");

        let err = first.fetch_next().expect("cursor present").unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("foreign origin"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tooling_session_routes_updates_and_queries() {
    let server = mock_org().await;
    Mock::given(method("PATCH"))
        .and(path(rest_path("tooling/sobjects/ApexClass/01pxx0000000001")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(rest_path("tooling/query")))
        .and(query_param("q", "SELECT Id FROM ApexClass"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"totalSize": 0, "done": true, "records": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = client_for(&uri).with_tooling_api(true);
        assert!(client.uses_tooling_api());

        let mut class = client.sobject("ApexClass");
        class.set_id("01pxx0000000001").set("Body", "public class A {}");
        class.update().expect("tooling update");

        let result = client.query("SELECT Id FROM ApexClass").expect("tooling query");
        assert!(result.is_empty());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_custom_field_filter_over_http() {
    let server = mock_org().await;
    Mock::given(method("PATCH"))
        .and(path(rest_path("sobjects/Case/500xx000000001AAA")))
        .and(body_json(json!({"IsClosed": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = client_for(&uri);
        let mut case = client
            .sobject("Case")
            .with_field_filter(FieldFilter::standard().without_field("IsClosed").with_field("Legacy__c"));
        case.set_id("500xx000000001AAA")
            .set("IsClosed", true)
            .set("Legacy__c", "dropped")
            .set("SystemModstamp", "2024-05-01T10:00:00.000+0000");
        case.update().expect("update");
    })
    .await
    .unwrap();
}
