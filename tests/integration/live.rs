//! Record round trip against a real org.
//!
//! Requires SF_INSTANCE_URL and SF_ACCESS_TOKEN (or the SALESFORCE_* names).

use busbar_sf_auth::SalesforceCredentials;
use busbar_sf_sobject::SessionExt;

fn live_client() -> busbar_sf_client::SalesforceClient {
    super::common::init_tracing();
    SalesforceCredentials::from_env()
        .expect("SF_INSTANCE_URL and SF_ACCESS_TOKEN must be set for live tests")
        .into_client()
        .expect("Failed to create client")
}

#[test]
#[ignore = "requires a Salesforce org"]
fn test_live_case_round_trip() {
    let client = live_client();

    let mut case = client.sobject("Case");
    case.set("Subject", "busbar-sf-records live test")
        .set("Origin", "Web");
    case.create().expect("Create should succeed");
    let id = case.id().to_string();
    assert!(!id.is_empty());

    let mut fetched = client.sobject("Case");
    fetched.get(Some(id.as_str())).expect("Get should succeed");
    assert_eq!(fetched.string_field("Subject"), "busbar-sf-records live test");
    assert!(!fetched.string_field("CaseNumber").is_empty());

    // Read-only fields such as CaseNumber and CreatedDate are stripped on write
    fetched.set("Subject", "busbar-sf-records live test (updated)");
    fetched.update().expect("Update should succeed");

    let soql = format!("SELECT Id, Subject, Owner.Name FROM Case WHERE Id = '{id}'");
    let result = client.query(&soql).expect("Query should succeed");
    assert_eq!(result.total_size(), 1);
    let row = &result.records()[0];
    assert_eq!(row.string_field("Subject"), "busbar-sf-records live test (updated)");
    assert!(row.sobject_field("User", "Owner").is_some());

    case.delete(None).expect("Delete should succeed");
}

#[test]
#[ignore = "requires a Salesforce org"]
fn test_live_describe() {
    let client = live_client();

    let meta = client.sobject("Account").describe().expect("Describe should succeed");
    assert_eq!(meta.name(), "Account");
    assert!(meta.field_names().contains(&"Name"));
}
