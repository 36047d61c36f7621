//! SOAP login followed by record access with the issued session.

use super::common::{mock_org, rest_path};
use busbar_sf_auth::{Credentials, SoapLogin};
use busbar_sf_sobject::SessionExt;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn login_response(server_uri: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com">
  <soapenv:Body>
    <loginResponse>
      <result>
        <metadataServerUrl>{server_uri}/services/Soap/m/62.0/00Dxx0000001gPL</metadataServerUrl>
        <passwordExpired>false</passwordExpired>
        <sandbox>true</sandbox>
        <serverUrl>{server_uri}/services/Soap/u/62.0/00Dxx0000001gPL</serverUrl>
        <sessionId>00Dxx0000001gPL!AQ4AQLoginSession</sessionId>
        <userId>005xx000001Sv6AAAS</userId>
        <userInfo>
          <userEmail>ada@example.com</userEmail>
          <userFullName>Ada Lovelace</userFullName>
          <userName>ada@example.com.dev</userName>
        </userInfo>
      </result>
    </loginResponse>
  </soapenv:Body>
</soapenv:Envelope>"#
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_get_record() {
    let server = mock_org().await;
    Mock::given(method("POST"))
        .and(path("/services/Soap/u/62.0"))
        .and(header("SOAPAction", "login"))
        .and(body_string_contains(
            "<n1:username>ada@example.com.dev</n1:username>",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_response(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(rest_path("sobjects/Case/500xx000000001AAA")))
        .and(header(
            "Authorization",
            "Bearer 00Dxx0000001gPL!AQ4AQLoginSession",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attributes": {"type": "Case", "url": "/services/data/v62.0/sobjects/Case/500xx000000001AAA"},
            "Id": "500xx000000001AAA",
            "Subject": "Printer jammed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let result = SoapLogin::new(uri.as_str())
            .expect("login url")
            .login_password("ada@example.com.dev", "hunter2", "SECURITYTOKEN")
            .expect("login should succeed");

        assert_eq!(result.instance_url(), uri);
        assert_eq!(result.user_full_name, "Ada Lovelace");

        let client = result.into_client().expect("client");
        let mut case = client.sobject("Case");
        case.get(Some("500xx000000001AAA")).expect("get");
        assert_eq!(case.string_field("Subject"), "Printer jammed");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_fault() {
    let server = mock_org().await;
    Mock::given(method("POST"))
        .and(path("/services/Soap/u/62.0"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:sf="urn:fault.partner.soap.sforce.com">
  <soapenv:Body>
    <soapenv:Fault>
      <faultcode>sf:INVALID_LOGIN</faultcode>
      <faultstring>INVALID_LOGIN: Invalid username, password, security token; or user locked out.</faultstring>
    </soapenv:Fault>
  </soapenv:Body>
</soapenv:Envelope>"#,
        ))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        SoapLogin::new(uri)
            .expect("login url")
            .login_password("__INVALID_USER__", "__INVALID_PASS__", "")
            .unwrap_err()
    })
    .await
    .unwrap();

    assert!(err.is_login_fault());
    assert!(err.to_string().contains("sf:INVALID_LOGIN"));
}
