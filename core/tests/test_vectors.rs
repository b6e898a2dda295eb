//! Verify request building and response normalization against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector describes the call inputs, the expected request, and either a
//! simulated response (returned directly, or raised as
//! `TransportError::Status` when `"raised": true`) or a simulated transport
//! failure. Bodies are compared as parsed JSON so key order does not matter.

use std::cell::RefCell;

use customerio_core::{
    CustomerIoClient, EventData, HttpMethod, HttpRequest, HttpResponse, Response, Transport, TransportError,
};
use serde_json::Value;

/// Replays the outcome described by a test-vector case.
struct ScriptedTransport {
    outcome: Result<HttpResponse, TransportError>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn from_case(case: &Value) -> Self {
        let outcome = if let Some(failure) = case.get("simulated_failure") {
            Err(TransportError::failure(
                failure["code"].as_i64().unwrap(),
                failure["message"].as_str().unwrap(),
            ))
        } else {
            let sim = &case["simulated_response"];
            let response = HttpResponse {
                status: sim["status"].as_u64().unwrap() as u16,
                reason_phrase: sim["reason_phrase"].as_str().unwrap().to_string(),
            };
            if sim["raised"].as_bool().unwrap_or(false) {
                Err(TransportError::Status(response))
            } else {
                Ok(response)
            }
        };
        Self {
            outcome,
            sent: RefCell::new(Vec::new()),
        }
    }

    fn only_request(&self) -> HttpRequest {
        let sent = self.sent.borrow();
        assert_eq!(sent.len(), 1, "exactly one request per call");
        sent[0].clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        self.outcome.clone()
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn expected_result(case: &Value) -> Response {
    let expected = &case["expected_result"];
    Response::new(
        expected["status_code"].as_i64().unwrap(),
        expected["message"].as_str().unwrap(),
    )
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
    assert_eq!(req.header("authorization"), Some("Basic c2l0ZTpzZWNyZXQ="), "{name}: auth");

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
            assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content-type");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn client(transport: &ScriptedTransport) -> CustomerIoClient<&ScriptedTransport> {
    let mut client = CustomerIoClient::with_transport(transport);
    client.authenticate("site", "secret");
    client
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

#[test]
fn customer_test_vectors() {
    let raw = include_str!("../../test-vectors/customer.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let transport = ScriptedTransport::from_case(case);

        let response = client(&transport).customer(
            input["id"].as_str().unwrap(),
            input["email"].as_str().unwrap(),
            input["attributes"].as_object().unwrap(),
        );

        check_request(name, &transport.only_request(), &case["expected_request"]);
        assert_eq!(response, expected_result(case), "{name}: response");
    }
}

// ---------------------------------------------------------------------------
// Delete customer
// ---------------------------------------------------------------------------

#[test]
fn delete_customer_test_vectors() {
    let raw = include_str!("../../test-vectors/delete_customer.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let transport = ScriptedTransport::from_case(case);

        let response = client(&transport).delete_customer(case["input"]["id"].as_str().unwrap());

        check_request(name, &transport.only_request(), &case["expected_request"]);
        assert_eq!(response, expected_result(case), "{name}: response");
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

#[test]
fn event_test_vectors() {
    let raw = include_str!("../../test-vectors/event.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let transport = ScriptedTransport::from_case(case);
        let data = EventData::from_value(input["data"].clone()).unwrap();

        let response = client(&transport).event(
            input["id"].as_str().unwrap(),
            input["name"].as_str().unwrap(),
            &data,
        );

        let req = transport.only_request();
        check_request(name, &req, &case["expected_request"]);
        if data.is_empty() {
            assert!(req.body.as_deref().unwrap().contains(r#""data":{}"#), "{name}: empty data object");
        }
        assert_eq!(response, expected_result(case), "{name}: response");
    }
}
