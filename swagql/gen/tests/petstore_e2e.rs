//! End-to-end tests: generate a schema from the petstore document and run
//! GraphQL operations against a mock REST backend.

use std::path::PathBuf;

use serde_json::{Value, json};
use swagql_define::SpecDocument;
use swagql_gen::{GeneratedModule, generate_schema};
use swagql_runtime::{AllowAll, ExecutionContext, HttpFetcher, Request, Variables};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn petstore() -> SpecDocument {
    let text = std::fs::read_to_string(fixture("petstore.json")).expect("fixture readable");
    SpecDocument::from_json(&text).expect("fixture parses")
}

async fn generate() -> GeneratedModule {
    generate_schema(&petstore(), &[fixture("plugins/require_env.rs")])
        .await
        .expect("petstore generates")
}

/// Execution context backed by the mock server, mounted under `/v2`.
fn context(module: &GeneratedModule, server: &MockServer) -> ExecutionContext {
    let fetcher = HttpFetcher::parse(&format!("{}/v2", server.uri())).expect("valid base url");
    ExecutionContext::new()
        .with_fetcher(&module.markers.fetch, fetcher)
        .with_auth_verifier(&module.markers.verify_auth_status, AllowAll)
}

fn max_the_dog() -> Value {
    json!({
        "id": 1,
        "name": "MaxTheDog",
        "is-nick-name": true,
        "age-in-dog-years": 15,
        "5 Things are Neato!": "you bet",
        "safe": { "alsoSafe": { "Totally Not Safe!": { "4": "four" } } },
        "photoUrls": ["/max.png"],
        "category": { "id": 3, "name": "dogs" },
        "tags": [{ "id": 1, "name": "good" }],
        "status": "available"
    })
}

// ============================================================================
// Queries
// ============================================================================

/// Raw keys are read through their sanitized field names.
#[tokio::test]
async fn pet_by_id_reads_raw_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(max_the_dog()))
        .expect(1)
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().expect("schema builds");
    let request = Request::new(
        r#"query PetById($petId: Int!) {
            petById(petId: $petId) {
                id
                name
                isNickName
                ageInDogYears
                _5ThingsAreNeato
                safe { alsoSafe { totallyNotSafe { _4 } } }
                photoUrls
                status
                category { name }
                tags { name }
            }
        }"#,
    )
    .variables(Variables::from_json(json!({ "petId": 1 })));

    let response = schema.execute(request, context(&module, &server)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let pet = &response.data.into_json().unwrap()["petById"];
    assert_eq!(pet["id"], 1);
    assert_eq!(pet["name"], "MaxTheDog");
    assert_eq!(pet["isNickName"], true);
    assert_eq!(pet["ageInDogYears"], 15);
    assert_eq!(pet["_5ThingsAreNeato"], "you bet");
    assert_eq!(pet["safe"]["alsoSafe"]["totallyNotSafe"]["_4"], "four");
    assert_eq!(pet["photoUrls"], json!(["/max.png"]));
    assert_eq!(pet["status"], "AVAILABLE");
    assert_eq!(pet["category"]["name"], "dogs");
    assert_eq!(pet["tags"][0]["name"], "good");
}

/// Array query parameters with `collectionFormat: multi` repeat the key.
#[tokio::test]
async fn find_by_status_translates_enum_arguments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/findByStatus"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([max_the_dog()])))
        .expect(1)
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().unwrap();
    let response = schema
        .execute(
            "{ findPetsByStatus(status: [PENDING, SOLD]) { name } }",
            context(&module, &server),
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["findPetsByStatus"][0]["name"], "MaxTheDog");
}

/// Map-like responses surface through the JSON scalar untouched.
#[tokio::test]
async fn inventory_is_passed_through_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/store/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sold": 2, "on-hold": 1 })))
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().unwrap();
    let response = schema
        .execute("{ getInventory }", context(&module, &server))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["getInventory"], json!({ "sold": 2, "on-hold": 1 }));
}

// ============================================================================
// Mutations
// ============================================================================

/// Sanitized input fields are sent under their raw keys, and a single
/// value for a list field is sent as a one-element list.
#[tokio::test]
async fn add_pet_sends_raw_body() {
    let server = MockServer::start().await;
    let expected_body = json!({
        "name": "Fido",
        "photoUrls": ["/photo.png"],
        "age-in-dog-years": 5,
        "is-nick-name": false
    });
    Mock::given(method("POST"))
        .and(path("/v2/pet"))
        .and(body_json(expected_body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 2 })))
        .expect(1)
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().unwrap();
    let request = Request::new(
        "mutation AddPet($body: PetInput!) { addPet(body: $body) { id rawInputOptions } }",
    )
    .variables(Variables::from_json(json!({
        "body": {
            "name": "Fido",
            "photoUrls": "/photo.png",
            "ageInDogYears": 5,
            "isNickName": false
        }
    })));

    let response = schema.execute(request, context(&module, &server)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    assert_eq!(data["addPet"]["id"], 2);
    let options = &data["addPet"]["rawInputOptions"];
    assert_eq!(options["method"], "POST");
    assert_eq!(options["body"], expected_body);
}

/// Path-level parameters are arguments of every operation on the path.
#[tokio::test]
async fn update_pet_accepts_path_level_debug_argument() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v2/pet"))
        .and(query_param("debug", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "name": "Rex" })))
        .expect(1)
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().unwrap();
    let response = schema
        .execute(
            r#"mutation { updatePet(debug: true, body: { name: "Rex", photoUrls: [] }) { name } }"#,
            context(&module, &server),
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap()["updatePet"]["name"], "Rex");
}

/// Operations without a response schema return the raw body.
#[tokio::test]
async fn delete_pet_returns_raw_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/pet/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": true })))
        .expect(1)
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().unwrap();
    let response = schema
        .execute(
            r#"mutation { deletePet(petId: 7, apiKey: "secret") { body rawInputOptions } }"#,
            context(&module, &server),
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["deletePet"]["body"], json!({ "deleted": true }));
    assert_eq!(data["deletePet"]["rawInputOptions"]["headers"]["api_key"], "secret");
}

/// Empty responses still expose the request that was sent.
#[tokio::test]
async fn empty_responses_keep_raw_input_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/pet/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().unwrap();
    let response = schema
        .execute(
            r#"mutation { updatePetWithForm(petId: 7, name: "Rex") { body rawInputOptions } }"#,
            context(&module, &server),
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["updatePetWithForm"]["body"], Value::Null);
    assert_eq!(data["updatePetWithForm"]["rawInputOptions"]["method"], "POST");
    assert_eq!(data["updatePetWithForm"]["rawInputOptions"]["body"]["name"], "Rex");
}

// ============================================================================
// Failures
// ============================================================================

/// Backend errors fail only the affected field.
#[tokio::test]
async fn http_errors_fail_only_their_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(max_the_dog()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Pet not found"))
        .mount(&server)
        .await;

    let module = generate().await;
    let schema = module.executable_schema().unwrap();
    let response = schema
        .execute(
            "{ found: petById(petId: 1) { name } missing: petById(petId: 404) { name } }",
            context(&module, &server),
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("404"));
    let data = response.data.into_json().unwrap();
    assert_eq!(data["found"]["name"], "MaxTheDog");
    assert_eq!(data["missing"], Value::Null);
}
