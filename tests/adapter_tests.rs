//! Adapter parsing tests against mocked provider endpoints.

use refsolve::credentials::{Credential, CredentialSource};
use refsolve::models::Summary;
use refsolve::providers::{
    CohereProvider, CrossRefProvider, DataCiteProvider, GeminiCitationEstimator, GeminiSummarizer,
    GoogleBooksProvider, MistralProvider, OpenAlexProvider, OpenLibraryProvider, ProviderAdapter,
    Rejection,
};

fn pooled_key(secret: &str) -> Credential {
    Credential {
        secret: secret.to_string(),
        source: CredentialSource::Pool,
    }
}

#[tokio::test]
async fn crossref_parses_a_work() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/works/10.1000%2Fabc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "message": {
                    "title": ["A Study of Things"],
                    "author": [
                        {"given": "Jane", "family": "Doe"},
                        {"given": "John", "family": "Smith"}
                    ],
                    "container-title": ["Journal of Things"],
                    "publisher": "Thing Press",
                    "issued": {"date-parts": [[2019, 3, 14]]},
                    "volume": "12",
                    "issue": "3",
                    "page": "101-115",
                    "URL": "https://doi.org/10.1000/abc",
                    "type": "journal-article"
                }
            }"#,
        )
        .create_async()
        .await;

    let provider = CrossRefProvider::with_base_url(server.url());
    let record = provider
        .attempt("10.1000/abc", &Credential::anonymous())
        .await
        .unwrap();

    assert_eq!(record.title, "A Study of Things");
    assert_eq!(record.authors, vec!["Jane Doe", "John Smith"]);
    assert_eq!(record.journal, "Journal of Things");
    assert_eq!(record.year, "2019");
    assert_eq!(record.month, "3");
    assert_eq!(record.day, "14");
    assert_eq!(record.pages, "101-115");
    assert_eq!(record.identifier, "10.1000/abc");

    mock.assert_async().await;
}

#[tokio::test]
async fn crossref_404_is_empty_not_http_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/works/10.1000%2Fmissing")
        .with_status(404)
        .with_body("Resource not found.")
        .create_async()
        .await;

    let provider = CrossRefProvider::with_base_url(server.url());
    let result = provider
        .attempt("10.1000/missing", &Credential::anonymous())
        .await;

    assert!(matches!(result, Err(Rejection::Empty)));
}

#[tokio::test]
async fn crossref_server_error_carries_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/works/10.1000%2Fbroken")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "service overloaded"}"#)
        .create_async()
        .await;

    let provider = CrossRefProvider::with_base_url(server.url());
    let result = provider
        .attempt("10.1000/broken", &Credential::anonymous())
        .await;

    match result {
        Err(Rejection::Http { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "service overloaded");
        }
        other => panic!("expected HTTP rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn datacite_parses_a_dataset() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/dois/10.5061%2Fdryad.abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "data": {
                    "attributes": {
                        "titles": [{"title": "Thermometry Measurements"}],
                        "creators": [
                            {"name": "Curie, Marie"},
                            {"givenName": "Jane", "familyName": "Doe"}
                        ],
                        "publisher": "Dryad",
                        "publicationYear": 2021,
                        "container": {"title": "Dryad Digital Repository"},
                        "url": "https://doi.org/10.5061/dryad.abc",
                        "types": {"resourceTypeGeneral": "Dataset"}
                    }
                }
            }"#,
        )
        .create_async()
        .await;

    let provider = DataCiteProvider::with_base_url(server.url());
    let record = provider
        .attempt("10.5061/dryad.abc", &Credential::anonymous())
        .await
        .unwrap();

    assert_eq!(record.title, "Thermometry Measurements");
    assert_eq!(record.authors, vec!["Marie Curie", "Jane Doe"]);
    assert_eq!(record.publisher, "Dryad");
    assert_eq!(record.year, "2021");
    assert_eq!(record.journal, "Dryad Digital Repository");
    assert_eq!(record.entry_type, "dataset");
}

#[tokio::test]
async fn openalex_parses_a_work_with_abstract() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/works/doi:10.1000%2Fabc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "display_name": "A Study of Things",
                "authorships": [
                    {"author": {"display_name": "Jane Doe"}},
                    {"author": {"display_name": "John Smith"}}
                ],
                "primary_location": {"source": {"display_name": "Journal of Things"}},
                "publication_year": 2019,
                "publication_date": "2019-03-01",
                "biblio": {"volume": "12", "issue": "3", "first_page": "101", "last_page": "115"},
                "doi": "https://doi.org/10.1000/abc",
                "type": "article",
                "abstract_inverted_index": {"We": [0], "present": [1], "results": [2]}
            }"#,
        )
        .create_async()
        .await;

    let provider = OpenAlexProvider::with_base_url(server.url());
    let record = provider
        .attempt("10.1000/abc", &Credential::anonymous())
        .await
        .unwrap();

    assert_eq!(record.title, "A Study of Things");
    assert_eq!(record.authors, vec!["Jane Doe", "John Smith"]);
    assert_eq!(record.journal, "Journal of Things");
    assert_eq!(record.year, "2019");
    assert_eq!(record.month, "3");
    assert_eq!(record.day, "1");
    assert_eq!(record.pages, "101-115");
    assert_eq!(record.r#abstract, "We present results");
    assert_eq!(record.url, "https://doi.org/10.1000/abc");
}

#[tokio::test]
async fn openlibrary_parses_a_book() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/books")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "ISBN:9780132350884": {
                    "title": "Clean Code",
                    "authors": [{"name": "Robert C. Martin"}],
                    "publishers": [{"name": "Prentice Hall"}],
                    "publish_places": [{"name": "Upper Saddle River, NJ"}],
                    "publish_date": "August 2008",
                    "number_of_pages": 464,
                    "cover": {"medium": "https://covers.openlibrary.org/b/id/1-M.jpg"}
                }
            }"#,
        )
        .create_async()
        .await;

    let provider = OpenLibraryProvider::with_base_url(server.url());
    let record = provider
        .attempt("9780132350884", &Credential::anonymous())
        .await
        .unwrap();

    assert_eq!(record.title, "Clean Code");
    assert_eq!(record.authors, vec!["Robert C. Martin"]);
    assert_eq!(record.publisher, "Prentice Hall");
    assert_eq!(record.year, "2008");
    assert_eq!(record.page_count, 464);
}

#[tokio::test]
async fn openlibrary_unknown_isbn_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/books")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let provider = OpenLibraryProvider::with_base_url(server.url());
    let result = provider
        .attempt("9999999999999", &Credential::anonymous())
        .await;

    assert!(matches!(result, Err(Rejection::Empty)));
}

#[tokio::test]
async fn google_books_no_items_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/books/v1/volumes")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"kind": "books#volumes", "totalItems": 0}"#)
        .create_async()
        .await;

    let provider = GoogleBooksProvider::with_base_url(server.url());
    let result = provider
        .attempt("9999999999999", &Credential::anonymous())
        .await;

    assert!(matches!(result, Err(Rejection::Empty)));
}

#[tokio::test]
async fn gemini_summarizer_returns_trimmed_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "  A tidy summary.\n"}]}
                }]
            }"#,
        )
        .create_async()
        .await;

    let provider = GeminiSummarizer::with_base_url(server.url());
    let summary = provider
        .attempt("some long text", &pooled_key("AIzaTestKey"))
        .await
        .unwrap();

    assert_eq!(summary, Summary::new("A tidy summary."));
}

#[tokio::test]
async fn gemini_citation_estimator_parses_fenced_json() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "```json\n{\"title\": \"Estimated Title\", \"authors\": [\"Jane Doe\"], \"year\": \"2019\"}\n```"}]}
                }]
            }"#,
        )
        .create_async()
        .await;

    let provider = GeminiCitationEstimator::with_base_url(server.url());
    let record = provider
        .attempt("10.1000/unseen", &pooled_key("AIzaTestKey"))
        .await
        .unwrap();

    assert_eq!(record.title, "Estimated Title");
    assert_eq!(record.authors, vec!["Jane Doe"]);
    assert_eq!(record.year, "2019");
    // Fields the model left out stay at their sentinels.
    assert_eq!(record.journal, "");
}

#[tokio::test]
async fn cohere_returns_trimmed_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"text": "  A concise summary.\n"}"#)
        .create_async()
        .await;

    let provider = CohereProvider::with_base_url(server.url());
    let summary = provider
        .attempt("some long text", &pooled_key("cohere-key"))
        .await
        .unwrap();

    assert_eq!(summary, Summary::new("A concise summary."));
}

#[tokio::test]
async fn mistral_auth_failure_is_http_rejection() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Unauthorized"}"#)
        .create_async()
        .await;

    let provider = MistralProvider::with_base_url(server.url());
    let result = provider.attempt("text", &pooled_key("bad-key")).await;

    match result {
        Err(Rejection::Http { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected HTTP rejection, got {:?}", other),
    }
}
