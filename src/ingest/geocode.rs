/// Place-name lookup client
///
/// Resolves a free-text location search to a `Place` (name, centre and
/// bounding box) for the location page.

use std::time::Duration;

use crate::format::query_string;
use crate::logging::{self, Component};
use crate::model::{FloodError, Place};

pub fn place_url(base_url: &str, query: &str) -> String {
    format!(
        "{}/places?{}",
        base_url.trim_end_matches('/'),
        query_string(&[("q", query.trim())])
    )
}

/// Looks up `query`; a blank query or an unknown place yields `Ok(None)`.
pub fn find_place(
    client: &reqwest::blocking::Client,
    base_url: &str,
    query: &str,
) -> Result<Option<Place>, FloodError> {
    if query.trim().is_empty() {
        return Ok(None);
    }

    let url = place_url(base_url, query);
    let response = client.get(&url).header("Accept", "application/json").send()?;

    match response.status().as_u16() {
        404 => {
            logging::debug(Component::Geocode, Some(query), "No matching place");
            return Ok(None);
        }
        code if !response.status().is_success() => {
            let err = FloodError::HttpError(code);
            logging::log_fetch_failure(Component::Geocode, Some(query), "Place lookup", &err);
            return Err(err);
        }
        _ => {}
    }

    let body = response.text()?;
    let places: Vec<Place> = serde_json::from_str(&body)?;
    Ok(places.into_iter().next())
}

pub fn client(timeout_secs: u64) -> Result<reqwest::blocking::Client, FloodError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::stub::serve_once;

    #[test]
    fn test_place_url_encodes_query() {
        assert_eq!(
            place_url("http://geo:8060/", " St Ives "),
            "http://geo:8060/places?q=St+Ives"
        );
        assert_eq!(place_url("http://geo", "Bath & Wells"), "http://geo/places?q=Bath+%26+Wells");
    }

    #[test]
    fn test_blank_query_skips_request() {
        let http = client(1).unwrap();
        assert_eq!(find_place(&http, "http://127.0.0.1:9", "   ").unwrap(), None);
    }

    #[test]
    fn test_first_matching_place_returned() {
        let server = serve_once(
            "200 OK",
            r#"[
                {"name":"St Ives, Cornwall","center":[-5.48,50.21],"bbox":[-5.5,50.2,-5.4,50.3]},
                {"name":"St Ives, Cambridgeshire","center":[-0.07,52.33],"bbox":[-0.1,52.3,0.0,52.4]}
            ]"#,
        );
        let http = client(5).unwrap();
        let place = find_place(&http, &server.base_url, "St Ives").unwrap().expect("a place");
        assert_eq!(place.name, "St Ives, Cornwall");
        assert!(place.is_england);
        assert!(server.request_line().starts_with("GET /places?q=St+Ives "));
    }

    #[test]
    fn test_no_results_is_no_place() {
        let server = serve_once("200 OK", "[]");
        let http = client(5).unwrap();
        assert_eq!(find_place(&http, &server.base_url, "Nowhere").unwrap(), None);
    }

    #[test]
    fn test_unknown_place_404_is_no_place() {
        let server = serve_once("404 Not Found", "{}");
        let http = client(5).unwrap();
        assert_eq!(find_place(&http, &server.base_url, "Atlantis").unwrap(), None);
    }

    #[test]
    fn test_server_error_is_returned() {
        let server = serve_once("500 Internal Server Error", "{}");
        let http = client(5).unwrap();
        assert_eq!(
            find_place(&http, &server.base_url, "Bath").unwrap_err(),
            FloodError::HttpError(500)
        );
    }

    #[test]
    fn test_malformed_place_list_is_parse_error() {
        let server = serve_once("200 OK", r#"{"name":"not a list"}"#);
        let http = client(5).unwrap();
        let err = find_place(&http, &server.base_url, "Bath").unwrap_err();
        assert!(matches!(err, FloodError::ParseError(_)), "got {:?}", err);
    }
}
