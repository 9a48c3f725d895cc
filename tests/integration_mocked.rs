/// Integration tests with mocked external services
/// Tests the comparison workflow and the service clients without hitting
/// the real quote aggregator, Nominatim, or OSRM.
use moka::future::Cache;
use ride_compare_api::config::Config;
use ride_compare_api::errors::AppError;
use ride_compare_api::fallback::fallback_rides;
use ride_compare_api::handlers::AppState;
use ride_compare_api::models::{Coordinate, DataSource, QuotePlan, RideQuoteRequest, RideSearchState};
use ride_compare_api::quotes::{self, CONNECTION_ERROR_NOTICE, INVALID_DATA_NOTICE, NO_RIDES_NOTICE};
use ride_compare_api::services::{NominatimService, OsrmService, QuoteApiService};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create test config pointing every base URL at the
/// mock server
fn create_test_config(base_url: String) -> Config {
    Config {
        port: 8080,
        quotes_base_url: base_url.clone(),
        nominatim_base_url: base_url.clone(),
        osrm_base_url: base_url,
        quote_cache_ttl_seconds: 60,
    }
}

fn create_test_state(base_url: String) -> Arc<AppState> {
    Arc::new(AppState {
        config: create_test_config(base_url),
        quote_cache: Cache::builder()
            .time_to_live(Duration::from_secs(60))
            .max_capacity(100)
            .build(),
        search_state: RwLock::new(RideSearchState::default()),
    })
}

fn test_plan() -> QuotePlan {
    RideQuoteRequest {
        start_place: "MG Road".to_string(),
        destination_place: "Airport".to_string(),
        pickup_lat: Some(12.9716),
        pickup_lng: Some(77.5946),
        drop_lat: Some(13.1986),
        drop_lng: Some(77.7066),
    }
    .validate()
    .expect("test query is valid")
}

#[tokio::test]
async fn quote_request_carries_ordered_params_with_six_decimals() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ride-options"))
        .and(query_param("start_place", "MG Road"))
        .and(query_param("destination_place", "Airport"))
        .and(query_param("pickup_lat", "12.971600"))
        .and(query_param("pickup_lng", "77.594600"))
        .and(query_param("drop_lat", "13.198600"))
        .and(query_param("drop_lng", "77.706600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let service = QuoteApiService::new(&config);

    let result = service.fetch_ride_options(&test_plan()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn live_payload_yields_normalized_rides() {
    let mock_server = MockServer::start().await;

    let payload = serde_json::json!({
        "success": true,
        "data": {
            "Uber": {"options": [
                {"fleet": "Uber Go4", "price": "₹289"},
                {"fleet": "UberXL6", "price": "₹480"}
            ]},
            "Rapido": {"options": [
                {"fleet": "Bike", "fare": "₹120"}
            ]}
        }
    });

    Mock::given(method("GET"))
        .and(path("/ride-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(&mock_server)
        .await;

    let state = create_test_state(mock_server.uri());
    let response = quotes::compare_rides(&state, &test_plan()).await;

    assert!(response.success);
    assert_eq!(response.source, DataSource::Live);
    assert_eq!(response.notice, None);

    let ids: Vec<&str> = response.rides.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["uber-0", "uber-1", "rapido-0"]);
}

#[tokio::test]
async fn upstream_error_status_falls_back_with_connection_notice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ride-options"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let state = create_test_state(mock_server.uri());
    let response = quotes::compare_rides(&state, &test_plan()).await;

    assert_eq!(response.source, DataSource::Fallback);
    assert_eq!(response.notice.as_deref(), Some(CONNECTION_ERROR_NOTICE));
    assert_eq!(response.rides, fallback_rides());
}

#[tokio::test]
async fn non_json_body_falls_back_with_invalid_data_notice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ride-options"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway timeout</html>"))
        .mount(&mock_server)
        .await;

    let state = create_test_state(mock_server.uri());
    let response = quotes::compare_rides(&state, &test_plan()).await;

    assert_eq!(response.source, DataSource::Fallback);
    assert_eq!(response.notice.as_deref(), Some(INVALID_DATA_NOTICE));
    assert_eq!(response.rides, fallback_rides());
}

#[tokio::test]
async fn failure_envelope_falls_back_with_upstream_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ride-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "no drivers online",
            "data": null
        })))
        .mount(&mock_server)
        .await;

    let state = create_test_state(mock_server.uri());
    let response = quotes::compare_rides(&state, &test_plan()).await;

    assert_eq!(response.source, DataSource::Fallback);
    assert_eq!(
        response.notice.as_deref(),
        Some("API Error: no drivers online. Showing estimated prices instead.")
    );
    assert_eq!(response.rides, fallback_rides());
}

#[tokio::test]
async fn empty_payload_falls_back_with_no_rides_notice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ride-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {}
        })))
        .mount(&mock_server)
        .await;

    let state = create_test_state(mock_server.uri());
    let response = quotes::compare_rides(&state, &test_plan()).await;

    assert_eq!(response.source, DataSource::Fallback);
    assert_eq!(response.notice.as_deref(), Some(NO_RIDES_NOTICE));
    // The synthetic set is a fixed constant, identical on every engagement.
    assert_eq!(response.rides, fallback_rides());
    assert_eq!(response.rides.len(), 6);
}

#[tokio::test]
async fn repeated_search_is_served_from_the_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ride-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "Uber": {"options": [{"fleet": "UberGo", "price": "₹289"}]}
            }
        })))
        .expect(1) // The second call must not reach the aggregator
        .mount(&mock_server)
        .await;

    let state = create_test_state(mock_server.uri());
    let plan = test_plan();

    let first = quotes::compare_rides(&state, &plan).await;
    let second = quotes::compare_rides(&state, &plan).await;

    assert_eq!(first.source, DataSource::Live);
    assert_eq!(second.source, DataSource::Live);
    assert_eq!(first.rides, second.rides);
}

#[tokio::test]
async fn nominatim_search_maps_hits_to_suggestions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .and(query_param("q", "MG Road"))
        .and(query_param("limit", "5"))
        .and(query_param("addressdetails", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "place_id": 240109189,
                "display_name": "MG Road, Bengaluru, Karnataka, India",
                "lat": "12.9752",
                "lon": "77.6069"
            },
            {
                "display_name": "broken hit without coordinates"
            }
        ])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let service = NominatimService::new(&config);

    let suggestions = service.search("MG Road", 5).await.unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].id, "240109189");
    assert_eq!(suggestions[0].name, "MG Road");
    assert_eq!(suggestions[0].latitude, 12.9752);
    assert_eq!(suggestions[0].longitude, 77.6069);
}

#[tokio::test]
async fn nominatim_short_query_returns_empty_without_network_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let service = NominatimService::new(&config);

    let suggestions = service.search("MG", 5).await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn nominatim_geocode_resolves_first_hit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"display_name": "Airport", "lat": "13.1986", "lon": "77.7066"}
        ])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let service = NominatimService::new(&config);

    let coordinate = service.geocode("Kempegowda Airport").await.unwrap();
    assert_eq!(
        coordinate,
        Some(Coordinate {
            latitude: 13.1986,
            longitude: 77.7066
        })
    );
}

#[tokio::test]
async fn nominatim_geocode_returns_none_when_unmatched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let service = NominatimService::new(&config);

    let coordinate = service.geocode("nowhere at all").await.unwrap();
    assert_eq!(coordinate, None);
}

#[tokio::test]
async fn osrm_route_summary_is_extracted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.*"))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "Ok",
            "routes": [{
                "distance": 35218.4,
                "duration": 2921.7,
                "geometry": {"type": "LineString", "coordinates": [[77.5946, 12.9716]]}
            }]
        })))
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let service = OsrmService::new(&config);

    let pickup = Coordinate {
        latitude: 12.9716,
        longitude: 77.5946,
    };
    let drop = Coordinate {
        latitude: 13.1986,
        longitude: 77.7066,
    };

    let summary = service.directions(&pickup, &drop).await.unwrap();
    assert_eq!(summary.distance_meters, 35218.4);
    assert_eq!(summary.duration_seconds, 2921.7);
    assert_eq!(summary.geometry["type"], "LineString");
}

#[tokio::test]
async fn osrm_without_routes_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "Ok",
            "routes": []
        })))
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let service = OsrmService::new(&config);

    let pickup = Coordinate {
        latitude: 12.9716,
        longitude: 77.5946,
    };
    let drop = Coordinate {
        latitude: 13.1986,
        longitude: 77.7066,
    };

    let result = service.directions(&pickup, &drop).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
