use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use client_core::{
    pagination_controls, Endpoints, FetchOutcome, ListConfig, ListController,
    MutationOrchestrator, PreConfirmed, ReqwestTransport, SaveOutcome, StayOnList,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::domain::{Resource, ResourceId, SortDirection};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct Backend {
    base_url: Arc<Mutex<String>>,
    persons: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<i64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page: u32,
    per_page: u32,
    sort_by: String,
    sort_dir: String,
}

async fn list_persons(
    State(backend): State<Backend>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let mut persons = backend.persons.lock().await.clone();
    persons.sort_by(|a, b| {
        let left = a[params.sort_by.as_str()].as_str().unwrap_or_default();
        let right = b[params.sort_by.as_str()].as_str().unwrap_or_default();
        left.cmp(right)
    });
    if params.sort_dir == "DESC" {
        persons.reverse();
    }

    let per_page = params.per_page.max(1) as usize;
    let last_page = persons.len().div_ceil(per_page).max(1) as u32;
    let page = params.page.clamp(1, last_page);
    let start = (page as usize - 1) * per_page;
    let body: Vec<Value> = persons.into_iter().skip(start).take(per_page).collect();

    let base_url = backend.base_url.lock().await.clone();
    let href = |target: u32| {
        format!(
            "{base_url}/persons?page={target}&perPage={}&sortBy={}&sortDir={}",
            params.per_page, params.sort_by, params.sort_dir
        )
    };
    let mut links = vec![
        format!("<{}>; rel=\"page-first\"", href(1)),
        format!("<{}>; rel=\"page-prev\"", href(page.saturating_sub(1).max(1))),
    ];
    links.extend((1..=last_page).map(|n| format!("<{}>; rel=\"page-{n}\"", href(n))));
    links.push(format!(
        "<{}>; rel=\"page-next\"",
        href((page + 1).min(last_page))
    ));
    links.push(format!("<{}>; rel=\"page-last\"", href(last_page)));

    let mut headers = HeaderMap::new();
    headers.insert("x-page", HeaderValue::from(page));
    headers.insert("x-last-page", HeaderValue::from(last_page));
    headers.insert(
        "links",
        HeaderValue::from_str(&links.join(",")).expect("header value"),
    );
    (headers, Json(body))
}

async fn create_person(
    State(backend): State<Backend>,
    Json(mut person): Json<Value>,
) -> impl IntoResponse {
    let id = {
        let mut next_id = backend.next_id.lock().await;
        *next_id += 1;
        *next_id
    };
    person["id"] = json!(id);
    backend.persons.lock().await.push(person.clone());
    (StatusCode::CREATED, Json(person))
}

async fn update_person(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(person): Json<Value>,
) -> StatusCode {
    let mut persons = backend.persons.lock().await;
    match persons.iter_mut().find(|p| p["id"] == json!(id)) {
        Some(existing) => {
            *existing = person;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_person(State(backend): State<Backend>, Path(id): Path<i64>) -> StatusCode {
    let mut persons = backend.persons.lock().await;
    let before = persons.len();
    persons.retain(|p| p["id"] != json!(id));
    if persons.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn spawn_backend(seed: &[(&str, &str)]) -> String {
    let persons: Vec<Value> = seed
        .iter()
        .enumerate()
        .map(|(i, (first, last))| json!({"id": (i as i64 + 1), "firstName": first, "lastName": last}))
        .collect();
    let backend = Backend {
        base_url: Arc::new(Mutex::new(String::new())),
        next_id: Arc::new(Mutex::new(persons.len() as i64)),
        persons: Arc::new(Mutex::new(persons)),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    *backend.base_url.lock().await = base_url.clone();

    let app = Router::new()
        .route("/persons", get(list_persons).post(create_person))
        .route("/persons/:id", put(update_person).delete(delete_person))
        .with_state(backend);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    base_url
}

const SEED: [(&str, &str); 11] = [
    ("Ann", "Lee"),
    ("Bo", "Adams"),
    ("Cy", "Baker"),
    ("Di", "Clark"),
    ("Ed", "Davis"),
    ("Flo", "Evans"),
    ("Gus", "Foster"),
    ("Hal", "Green"),
    ("Ivy", "Hill"),
    ("Jo", "King"),
    ("Kai", "Moss"),
];

fn last_names(outcome: &FetchOutcome) -> Vec<String> {
    outcome
        .applied()
        .expect("applied")
        .resources
        .iter()
        .map(|r| r.field_str("lastName").unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn browse_sort_create_and_delete_against_live_backend() {
    let base_url = spawn_backend(&SEED).await;
    let transport = Arc::new(ReqwestTransport::new());
    let list = ListController::new(
        transport.clone(),
        Endpoints::new(&base_url, "persons").expect("endpoints"),
        ListConfig::default(),
    );
    let mutations = MutationOrchestrator::new(
        transport,
        list.clone(),
        Arc::new(StayOnList),
        Arc::new(PreConfirmed),
    );

    let first = list.initialize().await;
    assert_eq!(
        last_names(&first),
        vec!["Adams", "Baker", "Clark", "Davis", "Evans"]
    );
    let state = list.snapshot().await;
    assert_eq!((state.current_page, state.last_page), (1, Some(3)));
    let enabled: Vec<(String, bool)> = pagination_controls(&state)
        .into_iter()
        .map(|(link, enabled)| (link.label, enabled))
        .collect();
    assert_eq!(
        enabled,
        vec![
            ("first".to_string(), false),
            ("prev".to_string(), false),
            ("1".to_string(), false),
            ("2".to_string(), true),
            ("3".to_string(), true),
            ("next".to_string(), true),
            ("last".to_string(), true),
        ]
    );

    let next = state
        .links
        .iter()
        .find(|link| link.label == "next")
        .expect("next link")
        .clone();
    let second = list.navigate(&next).await;
    assert_eq!(
        last_names(&second),
        vec!["Foster", "Green", "Hill", "King", "Lee"]
    );

    let descending = list.set_sort_direction(SortDirection::Desc).await;
    assert_eq!(
        last_names(&descending),
        vec!["Foster", "Evans", "Davis", "Clark", "Baker"]
    );

    let saved = mutations
        .save(
            &Resource::new()
                .with_field("firstName", "Zed")
                .with_field("lastName", "Young"),
        )
        .await
        .expect("create");
    match &saved {
        SaveOutcome::Created { created, refresh } => {
            assert_eq!(
                created.as_ref().and_then(|r| r.id.clone()),
                Some(ResourceId::Int(12))
            );
            let state = refresh.applied().expect("refreshed");
            assert_eq!(state.current_page, 2);
            assert_eq!(state.sort_direction, SortDirection::Desc);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    list.set_page_size(10).await.expect("page size");
    let last = list.go_to_page(2).await.expect("page");
    assert_eq!(last_names(&last), vec!["Baker", "Adams"]);

    for id in [3, 2] {
        mutations
            .delete(&Resource::with_id(ResourceId::Int(id)))
            .await
            .expect("delete");
    }

    let state = list.snapshot().await;
    assert_eq!(state.current_page, 1);
    assert_eq!(state.last_page, Some(1));
    assert_eq!(state.resources.len(), 10);
}
