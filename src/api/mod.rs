mod blocks;
mod chain;
mod health;
mod merkle;
pub mod models;
mod stats;

use actix_web::HttpResponse;
use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

use crate::error::ChainError;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::get_path)
            .service(chain::get_tips)
            .service(blocks::add_block)
            .service(blocks::get_block)
            .service(merkle::post_root)
            .service(merkle::post_proof)
            .service(merkle::post_verify)
            .service(stats::get_stats),
    );
}

/// Map a library error onto an HTTP status with the error text as body.
pub(crate) fn error_response(e: &ChainError) -> HttpResponse {
    let body = e.to_string();
    match e {
        ChainError::UnknownParent(_) | ChainError::UnknownBlock(_) => {
            HttpResponse::NotFound().body(body)
        }
        ChainError::IndexOutOfRange { .. } => HttpResponse::BadRequest().body(body),
        ChainError::InvalidBlock { .. } => HttpResponse::UnprocessableEntity().body(body),
        ChainError::MiningAborted { .. } => HttpResponse::ServiceUnavailable().body(body),
        ChainError::BrokenChain(_) | ChainError::InvariantViolation(_) => {
            HttpResponse::InternalServerError().body(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::FixedClock;
    use crate::config::Settings;
    use crate::fork::ForkGraph;
    use crate::hash::Digest;
    use crate::merkle::merkle_root;
    use crate::transaction::sample_transactions;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    fn state(difficulty: u32) -> web::Data<AppState> {
        let graph = ForkGraph::with_clock(difficulty, FixedClock(1_700_000_000.0));
        web::Data::new(AppState::with_graph(graph, Settings::default()))
    }

    fn demo_txs_json() -> Value {
        json!([
            {"from": "Alice", "to": "Bob", "amt": 10},
            {"from": "Bob", "to": "Carol", "amt": 5},
            {"from": "Carol", "to": "Dave", "amt": 2},
            {"from": "Dave", "to": "Alice", "amt": 1}
        ])
    }

    #[actix_web::test]
    async fn health_is_up() {
        let app = test::init_service(App::new().configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn post_block_extends_best_tip() {
        let data = state(1);
        let genesis = data.graph.lock().unwrap().genesis();
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/blocks/")
            .set_json(json!({ "transactions": demo_txs_json() }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["index"], 1);
        assert_eq!(body["parent"], genesis.to_hex());
        assert_eq!(body["best_tip"], body["hash"]);
        assert!(body["hash"].as_str().unwrap().starts_with('0'));

        let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
        let chain: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(chain["length"], 2);
        assert_eq!(chain["chain"][0], genesis.to_hex());
        assert_eq!(chain["chain"][1], body["hash"]);

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let valid: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(valid["valid"], true);
    }

    #[actix_web::test]
    async fn unknown_parent_is_not_found() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/blocks/")
            .set_json(json!({ "parent": "ab".repeat(32), "transactions": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn path_rejects_malformed_digest() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/api/v1/path/xyz/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn path_to_unknown_block_is_not_found() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let uri = format!("/api/v1/path/{}/", "ab".repeat(32));
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn merkle_endpoints_match_library() {
        let app = test::init_service(App::new().configure(init_routes)).await;
        let expected = merkle_root(&sample_transactions());

        let req = test::TestRequest::post()
            .uri("/api/v1/merkle/root/")
            .set_json(json!({ "transactions": demo_txs_json() }))
            .to_request();
        let root: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(root["root"], expected.to_hex());

        let req = test::TestRequest::post()
            .uri("/api/v1/merkle/proof/")
            .set_json(json!({ "transactions": demo_txs_json(), "index": 2 }))
            .to_request();
        let proof: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(proof["proof"][0]["side"], "right");

        let req = test::TestRequest::post()
            .uri("/api/v1/merkle/verify/")
            .set_json(json!({
                "transaction": demo_txs_json()[2],
                "proof": proof["proof"],
                "root": expected,
            }))
            .to_request();
        let verdict: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(verdict["valid"], true);

        let req = test::TestRequest::post()
            .uri("/api/v1/merkle/verify/")
            .set_json(json!({
                "transaction": demo_txs_json()[1],
                "proof": proof["proof"],
                "root": expected,
            }))
            .to_request();
        let verdict: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(verdict["valid"], false);
    }

    #[actix_web::test]
    async fn proof_index_out_of_range_is_bad_request() {
        let app = test::init_service(App::new().configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/merkle/proof/")
            .set_json(json!({ "transactions": demo_txs_json(), "index": 9 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn aborted_mining_is_service_unavailable() {
        let graph = ForkGraph::with_clock(6, FixedClock(1.0));
        let settings = Settings {
            mine_timeout: Some(std::time::Duration::ZERO),
            ..Settings::default()
        };
        let data = web::Data::new(AppState::with_graph(graph, settings));
        let app = test::init_service(App::new().app_data(data).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/blocks/")
            .set_json(json!({ "transactions": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn tips_and_stats_reflect_forks() {
        let data = state(1);
        let genesis: Digest = data.graph.lock().unwrap().genesis();
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        for tag in ["A1", "B1"] {
            let req = test::TestRequest::post()
                .uri("/api/v1/blocks/")
                .set_json(json!({
                    "parent": genesis,
                    "transactions": [{"from": "Alice", "to": "Bob", "amt": 10, "tag": tag}],
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get().uri("/api/v1/tips/").to_request();
        let tips: Value = test::call_and_read_body_json(&app, req).await;
        let tips = tips["tips"].as_array().unwrap();
        assert_eq!(tips.len(), 2);
        assert_eq!(tips.iter().filter(|t| t["best"] == true).count(), 1);

        let req = test::TestRequest::get().uri("/api/v1/stats/").to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["nodes"], 3);
        assert_eq!(stats["tips"], 2);
        assert_eq!(stats["best_height"], 1);

        let best = stats["best_tip"].as_str().unwrap().to_string();
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/path/{best}/"))
            .to_request();
        let path: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(path["path"][0], genesis.to_hex());
        assert_eq!(path["path"][1], best);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/blocks/{best}/"))
            .to_request();
        let node: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(node["parent"], genesis.to_hex());
        assert_eq!(node["block"]["header"]["index"], 1);
    }
}
