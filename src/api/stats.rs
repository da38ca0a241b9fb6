use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let graph = state.graph.lock().expect("mutex poisoned");
    let (best_height, best_cumulative_work) = graph
        .best_node()
        .map(|n| (n.block.header.index, n.cumulative_work))
        .unwrap_or_default();

    HttpResponse::Ok().json(StatsResponse {
        nodes: graph.len(),
        tips: graph.tips().len(),
        difficulty: graph.difficulty(),
        best_tip: graph.best_tip(),
        best_height,
        best_cumulative_work,
        mine_timeout_secs: state.settings.mine_timeout.map(|t| t.as_secs()),
    })
}
